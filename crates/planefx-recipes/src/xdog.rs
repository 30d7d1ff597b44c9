//! eXtended difference of Gaussians.
//!
//! Winnemöller, Kyprianidis and Olsen, "XDoG: an extended
//! difference-of-Gaussians compendium", Computers & Graphics 36(6), 2012.

use planefx_image::Plane;
use planefx_imgproc::parallel::par_iter_rows_val_two;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, RecipeError};
use crate::lowpass::{apply_low_pass, GaussianLowPass};

/// The soft threshold slope is expressed per 8-bit code value.
const LAMDA_SCALE: f32 = 255.0;

/// Parameters of [`xdog`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XdogConfig {
    /// Standard deviation of the first Gaussian. Default `1`.
    pub sigma: f32,
    /// Ratio of the second standard deviation to the first. Default `1.6`.
    pub k: f32,
    /// Gain of the difference. Default `20`.
    pub p: f32,
    /// Threshold in unit range. Default `0.7`.
    pub epsilon: f32,
    /// Slope of the soft threshold per 8-bit code value. Default `0.01`.
    ///
    /// The slope is multiplied by `255` whatever the depth of the source, so
    /// a 10- or 16-bit image gets the same edge softness as its 8-bit version.
    pub lamda: f32,
}

impl Default for XdogConfig {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            k: 1.6,
            p: 20.0,
            epsilon: 0.7,
            lamda: 0.01,
        }
    }
}

/// Soft thresholded difference of Gaussians.
///
/// With `D = (G_sigma(x) - G_{k sigma}(x)) * p + G_sigma(x)` the output is
/// `1` where `D >= epsilon` and `1 + tanh(lamda * (D - epsilon))` elsewhere.
pub fn xdog(src: &Plane<f32>, config: &XdogConfig) -> Result<Plane<f32>, RecipeError> {
    ensure_positive("sigma", config.sigma as f64)?;
    ensure_positive("k", config.k as f64)?;

    log::debug!(
        "xdog: sigma={} k={} p={} epsilon={}",
        config.sigma,
        config.k,
        config.p,
        config.epsilon
    );

    let f1 = apply_low_pass(&GaussianLowPass { sigma: config.sigma }, src)?;
    let f2 = apply_low_pass(
        &GaussianLowPass {
            sigma: config.sigma * config.k,
        },
        src,
    )?;

    let (p, epsilon) = (config.p, config.epsilon);
    let slope = config.lamda * LAMDA_SCALE;

    let mut dst = src.like(0.0);
    par_iter_rows_val_two(&f1, &f2, &mut dst, |&f1, &f2, out| {
        let d = (f1 - f2) * p + f1;
        *out = if d >= epsilon {
            1.0
        } else {
            1.0 + (slope * (d - epsilon)).tanh()
        };
    });

    Ok(dst)
}
