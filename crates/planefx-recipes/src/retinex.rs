//! Single-scale retinex.
//!
//! Jobson, Rahman and Woodell, "Properties and performance of a
//! center/surround retinex", IEEE TIP 6(3), 1997.

use planefx_image::{Image, Plane, Sample};
use planefx_imgproc::parallel::{par_iter_rows_inplace, par_iter_rows_val_two};
use planefx_imgproc::stats::plane_stats;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, RecipeError};
use crate::gauss::{GaussAlgorithm, GaussConfig};
use crate::lowpass::apply_low_pass;
use crate::planes::map_planes;

/// Responses whose range is below this are treated as flat.
const FLAT_RANGE: f32 = 1e-6;

/// Parameters of [`ssr`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsrConfig {
    /// Standard deviation of the surround. Default `50`.
    pub sigma: f32,
}

impl Default for SsrConfig {
    fn default() -> Self {
        Self { sigma: 50.0 }
    }
}

/// Single-scale retinex of a unit range plane.
///
/// Computes `ln(x + 1) - ln(G(x) + 1)` with `G` a Gaussian surround and
/// stretches the result to `[0, 1]`. A flat response yields zeros.
///
/// The stretch needs the minimum and maximum of the whole plane, so the
/// statistics are gathered before the per-sample pass.
pub fn ssr(src: &Plane<f32>, config: &SsrConfig) -> Result<Plane<f32>, RecipeError> {
    ensure_positive("sigma", config.sigma as f64)?;

    let surround = GaussConfig {
        sigma: config.sigma,
        algo: GaussAlgorithm::Auto,
    };
    let low = apply_low_pass(&surround, src)?;

    let mut reflectance = src.like(0.0);
    par_iter_rows_val_two(src, &low, &mut reflectance, |&x, &l, r| {
        *r = (x + 1.0).ln() - (l + 1.0).ln()
    });

    let stats = plane_stats(&reflectance, 0)?;
    let range = stats.max - stats.min;
    log::debug!(
        "ssr: sigma={} min={} max={}",
        config.sigma,
        stats.min,
        stats.max
    );

    if range > FLAT_RANGE {
        par_iter_rows_inplace(&mut reflectance, |r| *r = (*r - stats.min) / range);
    } else {
        par_iter_rows_inplace(&mut reflectance, |r| *r = 0.0);
    }

    Ok(reflectance)
}

/// Single-scale retinex of the first plane of `src`; other planes are copied.
pub fn ssr_image<T: Sample, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    bits: u32,
    config: &SsrConfig,
) -> Result<(), RecipeError> {
    map_planes(src, dst, bits, &[0], |plane| ssr(plane, config))
}
