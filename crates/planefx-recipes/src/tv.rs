//! Total variation denoising by explicit PDE stepping.
//!
//! Rudin, Osher and Fatemi, "Nonlinear total variation based noise removal
//! algorithms", Physica D 60 (1992).

use planefx_image::Plane;
use planefx_imgproc::filter::{convolve3x3, convolve_horizontal, convolve_vertical};
use planefx_imgproc::parallel::par_iter_rows_val_many;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_same_size, RecipeError};

/// Parameters of [`tv`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TvConfig {
    /// Number of time steps. Default `5`.
    pub iterations: usize,
    /// Time step, `None` for `ep / 5`.
    pub dt: Option<f32>,
    /// Gradient regularisation. Default `1`.
    pub ep: f32,
    /// Weight of the fidelity term. Default `0`.
    pub lam: f32,
    /// Constant added to the fidelity term. Default `0`.
    pub c: f32,
}

impl Default for TvConfig {
    fn default() -> Self {
        Self {
            iterations: 5,
            dt: None,
            ep: 1.0,
            lam: 0.0,
            c: 0.0,
        }
    }
}

impl TvConfig {
    /// The time step actually used.
    pub fn time_step(&self) -> f32 {
        self.dt.unwrap_or(self.ep / 5.0)
    }
}

struct Derivatives {
    ix: Plane<f32>,
    iy: Plane<f32>,
    ixx: Plane<f32>,
    iyy: Plane<f32>,
    ixy: Plane<f32>,
}

/// Central differences with mirrored borders.
fn derivatives(src: &Plane<f32>) -> Result<Derivatives, RecipeError> {
    let mut d = Derivatives {
        ix: src.like(0.0),
        iy: src.like(0.0),
        ixx: src.like(0.0),
        iyy: src.like(0.0),
        ixy: src.like(0.0),
    };

    convolve_horizontal(src, &mut d.ix, &[-1.0, 0.0, 1.0], 2.0)?;
    convolve_vertical(src, &mut d.iy, &[-1.0, 0.0, 1.0], 2.0)?;
    convolve_horizontal(src, &mut d.ixx, &[1.0, -2.0, 1.0], 1.0)?;
    convolve_vertical(src, &mut d.iyy, &[1.0, -2.0, 1.0], 1.0)?;

    #[rustfmt::skip]
    let cross = [
        1.0, 0.0, -1.0,
        0.0, 0.0, 0.0,
        -1.0, 0.0, 1.0,
    ];
    convolve3x3(src, &mut d.ixy, &cross, 4.0)?;

    Ok(d)
}

/// Denoise a plane by total variation flow.
///
/// Every step computes
///
/// ```text
/// I += dt * ((Ixx (ep^2 + Iy^2) - 2 Ix Iy Ixy + Iyy (ep^2 + Ix^2)) / (ep^2 + Ix^2 + Iy^2)^1.5
///            + lam * (I0 - I + c))
/// ```
///
/// where `I0` is `reference`, or `src` when no reference is given.
pub fn tv(
    src: &Plane<f32>,
    reference: Option<&Plane<f32>>,
    config: &TvConfig,
) -> Result<Plane<f32>, RecipeError> {
    ensure_positive("ep", config.ep as f64)?;
    let dt = config.time_step();
    ensure_positive("dt", dt as f64)?;

    let reference = reference.unwrap_or(src);
    ensure_same_size(src.size(), reference.size())?;

    log::debug!(
        "tv: iterations={} dt={} ep={} lam={}",
        config.iterations,
        dt,
        config.ep,
        config.lam
    );

    let ep2 = config.ep * config.ep;
    let (lam, c) = (config.lam, config.c);

    let mut current = src.clone();
    for i in 0..config.iterations {
        log::trace!("tv: step {}", i + 1);

        let d = derivatives(&current)?;
        let mut next = current.like(0.0);
        par_iter_rows_val_many(
            &[&current, &d.ix, &d.iy, &d.ixx, &d.ixy, &d.iyy, reference],
            &mut next,
            |v, out| {
                let (x, ix, iy, ixx, ixy, iyy, x0) = (v[0], v[1], v[2], v[3], v[4], v[5], v[6]);
                let curvature = (ixx * (ep2 + iy * iy) - 2.0 * ix * iy * ixy
                    + iyy * (ep2 + ix * ix))
                    / (ep2 + ix * ix + iy * iy).powf(1.5);
                *out = x + dt * (curvature + lam * (x0 - x + c));
            },
        );
        current = next;
    }

    Ok(current)
}
