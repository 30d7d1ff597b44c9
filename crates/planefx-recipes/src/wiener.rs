//! Adaptive Wiener denoising from local statistics, like MATLAB's `wiener2`.
//!
//! Lim, "Two-dimensional signal and image processing", 1990, eq. 9.26-9.29.

use planefx_image::Plane;
use planefx_imgproc::filter::box_filter;
use planefx_imgproc::parallel::{
    par_iter_rows_val, par_iter_rows_val_three, par_iter_rows_val_two,
};
use planefx_imgproc::stats::plane_stats;
use serde::{Deserialize, Serialize};

use crate::error::RecipeError;

/// Parameters of [`wiener2`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WienerConfig {
    /// Vertical radius of the `(2r + 1)` window. Default `3`.
    pub radius_v: usize,
    /// Horizontal radius, `None` to reuse `radius_v`.
    pub radius_h: Option<usize>,
    /// Variance of the additive noise, `None` to use the mean local variance.
    pub noise: Option<f32>,
}

impl Default for WienerConfig {
    fn default() -> Self {
        Self {
            radius_v: 3,
            radius_h: None,
            noise: None,
        }
    }
}

/// Remove additive noise of constant power.
///
/// With `m` and `v` the local mean and variance and `n` the noise power, the
/// output is `m + max(v - n, 0) / max(v, n) * (x - m)`. Where both `v` and `n`
/// vanish the output is `m`.
pub fn wiener2(src: &Plane<f32>, config: &WienerConfig) -> Result<Plane<f32>, RecipeError> {
    let radius = (config.radius_h.unwrap_or(config.radius_v), config.radius_v);

    let mut mean = src.like(0.0);
    box_filter(src, &mut mean, radius)?;

    let mut square = src.like(0.0);
    par_iter_rows_val(src, &mut square, |&x, sq| *sq = x * x);
    let mut mean_square = src.like(0.0);
    box_filter(&square, &mut mean_square, radius)?;

    let mut variance = src.like(0.0);
    par_iter_rows_val_two(&mean_square, &mean, &mut variance, |&msq, &m, v| {
        *v = msq - m * m
    });

    let noise = match config.noise {
        Some(noise) => noise,
        None => plane_stats(&variance, 0)?.average as f32,
    };
    log::debug!("wiener2: radius={radius:?} noise={noise}");

    let mut dst = src.like(0.0);
    par_iter_rows_val_three(src, &mean, &variance, &mut dst, |&x, &m, &v, out| {
        let denom = v.max(noise);
        *out = if denom > 0.0 {
            m + (v - noise).max(0.0) / denom * (x - m)
        } else {
            m
        };
    });

    Ok(dst)
}
