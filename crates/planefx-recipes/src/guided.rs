//! Guided filter, reverse filtering and the detail enhancement built on them.
//!
//! He, Sun and Tang, "Guided Image Filtering", TPAMI 35(6), 2013; He and
//! Sun, "Fast Guided Filter", 2015; Tao et al., "Zero-order Reverse
//! Filtering", ICCV 2017.

use planefx_image::{Image, ImageSize, Plane};
use planefx_imgproc::filter::box_filter;
use planefx_imgproc::parallel::{par_iter_rows_val_three, par_iter_rows_val_two};
use planefx_imgproc::resize::resize_bilinear;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_same_size, RecipeError};

/// Parameters of [`guided_filter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidedConfig {
    /// Radius of the `(2r + 1)` box window. Default `4`.
    pub radius: usize,
    /// Regularisation of the local linear model. Default `0.01`.
    pub regulation: f32,
    /// Subsampling ratio of the fast guided filter, `1` to disable. Default `1`.
    pub subsampling: usize,
}

impl Default for GuidedConfig {
    fn default() -> Self {
        Self {
            radius: 4,
            regulation: 0.01,
            subsampling: 1,
        }
    }
}

fn mean(src: &Plane<f32>, radius: usize) -> Result<Plane<f32>, RecipeError> {
    let mut dst = src.like(0.0);
    box_filter(src, &mut dst, (radius, radius))?;
    Ok(dst)
}

fn product(a: &Plane<f32>, b: &Plane<f32>) -> Plane<f32> {
    let mut dst = a.like(0.0);
    par_iter_rows_val_two(a, b, &mut dst, |&a, &b, d| *d = a * b);
    dst
}

fn resized(src: &Plane<f32>, size: ImageSize) -> Result<Plane<f32>, RecipeError> {
    let mut dst = Image::from_size_val(size, 0.0)?;
    resize_bilinear(src, &mut dst)?;
    Ok(dst)
}

/// Coefficients `(a, b)` of the local linear model `q = a * I + b`.
fn linear_coefficients(
    src: &Plane<f32>,
    guidance: &Plane<f32>,
    radius: usize,
    regulation: f32,
) -> Result<(Plane<f32>, Plane<f32>), RecipeError> {
    let mean_i = mean(guidance, radius)?;
    let mean_p = mean(src, radius)?;
    let corr_i = mean(&product(guidance, guidance), radius)?;
    let corr_ip = mean(&product(guidance, src), radius)?;

    let mut var_i = src.like(0.0);
    par_iter_rows_val_two(&corr_i, &mean_i, &mut var_i, |&c, &m, v| *v = c - m * m);

    let mut a = src.like(0.0);
    par_iter_rows_val_three(&corr_ip, &mean_i, &mean_p, &mut a, |&c, &mi, &mp, a| {
        *a = c - mi * mp
    });
    let cov_ip = a.clone();
    par_iter_rows_val_two(&cov_ip, &var_i, &mut a, |&cov, &var, a| {
        *a = cov / (var + regulation)
    });

    let mut b = src.like(0.0);
    par_iter_rows_val_three(&mean_p, &a, &mean_i, &mut b, |&mp, &a, &mi, b| {
        *b = mp - a * mi
    });

    Ok((mean(&a, radius)?, mean(&b, radius)?))
}

/// Edge preserving smoothing of `src` steered by `guidance`.
///
/// `guidance` defaults to `src` itself. With `subsampling > 1` the linear
/// coefficients are estimated on planes shrunk by that ratio and upsampled
/// bilinearly.
pub fn guided_filter(
    src: &Plane<f32>,
    guidance: Option<&Plane<f32>>,
    config: &GuidedConfig,
) -> Result<Plane<f32>, RecipeError> {
    ensure_positive("regulation", config.regulation as f64)?;
    ensure_positive("subsampling", config.subsampling as f64)?;

    let guidance = guidance.unwrap_or(src);
    ensure_same_size(src.size(), guidance.size())?;

    let (mean_a, mean_b) = if config.subsampling > 1 {
        let s = config.subsampling;
        let small = ImageSize {
            width: src.width().div_ceil(s),
            height: src.height().div_ceil(s),
        };
        let radius = (config.radius as f32 / s as f32).round().max(1.0) as usize;

        let (a, b) = linear_coefficients(
            &resized(src, small)?,
            &resized(guidance, small)?,
            radius,
            config.regulation,
        )?;
        (resized(&a, src.size())?, resized(&b, src.size())?)
    } else {
        linear_coefficients(src, guidance, config.radius, config.regulation)?
    };

    let mut dst = src.like(0.0);
    par_iter_rows_val_three(&mean_a, guidance, &mean_b, &mut dst, |&a, &g, &b, q| {
        *q = a * g + b
    });
    Ok(dst)
}

/// Undo an unknown filter `f` by fixed point iteration.
///
/// Starting from `x = src`, every iteration applies
/// `x = x + step * (src - f(x))`.
pub fn defilter<F>(
    src: &Plane<f32>,
    mut filter: F,
    iterations: usize,
    step: f32,
) -> Result<Plane<f32>, RecipeError>
where
    F: FnMut(&Plane<f32>) -> Result<Plane<f32>, RecipeError>,
{
    let mut x = src.clone();
    for i in 0..iterations {
        log::trace!("defilter: iteration {}", i + 1);

        let filtered = filter(&x)?;
        ensure_same_size(filtered.size(), src.size())?;

        let mut residual = src.like(0.0);
        par_iter_rows_val_two(src, &filtered, &mut residual, |&s, &f, r| *r = s - f);

        let mut next = src.like(0.0);
        par_iter_rows_val_two(&x, &residual, &mut next, |&x, &r, n| *n = x + step * r);
        x = next;
    }
    Ok(x)
}

/// Parameters of [`detail_enhancement`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailConfig {
    /// Reverse filtering iterations. Default `3`.
    pub iterations: usize,
    /// Guided filter radius. Default `4`.
    pub radius: usize,
    /// Guided filter regularisation. Default `5e-4`.
    pub regulation: f32,
    /// Guided filter subsampling. Default `1`.
    pub subsampling: usize,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            iterations: 3,
            radius: 4,
            regulation: 5e-4,
            subsampling: 1,
        }
    }
}

/// Enhance details by reverse filtering a guided filter.
pub fn detail_enhancement(
    src: &Plane<f32>,
    guidance: Option<&Plane<f32>>,
    config: &DetailConfig,
) -> Result<Plane<f32>, RecipeError> {
    log::debug!(
        "detail_enhancement: iterations={} radius={} regulation={}",
        config.iterations,
        config.radius,
        config.regulation
    );

    let guided = GuidedConfig {
        radius: config.radius,
        regulation: config.regulation,
        subsampling: config.subsampling,
    };
    defilter(
        src,
        |x| guided_filter(x, guidance, &guided),
        config.iterations,
        1.0,
    )
}
