//! Bilateral filter approximated by a Gaussian-polynomial series.
//!
//! The range kernel `exp(-(x_j - x_i)^2 / 2 sigma_r^2)` is expanded into a
//! truncated power series in `h = (x - T) / sigma_r`. Every term is a low-pass
//! of a pointwise function of the input, so the filter costs `N + 1` runs of
//! an ordinary smoothing operator.

use planefx_image::{Image, Plane, Sample};
use planefx_imgproc::parallel::{
    par_iter_rows_update_two, par_iter_rows_val, par_iter_rows_val_three,
};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_same_size, RecipeError};
use crate::lowpass::{apply_low_pass, BoxLowPass, GaussianLowPass, LowPass};
use crate::planes::map_all_planes;

/// Centre of the series expansion in unit range.
pub const GPA_T: f32 = 0.5;

/// Added to the denominator when the two sums are combined.
pub const Q_EPSILON: f32 = 1e-5;

/// Scale of the sample range the iteration estimator is calibrated for.
const ESTIMATOR_RANGE: f64 = 255.0;

/// Term counts of the wide and the narrow bandwidth ranges.
const MIN_TERMS: usize = 10;
const MAX_TERMS: usize = 800;

/// The smoothing operator used for every series term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpaMode {
    /// Gaussian blur with `sigma = sigma_s`.
    #[default]
    Gaussian,
    /// Box blur of radius `round(sigma_s)`.
    Box,
}

/// Parameters of [`gpa`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpaConfig {
    /// Spatial bandwidth in pixels. Default `3.0`.
    pub sigma_s: f32,
    /// Range bandwidth in unit range. Default `0.15`.
    pub sigma_r: f32,
    /// Low-pass operator. Default [`GpaMode::Gaussian`].
    pub mode: GpaMode,
    /// Number of series terms, `0` to estimate it from `sigma_r` and `eps`.
    pub iteration: usize,
    /// Target accuracy of the estimated term count. Default `1e-3`.
    pub eps: f64,
}

impl Default for GpaConfig {
    fn default() -> Self {
        Self {
            sigma_s: 3.0,
            sigma_r: 0.15,
            mode: GpaMode::Gaussian,
            iteration: 0,
            eps: 1e-3,
        }
    }
}

impl GpaConfig {
    /// Check the bandwidths and the accuracy.
    pub fn validate(&self) -> Result<(), RecipeError> {
        ensure_positive("sigma_s", self.sigma_s as f64)?;
        ensure_positive("sigma_r", self.sigma_r as f64)?;
        ensure_positive("eps", self.eps)?;
        Ok(())
    }

    /// The number of series terms, either fixed or estimated.
    ///
    /// The estimate is computed with both `sigma_r` and [`GPA_T`] expressed on
    /// the 8-bit sample scale.
    pub fn iterations(&self) -> usize {
        match self.iteration {
            0 => estimate_iteration(
                self.sigma_r as f64 * ESTIMATOR_RANGE,
                GPA_T as f64 * ESTIMATOR_RANGE,
                self.eps,
            ),
            n => n,
        }
    }

    fn low_pass(&self) -> Box<dyn LowPass> {
        match self.mode {
            GpaMode::Gaussian => Box::new(GaussianLowPass {
                sigma: self.sigma_s,
            }),
            GpaMode::Box => Box::new(BoxLowPass {
                radius: self.sigma_s.round() as usize,
            }),
        }
    }
}

/// Estimate how many series terms reach the accuracy `eps`.
///
/// `sigma_r` and `t` are expressed on the same sample scale. Above `70` a
/// fixed count of `10` is returned and below `5` a fixed count of `800`.
/// In between the count is the larger root of `N ln N - p N - q = 0` with
/// `p = 1 + ln(lam)`, `q = -lam - ln(eps)` and `lam = (t / sigma_r)^2`,
/// clamped to `[10, 800]`. The root is seeded with an asymptotic inverse of
/// `x ln x` and polished by Newton steps kept inside a bracket `[lam, hi]`.
///
/// The count never decreases when `eps` or `sigma_r` decreases.
///
/// # Example
///
/// ```
/// use planefx_recipes::gpa::estimate_iteration;
///
/// assert_eq!(estimate_iteration(100.0, 0.5, 1e-3), 10);
/// assert_eq!(estimate_iteration(1.0, 0.5, 1e-3), 800);
/// assert_eq!(estimate_iteration(38.25, 127.5, 1e-3), 26);
/// ```
pub fn estimate_iteration(sigma_r: f64, t: f64, eps: f64) -> usize {
    if sigma_r > 70.0 {
        return MIN_TERMS;
    }
    if sigma_r < 5.0 {
        return MAX_TERMS;
    }

    let lam = (t / sigma_r).powi(2);
    let p = 1.0 + lam.ln();
    let q = -lam - eps.ln();

    let tt = q / std::f64::consts::E / lam;
    let w = tt - tt.powi(2) + 1.5 * tt.powi(3) - (8.0 / 3.0) * tt.powi(4);
    let seed = (q / w).clamp(10.0, 300.0);

    let n = larger_root(lam, p, q, seed);
    (n.ceil() as usize).clamp(MIN_TERMS, MAX_TERMS)
}

/// Root of `f(n) = n ln n - p n - q` on the increasing branch `n >= lam`.
///
/// `f` is convex with its minimum `ln(eps)` at `lam`, so the bracket
/// `[lam, hi]` holds exactly one root whenever `eps < 1`.
fn larger_root(lam: f64, p: f64, q: f64, seed: f64) -> f64 {
    let f = |n: f64| n * n.ln() - p * n - q;

    let mut lo = lam;
    if f(lo) >= 0.0 {
        return lo;
    }
    let mut hi = (2.0 * lo).max(seed);
    while f(hi) <= 0.0 {
        hi *= 2.0;
    }

    let mut n = if seed > lo && seed < hi {
        seed
    } else {
        0.5 * (lo + hi)
    };
    for _ in 0..100 {
        let value = f(n);
        if value < 0.0 {
            lo = n;
        } else {
            hi = n;
        }

        // Newton, falling back to bisection when the step leaves the bracket
        let mut next = n - value / (n.ln() + 1.0 - p);
        if !(next.is_finite() && next > lo && next < hi) {
            next = 0.5 * (lo + hi);
        }
        if (next - n).abs() <= 1e-12 * n {
            return next;
        }
        n = next;
    }
    n
}

/// The two running sums of the series.
///
/// Both sums are stored multiplied per pixel by `scale = exp(-h^2 / 2)`.
/// The unscaled sums grow like `exp(h^2 / 2)` and leave the `f32` range once
/// `|h|` exceeds about 13, the scaled ones stay below the kernel mass.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSums {
    /// Numerator sum.
    pub p: Plane<f32>,
    /// Denominator sum.
    pub q: Plane<f32>,
    /// Per pixel factor applied to both sums.
    pub scale: Plane<f32>,
}

/// The `i`-th series term `h^i exp(-h^2 / 2) / sqrt(i!)`.
///
/// Evaluated through its logarithm so that neither factor over- or
/// underflows on its own. `half_log_factorial` is `ln(i!) / 2`.
fn series_term(h: f32, i: usize, half_log_factorial: f64) -> f32 {
    let h = h as f64;
    if i == 0 {
        return (-0.5 * h * h).exp() as f32;
    }
    if h == 0.0 {
        return 0.0;
    }

    let magnitude = (i as f64 * h.abs().ln() - 0.5 * h * h - half_log_factorial).exp();
    if h < 0.0 && i % 2 == 1 {
        -magnitude as f32
    } else {
        magnitude as f32
    }
}

/// Accumulate `n` terms of the series for the normalised plane `h`.
///
/// Starting from `F = exp(-h^2 / 2)`, `G = 1` and `P = Q = 0`, every
/// iteration `i` performs, in order:
///
/// 1. `Q += G * L(F)`
/// 2. `F = h * F / sqrt(i)`
/// 3. `P += G * L(F) * sqrt(i)`
/// 4. `G = h * G / sqrt(i)`
///
/// where `L` is `lowpass`. `F` is evaluated in closed form rather than by the
/// recurrence, and the returned sums are scaled as described on
/// [`SeriesSums`], which turns the scaled `G` into the unfiltered `F` of the
/// previous term. With `n == 0` both sums are zero.
///
/// # Errors
///
/// A failing `lowpass`, or one that changes the plane size, aborts the whole
/// accumulation.
pub fn accumulate<L: LowPass + ?Sized>(
    h: &Plane<f32>,
    lowpass: &L,
    n: usize,
) -> Result<SeriesSums, RecipeError> {
    let mut f = h.like(0.0);
    par_iter_rows_val(h, &mut f, |&h, f| *f = series_term(h, 0, 0.0));

    let scale = f.clone();
    let mut g = h.like(0.0);
    let mut p = h.like(0.0);
    let mut q = h.like(0.0);

    let mut f_bar = apply_low_pass(lowpass, &f)?;
    let mut half_log_factorial = 0.0;

    for i in 1..=n {
        log::trace!("gpa: term {i}/{n}");

        let sqrt_i = (i as f32).sqrt();
        half_log_factorial += 0.5 * (i as f64).ln();

        // the scaled G equals F before the update
        par_iter_rows_update_two(&mut q, &f, &f_bar, |q, &g, &f_bar| *q += g * f_bar);
        std::mem::swap(&mut g, &mut f);
        par_iter_rows_val(h, &mut f, |&h, f| {
            *f = series_term(h, i, half_log_factorial)
        });
        f_bar = apply_low_pass(lowpass, &f)?;
        par_iter_rows_update_two(&mut p, &g, &f_bar, |p, &g, &f_bar| {
            *p += g * f_bar * sqrt_i
        });
    }

    Ok(SeriesSums { p, q, scale })
}

/// Combine the sums into `dst = P * sigma_r / (Q + 1e-5) + t`.
///
/// The constant is scaled along with the sums. A pixel whose denominator is
/// exactly zero takes the value `t`.
pub fn combine(
    sums: &SeriesSums,
    sigma_r: f32,
    t: f32,
    dst: &mut Plane<f32>,
) -> Result<(), RecipeError> {
    ensure_same_size(sums.p.size(), sums.q.size())?;
    ensure_same_size(sums.p.size(), sums.scale.size())?;
    ensure_same_size(sums.p.size(), dst.size())?;

    par_iter_rows_val_three(&sums.p, &sums.q, &sums.scale, dst, |&p, &q, &scale, d| {
        let denominator = q + Q_EPSILON * scale;
        *d = if denominator == 0.0 {
            t
        } else {
            p * sigma_r / denominator + t
        };
    });

    Ok(())
}

/// Filter a unit range plane with `n` series terms of `lowpass`.
pub fn gpa_plane<L: LowPass + ?Sized>(
    src: &Plane<f32>,
    lowpass: &L,
    sigma_r: f32,
    n: usize,
) -> Result<Plane<f32>, RecipeError> {
    ensure_positive("sigma_r", sigma_r as f64)?;

    let mut h = src.like(0.0);
    par_iter_rows_val(src, &mut h, |&x, h| *h = (x - GPA_T) / sigma_r);

    let sums = accumulate(&h, lowpass, n)?;

    let mut dst = src.like(0.0);
    combine(&sums, sigma_r, GPA_T, &mut dst)?;
    Ok(dst)
}

/// Approximate a bilateral filter on every plane of `src`.
///
/// Samples use all bits of `T`, see [`gpa_with_depth`] for partial depths.
///
/// # Example
///
/// ```
/// use planefx_image::Image;
/// use planefx_recipes::gpa::{gpa, GpaConfig};
///
/// let src = Image::<u8, 1>::from_size_val([16, 16].into(), 128).unwrap();
/// let mut dst = src.like(0);
///
/// gpa(&src, &mut dst, &GpaConfig::default()).unwrap();
/// assert!(dst.as_slice().iter().all(|&v| v == 128));
/// ```
pub fn gpa<T: Sample, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    config: &GpaConfig,
) -> Result<(), RecipeError> {
    gpa_with_depth(src, dst, T::MAX_BITS, config)
}

/// Approximate a bilateral filter on samples with `bits` significant bits.
///
/// # Errors
///
/// Invalid bandwidths or accuracy are reported before any term is computed.
pub fn gpa_with_depth<T: Sample, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    bits: u32,
    config: &GpaConfig,
) -> Result<(), RecipeError> {
    config.validate()?;
    ensure_same_size(src.size(), dst.size())?;

    let n = config.iterations();
    log::debug!(
        "gpa: sigma_s={} sigma_r={} mode={:?} terms={}",
        config.sigma_s,
        config.sigma_r,
        config.mode,
        n
    );

    let lowpass = config.low_pass();
    map_all_planes(src, dst, bits, |plane| {
        gpa_plane(plane, lowpass.as_ref(), config.sigma_r, n)
    })
}
