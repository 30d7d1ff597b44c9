//! Bernstein filter, an implicit mean curvature regulariser.
//!
//! Gong, "Bernstein filter: A new solver for mean curvature regularized
//! models", ICASSP 2016.

use planefx_image::Plane;
use planefx_imgproc::filter::{convolve_horizontal, convolve_vertical};
use planefx_imgproc::parallel::par_iter_rows_val_three;
use serde::{Deserialize, Serialize};

use crate::error::RecipeError;

/// Parameters of [`bernstein_filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BernsteinConfig {
    /// Number of iterations. Default `30`.
    pub iterations: usize,
}

impl Default for BernsteinConfig {
    fn default() -> Self {
        Self { iterations: 30 }
    }
}

/// Move every sample by the smaller of its half second differences.
///
/// With `d1` and `d2` the horizontal and vertical `[1, -2, 1] / 2`
/// responses, each iteration sets `x = |d1| < |d2| ? x + d1 : x + d2`.
pub fn bernstein_filter(
    src: &Plane<f32>,
    config: &BernsteinConfig,
) -> Result<Plane<f32>, RecipeError> {
    log::debug!("bernstein: iterations={}", config.iterations);

    let mut current = src.clone();
    let mut d1 = src.like(0.0);
    let mut d2 = src.like(0.0);
    let mut next = src.like(0.0);

    for _ in 0..config.iterations {
        convolve_horizontal(&current, &mut d1, &[1.0, -2.0, 1.0], 2.0)?;
        convolve_vertical(&current, &mut d2, &[1.0, -2.0, 1.0], 2.0)?;
        par_iter_rows_val_three(&current, &d1, &d2, &mut next, |&x, &d1, &d2, out| {
            *out = if d1.abs() < d2.abs() { x + d1 } else { x + d2 };
        });
        std::mem::swap(&mut current, &mut next);
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use planefx_image::Image;

    #[test]
    fn test_impulse_vanishes() -> Result<(), RecipeError> {
        let mut src = Image::<f32, 1>::from_size_val([5, 5].into(), 0.0)?;
        src.as_slice_mut()[12] = 1.0;

        let out = bernstein_filter(&src, &BernsteinConfig { iterations: 1 })?;
        assert!(out.as_slice().iter().all(|&v| v == 0.0));
        Ok(())
    }

    #[test]
    fn test_ramp_is_fixed_point() -> Result<(), RecipeError> {
        let data = (0..24).map(|i| (i % 6) as f32 * 0.1).collect();
        let src = Image::<f32, 1>::new([6, 4].into(), data)?;

        let out = bernstein_filter(&src, &BernsteinConfig::default())?;
        assert_eq!(out, src);
        Ok(())
    }
}
