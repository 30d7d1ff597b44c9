//! Escape-time rendering of the Mandelbrot and Julia sets.

use num_complex::Complex32;
use planefx_image::Plane;
use planefx_imgproc::grid::linspace;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::RecipeError;

/// Parameters of [`mandelbrot`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MandelbrotConfig {
    /// Maximum number of iterations. Default `50`.
    pub iterations: usize,
    /// Real part at the left and right columns. Default `(-2, 1)`.
    pub real_range: (f32, f32),
    /// Imaginary part at the bottom and top rows. Default `(-1, 1)`.
    pub imag_range: (f32, f32),
    /// The constant `c` as `(re, im)`. Default `0`.
    pub c: (f32, f32),
    /// Render the Julia set of `c` instead of the Mandelbrot set.
    pub julia_set: bool,
}

impl Default for MandelbrotConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            real_range: (-2.0, 1.0),
            imag_range: (-1.0, 1.0),
            c: (0.0, 0.0),
            julia_set: false,
        }
    }
}

impl MandelbrotConfig {
    fn validate(&self) -> Result<(), RecipeError> {
        if self.iterations == 0 {
            return Err(RecipeError::InvalidParameter(
                "iterations",
                "must be at least 1".to_string(),
            ));
        }
        for (name, (low, high)) in [
            ("real_range", self.real_range),
            ("imag_range", self.imag_range),
        ] {
            if !(low < high) {
                return Err(RecipeError::InvalidParameter(
                    name,
                    format!("expected low < high, got ({low}, {high})"),
                ));
            }
        }
        Ok(())
    }
}

/// Escape counter of a single point.
///
/// Starts at `1` and loses `1 / iterations` for every iterate that stays
/// within `|z| < 2`.
fn escape_counter(z0: Complex32, add: Complex32, iterations: usize) -> f32 {
    let step = 1.0 / iterations as f32;
    let mut z = z0;
    let mut counter = 1.0f32;
    for _ in 0..iterations {
        let next = z * z + add;
        if next.norm_sqr() >= 4.0 {
            break;
        }
        z = next;
        counter -= step;
    }
    counter
}

/// Render the set into `dst`.
///
/// Columns sample the real axis from left to right and rows the imaginary
/// axis from top to bottom. In Mandelbrot mode the iteration starts at `c`
/// and adds the pixel; in Julia mode it starts at the pixel and adds `c`.
/// Points inside the set end near `0`, points escaping at once stay at `1`.
///
/// # Example
///
/// ```
/// use planefx_image::Image;
/// use planefx_recipes::mandelbrot::{mandelbrot, MandelbrotConfig};
///
/// let mut dst = Image::<f32, 1>::from_size_val([64, 48].into(), 0.0).unwrap();
/// mandelbrot(&mut dst, &MandelbrotConfig::default()).unwrap();
/// assert!(dst.as_slice().iter().all(|&v| (-1e-3..=1.0).contains(&v)));
/// ```
pub fn mandelbrot(dst: &mut Plane<f32>, config: &MandelbrotConfig) -> Result<(), RecipeError> {
    config.validate()?;
    log::debug!(
        "mandelbrot: {} iterations={} julia={}",
        dst.size(),
        config.iterations,
        config.julia_set
    );

    let xs = linspace(config.real_range.0, config.real_range.1, dst.width());
    let ys = linspace(config.imag_range.1, config.imag_range.0, dst.height());
    let c = Complex32::new(config.c.0, config.c.1);
    let (iterations, julia_set) = (config.iterations, config.julia_set);
    let cols = dst.cols();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .zip(ys.par_iter())
        .for_each(|(row, &im)| {
            for (out, &re) in row.iter_mut().zip(xs.iter()) {
                let pixel = Complex32::new(re, im);
                *out = if julia_set {
                    escape_counter(pixel, c, iterations)
                } else {
                    escape_counter(c, pixel, iterations)
                };
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planefx_image::Image;

    #[test]
    fn test_mandelbrot_grid() -> Result<(), RecipeError> {
        // columns -2, -1, 0, 1 and rows 1, 0, -1
        let mut dst = Image::<f32, 1>::from_size_val([4, 3].into(), -1.0)?;
        mandelbrot(&mut dst, &MandelbrotConfig::default())?;

        let at = |x: usize, y: usize| dst.as_slice()[y * 4 + x];
        // -2 + i escapes at once
        assert_eq!(at(0, 0), 1.0);
        // 1 + i survives one iterate
        approx::assert_abs_diff_eq!(at(3, 0), 0.98, epsilon = 1e-6);
        // 0 and -1 belong to the set
        approx::assert_abs_diff_eq!(at(2, 1), 0.0, epsilon = 1e-5);
        approx::assert_abs_diff_eq!(at(1, 1), 0.0, epsilon = 1e-5);
        // conjugate symmetry
        assert_eq!(at(3, 0), at(3, 2));
        Ok(())
    }

    #[test]
    fn test_julia_unit_circle() -> Result<(), RecipeError> {
        let mut dst = Image::<f32, 1>::from_size_val([4, 3].into(), -1.0)?;
        let config = MandelbrotConfig {
            julia_set: true,
            iterations: 10,
            ..Default::default()
        };
        mandelbrot(&mut dst, &config)?;

        // z -> z^2 keeps |z| <= 1 bounded
        approx::assert_abs_diff_eq!(dst.as_slice()[4 + 1], 0.0, epsilon = 1e-5);
        approx::assert_abs_diff_eq!(dst.as_slice()[4 + 2], 0.0, epsilon = 1e-5);
        assert_eq!(dst.as_slice()[0], 1.0);
        Ok(())
    }

    #[test]
    fn test_invalid_config() -> Result<(), RecipeError> {
        let mut dst = Image::<f32, 1>::from_size_val([2, 2].into(), 0.0)?;
        let config = MandelbrotConfig {
            real_range: (1.0, -2.0),
            ..Default::default()
        };
        assert!(matches!(
            mandelbrot(&mut dst, &config),
            Err(RecipeError::InvalidParameter("real_range", _))
        ));

        let config = MandelbrotConfig {
            iterations: 0,
            ..Default::default()
        };
        assert!(mandelbrot(&mut dst, &config).is_err());
        Ok(())
    }
}
