use planefx_image::{ImageError, Plane};
use planefx_imgproc::filter::{box_blur_fast, gaussian_blur, kernels};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, RecipeError};
use crate::lowpass::LowPass;

/// Sigma from which [`GaussAlgorithm::Auto`] switches to the box cascade.
pub const RECURSIVE_SIGMA_THRESHOLD: f32 = 10.0;

/// How the Gaussian is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaussAlgorithm {
    /// `Recursive` for large sigmas, `Direct` otherwise.
    #[default]
    Auto,
    /// Separable convolution with a sampled Gaussian kernel.
    Direct,
    /// Cascade of three box blurs.
    Recursive,
}

/// Parameters of [`gauss`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussConfig {
    /// Standard deviation in pixels. Default `1.5`.
    pub sigma: f32,
    /// Evaluation strategy. Default [`GaussAlgorithm::Auto`].
    pub algo: GaussAlgorithm,
}

impl Default for GaussConfig {
    fn default() -> Self {
        Self {
            sigma: 1.5,
            algo: GaussAlgorithm::Auto,
        }
    }
}

impl GaussConfig {
    /// The strategy actually used for this sigma.
    pub fn resolved_algo(&self) -> GaussAlgorithm {
        match self.algo {
            GaussAlgorithm::Auto if self.sigma >= RECURSIVE_SIGMA_THRESHOLD => {
                GaussAlgorithm::Recursive
            }
            GaussAlgorithm::Auto => GaussAlgorithm::Direct,
            algo => algo,
        }
    }
}

impl LowPass for GaussConfig {
    fn name(&self) -> &'static str {
        "gauss"
    }

    fn low_pass(&self, src: &Plane<f32>) -> Result<Plane<f32>, ImageError> {
        let mut dst = src.like(0.0);
        match self.resolved_algo() {
            GaussAlgorithm::Recursive => {
                box_blur_fast(src, &mut dst, (self.sigma, self.sigma))?;
            }
            _ => {
                let kernel_size = kernels::gaussian_kernel_size(self.sigma);
                gaussian_blur(
                    src,
                    &mut dst,
                    (kernel_size, kernel_size),
                    (self.sigma, self.sigma),
                )?;
            }
        }
        Ok(dst)
    }
}

/// Gaussian blur of a unit range plane.
///
/// # Example
///
/// ```
/// use planefx_image::Image;
/// use planefx_recipes::gauss::{gauss, GaussConfig};
///
/// let src = Image::<f32, 1>::from_size_val([8, 8].into(), 0.25).unwrap();
/// let out = gauss(&src, &GaussConfig::default()).unwrap();
/// assert!(out.as_slice().iter().all(|&v| (v - 0.25).abs() < 1e-6));
/// ```
pub fn gauss(src: &Plane<f32>, config: &GaussConfig) -> Result<Plane<f32>, RecipeError> {
    ensure_positive("sigma", config.sigma as f64)?;
    log::debug!(
        "gauss: sigma={} algo={:?}",
        config.sigma,
        config.resolved_algo()
    );
    Ok(config.low_pass(src)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use planefx_image::Image;

    #[test]
    fn test_auto_switch() {
        let small = GaussConfig {
            sigma: 9.9,
            ..Default::default()
        };
        let large = GaussConfig {
            sigma: 10.0,
            ..Default::default()
        };
        assert_eq!(small.resolved_algo(), GaussAlgorithm::Direct);
        assert_eq!(large.resolved_algo(), GaussAlgorithm::Recursive);

        let forced = GaussConfig {
            sigma: 20.0,
            algo: GaussAlgorithm::Direct,
        };
        assert_eq!(forced.resolved_algo(), GaussAlgorithm::Direct);
    }

    #[test]
    fn test_direct_and_recursive_agree_on_mean() -> Result<(), RecipeError> {
        let (width, height) = (48, 40);
        let data = (0..width * height)
            .map(|i| (i % width) as f32 / width as f32)
            .collect();
        let src = Image::<f32, 1>::new([width, height].into(), data)?;

        for algo in [GaussAlgorithm::Direct, GaussAlgorithm::Recursive] {
            let out = gauss(&src, &GaussConfig { sigma: 3.0, algo })?;
            // a horizontal ramp stays a ramp in the interior
            let row = 20 * width;
            approx::assert_abs_diff_eq!(
                out.as_slice()[row + 24],
                src.as_slice()[row + 24],
                epsilon = 1e-3
            );
        }
        Ok(())
    }

    #[test]
    fn test_invalid_sigma() -> Result<(), RecipeError> {
        let src = Image::<f32, 1>::from_size_val([4, 4].into(), 0.0)?;
        let config = GaussConfig {
            sigma: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            gauss(&src, &config),
            Err(RecipeError::InvalidParameter("sigma", _))
        ));
        Ok(())
    }
}
