//! Low-pass operators injected into the recipes.

use planefx_image::{ImageError, Plane};
use planefx_imgproc::filter::{box_filter, gaussian_blur, kernels};

use crate::error::RecipeError;

/// A smoothing operator over a single `f32` plane.
///
/// Recipes such as [`crate::gpa::gpa`] or [`crate::merge::freq_merge`] are
/// parameterised by the low-pass they use. Any
/// `Fn(&Plane<f32>) -> Result<Plane<f32>, ImageError>` closure is a `LowPass`.
pub trait LowPass: Sync {
    /// Short name used in error messages and logs.
    fn name(&self) -> &'static str {
        "closure"
    }

    /// Smooth `src` and return a plane of the same size.
    fn low_pass(&self, src: &Plane<f32>) -> Result<Plane<f32>, ImageError>;
}

impl<F> LowPass for F
where
    F: Fn(&Plane<f32>) -> Result<Plane<f32>, ImageError> + Sync,
{
    fn low_pass(&self, src: &Plane<f32>) -> Result<Plane<f32>, ImageError> {
        self(src)
    }
}

/// Run `lowpass` on `src`, attributing failures and size changes to it.
pub fn apply_low_pass<L: LowPass + ?Sized>(
    lowpass: &L,
    src: &Plane<f32>,
) -> Result<Plane<f32>, RecipeError> {
    let out = lowpass
        .low_pass(src)
        .map_err(|e| RecipeError::LowPass(lowpass.name(), e))?;

    if out.size() != src.size() {
        return Err(RecipeError::LowPassShape(
            lowpass.name(),
            out.size(),
            src.size(),
        ));
    }

    Ok(out)
}

/// Gaussian blur with a kernel of `2 * ceil(3 * sigma) + 1` taps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianLowPass {
    /// Standard deviation in pixels.
    pub sigma: f32,
}

impl LowPass for GaussianLowPass {
    fn name(&self) -> &'static str {
        "gaussian"
    }

    fn low_pass(&self, src: &Plane<f32>) -> Result<Plane<f32>, ImageError> {
        let kernel_size = kernels::gaussian_kernel_size(self.sigma);
        let mut dst = src.like(0.0);
        gaussian_blur(
            src,
            &mut dst,
            (kernel_size, kernel_size),
            (self.sigma, self.sigma),
        )?;
        Ok(dst)
    }
}

/// Mean over a `(2 * radius + 1)^2` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxLowPass {
    /// Half size of the window.
    pub radius: usize,
}

impl LowPass for BoxLowPass {
    fn name(&self) -> &'static str {
        "box"
    }

    fn low_pass(&self, src: &Plane<f32>) -> Result<Plane<f32>, ImageError> {
        let mut dst = src.like(0.0);
        box_filter(src, &mut dst, (self.radius, self.radius))?;
        Ok(dst)
    }
}

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl LowPass for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn low_pass(&self, src: &Plane<f32>) -> Result<Plane<f32>, ImageError> {
        Ok(src.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planefx_image::Image;

    #[test]
    fn test_box_low_pass_constant() -> Result<(), RecipeError> {
        let src = Image::<f32, 1>::from_size_val([5, 4].into(), 0.25)?;
        let out = apply_low_pass(&BoxLowPass { radius: 2 }, &src)?;
        for &v in out.as_slice() {
            approx::assert_relative_eq!(v, 0.25, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn test_closure_errors_are_attributed() -> Result<(), RecipeError> {
        let src = Image::<f32, 1>::from_size_val([3, 3].into(), 0.0)?;

        let failing =
            |_: &Plane<f32>| -> Result<Plane<f32>, ImageError> { Err(ImageError::ZeroDivisor) };
        assert_eq!(
            apply_low_pass(&failing, &src),
            Err(RecipeError::LowPass("closure", ImageError::ZeroDivisor))
        );

        let shrinking = |_: &Plane<f32>| Image::<f32, 1>::from_size_val([2, 2].into(), 0.0);
        assert!(matches!(
            apply_low_pass(&shrinking, &src),
            Err(RecipeError::LowPassShape("closure", _, _))
        ));
        Ok(())
    }
}
