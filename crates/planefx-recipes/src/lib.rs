#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Bernstein mean curvature filter.
pub mod bernstein;

/// Error types for the recipes module.
pub mod error;

/// Frame sequence fades.
pub mod fade;

/// Gaussian blur with an automatic recursive fallback for large sigma.
pub mod gauss;

/// Gaussian-polynomial approximation of the bilateral filter.
pub mod gpa;

/// Display of the centred power spectrum.
pub mod gps;

/// Guided filter and reverse filtering.
pub mod guided;

/// Injectable low-pass operators.
pub mod lowpass;

/// Fractal rendering.
pub mod mandelbrot;

/// Frequency band merging.
pub mod merge;

/// Plane level helpers over multi channel images.
pub mod planes;

/// Single-scale retinex.
pub mod retinex;

/// Sharpening detail masks.
pub mod sbr;

/// Total variation denoising.
pub mod tv;

/// Adaptive Wiener denoising.
pub mod wiener;

/// eXtended difference of Gaussians.
pub mod xdog;

pub use crate::error::RecipeError;
pub use crate::lowpass::LowPass;
