//! Filter operations
//!
//! This module provides filter operations for image processing.

/// Filter kernels
pub mod kernels;

mod border;
pub use border::BorderMode;

/// Fixed 1D and 3x3 convolutions
mod convolution;
pub use convolution::*;

/// Filter operations
mod ops;
pub use ops::*;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;
