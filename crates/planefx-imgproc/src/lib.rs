#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image filtering module.
pub mod filter;

/// coordinate grid utilities.
pub mod grid;

/// image padding and cropping module.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// utility functions for resizing images.
pub mod resize;

/// frequency domain display module.
pub mod spectrum;

/// plane statistics module.
pub mod stats;
