#![deny(missing_docs)]
//! Image types and sample formats for plane filtering

/// image representation for plane filtering.
pub mod image;

/// Error types for the image module.
pub mod error;

/// image operations to cast and convert sample formats.
pub mod ops;

/// sample types and formats.
pub mod sample;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize, Plane};
pub use crate::sample::{Sample, SampleFormat, SampleType};
