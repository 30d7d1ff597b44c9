use planefx_image::{ImageError, ImageSize};

/// An error type for the recipes module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RecipeError {
    /// A parameter is outside of its valid domain.
    #[error("Invalid parameter `{0}`: {1}")]
    InvalidParameter(&'static str, String),

    /// The low-pass operator failed.
    #[error("Low-pass filter `{0}` failed")]
    LowPass(&'static str, #[source] ImageError),

    /// The low-pass operator returned a plane of the wrong size.
    #[error("Low-pass filter `{0}` returned a plane of size {1}, expected {2}")]
    LowPassShape(&'static str, ImageSize, ImageSize),

    /// Two inputs that must match in size do not.
    #[error("Input size mismatch: {0} vs {1}")]
    SizeMismatch(ImageSize, ImageSize),

    /// A frame sequence is empty.
    #[error("The frame sequence is empty")]
    EmptyClip,

    /// Error from the image primitives.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Fail with [`RecipeError::InvalidParameter`] unless `value` is finite and positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<(), RecipeError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(RecipeError::InvalidParameter(
            name,
            format!("must be positive, got {value}"),
        ));
    }
    Ok(())
}

/// Fail with [`RecipeError::SizeMismatch`] unless both sizes agree.
pub(crate) fn ensure_same_size(a: ImageSize, b: ImageSize) -> Result<(), RecipeError> {
    if a != b {
        return Err(RecipeError::SizeMismatch(a, b));
    }
    Ok(())
}
