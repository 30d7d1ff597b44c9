/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the image has no pixels.
    #[error("Image size must be non-zero, got {0}x{1}")]
    EmptyImage(usize, usize),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images are expected to have the same size.
    #[error("Image size ({0}x{1}) does not match the expected size ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel value cannot be cast.
    #[error("Failed to cast image data to {0}")]
    CastError(String),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds for {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel ({0}, {1}) is out of bounds for a {2}x{3} image")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a filter kernel is empty.
    #[error("Invalid kernel length: kernel_x={0}, kernel_y={1}")]
    InvalidKernelLength(usize, usize),

    /// Error when the number of planes does not match the channel count.
    #[error("Expected {1} planes, got {0}")]
    InvalidPlaneCount(usize, usize),

    /// Error when the bit depth is not supported by the sample type.
    #[error("Unsupported bit depth {0} for sample type {1}")]
    UnsupportedBitDepth(u32, &'static str),

    /// Error when a divisor is zero.
    #[error("Divisor must be non-zero")]
    ZeroDivisor,
}
