use planefx_image::{Image, ImageSize, Plane};
use planefx_imgproc::padding::{crop, pad_constant, Padding2D};
use planefx_imgproc::resize::resize_bilinear;
use planefx_imgproc::spectrum::power_spectrum;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, RecipeError};

/// Parameters of [`gps`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpsConfig {
    /// Display exponent, values below one brighten weak responses. Default `1`.
    pub gamma: f32,
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self { gamma: 1.0 }
    }
}

/// Display the power spectrum of a plane at the size of the plane.
///
/// The plane is padded with zeros on the right and bottom to a square, its
/// centred power spectrum is computed, the left half is kept and resized
/// back to the input size.
pub fn gps(src: &Plane<f32>, config: &GpsConfig) -> Result<Plane<f32>, RecipeError> {
    ensure_positive("gamma", config.gamma as f64)?;

    let side = src.width().max(src.height());
    log::debug!("gps: {} padded to {side}x{side}", src.size());

    let square = ImageSize {
        width: side,
        height: side,
    };
    let mut padded = Image::<f32, 1>::from_size_val(square, 0.0)?;
    let padding = Padding2D {
        right: side - src.width(),
        bottom: side - src.height(),
        ..Default::default()
    };
    pad_constant(src, &mut padded, &padding, [0.0])?;

    let mut spectrum = padded.like(0.0);
    power_spectrum(&padded, &mut spectrum, config.gamma)?;

    let half = ImageSize {
        width: side - side / 2,
        height: side,
    };
    let mut left = Image::<f32, 1>::from_size_val(half, 0.0)?;
    crop(&spectrum, &mut left, 0, 0)?;

    let mut dst = src.like(0.0);
    resize_bilinear(&left, &mut dst)?;
    Ok(dst)
}
