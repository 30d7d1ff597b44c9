//! Lift single plane recipes over multi channel images of any sample type.

use planefx_image::{
    ops::{from_unit_f32, to_unit_f32},
    Image, ImageError, Plane, Sample,
};

use crate::error::{ensure_same_size, RecipeError};

/// Run `f` on the selected planes of `src` and write the result into `dst`.
///
/// Samples are converted to unit range `f32` before `f` runs and converted
/// back, rounded and clamped, afterwards. Planes not listed in `planes` are
/// copied through the same conversion.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image with the same size as `src`.
/// * `bits` - Significant bits per sample of `src` and `dst`.
/// * `planes` - Indices of the planes to process.
/// * `f` - The single plane recipe.
pub fn map_planes<T: Sample, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    bits: u32,
    planes: &[usize],
    mut f: impl FnMut(&Plane<f32>) -> Result<Plane<f32>, RecipeError>,
) -> Result<(), RecipeError> {
    ensure_same_size(src.size(), dst.size())?;
    if let Some(&bad) = planes.iter().find(|&&p| p >= C) {
        return Err(ImageError::ChannelIndexOutOfBounds(bad, C).into());
    }

    let mut channels = to_unit_f32(src, bits)?.split_channels()?;
    for &p in planes {
        let out = f(&channels[p])?;
        ensure_same_size(out.size(), src.size())?;
        channels[p] = out;
    }

    let merged = Image::<f32, C>::from_channels(&channels)?;
    from_unit_f32(&merged, dst, bits)?;

    Ok(())
}

/// Run `f` on every plane of `src`, see [`map_planes`].
pub fn map_all_planes<T: Sample, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    bits: u32,
    f: impl FnMut(&Plane<f32>) -> Result<Plane<f32>, RecipeError>,
) -> Result<(), RecipeError> {
    let planes: Vec<usize> = (0..C).collect();
    map_planes(src, dst, bits, &planes, f)
}
