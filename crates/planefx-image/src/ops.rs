use crate::{sample::Sample, Image, ImageError};

/// Cast the pixel data of an image to a different type.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
/// * `scale` - The scale to multiply the pixel data with.
///
/// Example:
///
/// ```
/// use planefx_image::{Image, ImageSize};
/// use planefx_image::ops::cast_and_scale;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 2,
///     height: 1,
///   },
///   vec![0u8, 255],
/// ).unwrap();
///
/// let mut image_f32 = Image::from_size_val(image.size(), 0.0f32).unwrap();
///
/// cast_and_scale(&image, &mut image_f32, 1. / 255.0).unwrap();
///
/// assert_eq!(image_f32.get_pixel(0, 0, 0).unwrap(), 0.0f32);
/// assert_eq!(image_f32.get_pixel(1, 0, 0).unwrap(), 1.0f32);
/// ```
pub fn cast_and_scale<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: U,
) -> Result<(), ImageError>
where
    T: Copy + num_traits::NumCast,
    U: Copy + num_traits::NumCast + std::ops::Mul<U, Output = U>,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .try_for_each(|(out, &inp)| {
            let x = U::from(inp).ok_or(ImageError::CastError(
                std::any::type_name::<U>().to_string(),
            ))?;
            *out = x * scale;
            Ok::<(), ImageError>(())
        })?;

    Ok(())
}

/// Convert an image to unit range `f32` samples.
///
/// Integer samples with `bits` significant bits are divided by `2^bits - 1`.
///
/// # Errors
///
/// Returns an error if `bits` is not supported by `T`.
pub fn to_unit_f32<T: Sample, const C: usize>(
    src: &Image<T, C>,
    bits: u32,
) -> Result<Image<f32, C>, ImageError> {
    T::check_bits(bits)?;
    let data = src.as_slice().iter().map(|&v| v.to_unit(bits)).collect();
    Image::new(src.size(), data)
}

/// Convert a unit range `f32` image back to samples of type `T`.
///
/// Integer outputs are rounded and clamped to `[0, 2^bits - 1]`.
///
/// # Errors
///
/// Returns an error if `bits` is not supported by `T` or the sizes differ.
pub fn from_unit_f32<T: Sample, const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<T, C>,
    bits: u32,
) -> Result<(), ImageError> {
    T::check_bits(bits)?;

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice())
        .for_each(|(out, &v)| *out = T::from_unit(v, bits));

    Ok(())
}
