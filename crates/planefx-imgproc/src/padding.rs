use planefx_image::{Image, ImageError};

/// Padding extents in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding2D {
    /// Columns added on the left.
    pub left: usize,
    /// Columns added on the right.
    pub right: usize,
    /// Rows added on the top.
    pub top: usize,
    /// Rows added on the bottom.
    pub bottom: usize,
}

/// Pad an image with a constant value.
///
/// `dst` must be `src` grown by `padding` on each side.
///
/// # Example
///
/// ```
/// use planefx_image::Image;
/// use planefx_imgproc::padding::{pad_constant, Padding2D};
///
/// let src = Image::<f32, 1>::new([1, 1].into(), vec![1.0]).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val([2, 2].into(), 9.0).unwrap();
/// let padding = Padding2D { right: 1, bottom: 1, ..Default::default() };
///
/// pad_constant(&src, &mut dst, &padding, [0.0]).unwrap();
/// assert_eq!(dst.as_slice(), &[1.0, 0.0, 0.0, 0.0]);
/// ```
pub fn pad_constant<T: Copy, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: &Padding2D,
    value: [T; C],
) -> Result<(), ImageError> {
    let width = src.width() + padding.left + padding.right;
    let height = src.height() + padding.top + padding.bottom;
    if dst.width() != width || dst.height() != height {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            width,
            height,
        ));
    }

    dst.as_slice_mut()
        .chunks_exact_mut(C)
        .for_each(|px| px.copy_from_slice(&value));

    let src_stride = src.width() * C;
    let dst_stride = width * C;
    let src_data = src.as_slice();
    let dst_data = dst.as_slice_mut();
    for r in 0..src.height() {
        let start = (r + padding.top) * dst_stride + padding.left * C;
        dst_data[start..start + src_stride]
            .copy_from_slice(&src_data[r * src_stride..(r + 1) * src_stride]);
    }

    Ok(())
}

/// Copy the region of `src` starting at (`x`, `y`) with the size of `dst`.
///
/// # Errors
///
/// Returns an error if the region does not fit into `src`.
pub fn crop<T: Copy, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError> {
    if x + dst.width() > src.width() || y + dst.height() > src.height() {
        return Err(ImageError::InvalidImageSize(
            x + dst.width(),
            y + dst.height(),
            src.width(),
            src.height(),
        ));
    }

    let src_stride = src.width() * C;
    let dst_stride = dst.width() * C;
    let src_data = src.as_slice();
    dst.as_slice_mut()
        .chunks_exact_mut(dst_stride)
        .enumerate()
        .for_each(|(r, row)| {
            let start = (y + r) * src_stride + x * C;
            row.copy_from_slice(&src_data[start..start + dst_stride]);
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_then_crop() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new([2, 2].into(), vec![1, 2, 3, 4])?;
        let padding = Padding2D {
            left: 1,
            right: 2,
            top: 1,
            bottom: 0,
        };
        let mut padded = Image::<u8, 1>::from_size_val([5, 3].into(), 7)?;
        pad_constant(&src, &mut padded, &padding, [0])?;

        #[rustfmt::skip]
        assert_eq!(
            padded.as_slice(),
            &[
                0, 0, 0, 0, 0,
                0, 1, 2, 0, 0,
                0, 3, 4, 0, 0,
            ]
        );

        let mut back = src.like(0);
        crop(&padded, &mut back, 1, 1)?;
        assert_eq!(back, src);

        assert!(crop(&padded, &mut back, 4, 0).is_err());
        Ok(())
    }
}
