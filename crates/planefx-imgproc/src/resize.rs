use planefx_image::{Image, ImageError};
use rayon::prelude::*;

use crate::grid::linspace;

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel values.
fn bilinear_interpolation<const C: usize>(image: &Image<f32, C>, u: f32, v: f32) -> [f32; C] {
    let (rows, cols) = (image.rows(), image.cols());

    let iu0 = (u.trunc() as usize).min(cols - 1);
    let iv0 = (v.trunc() as usize).min(rows - 1);

    let frac_u = u.fract();
    let frac_v = v.fract();

    let w00 = (1.0 - frac_u) * (1.0 - frac_v);
    let w01 = frac_u * (1.0 - frac_v);
    let w10 = (1.0 - frac_u) * frac_v;
    let w11 = frac_u * frac_v;

    let iu1 = (iu0 + 1).min(cols - 1);
    let iv1 = (iv0 + 1).min(rows - 1);

    let data = image.as_slice();
    let base = |iv: usize, iu: usize| (iv * cols + iu) * C;
    let (b00, b01, b10, b11) = (
        base(iv0, iu0),
        base(iv0, iu1),
        base(iv1, iu0),
        base(iv1, iu1),
    );

    let mut pixel = [0.0; C];
    for (k, p) in pixel.iter_mut().enumerate() {
        *p = data[b00 + k] * w00 + data[b01 + k] * w01 + data[b10 + k] * w10 + data[b11 + k] * w11;
    }

    pixel
}

/// Resize an image to the size of `dst` with bilinear interpolation.
///
/// Corner samples of `src` map onto corner samples of `dst`.
///
/// # Example
///
/// ```
/// use planefx_image::Image;
/// use planefx_imgproc::resize::resize_bilinear;
///
/// let src = Image::<f32, 1>::new([2, 1].into(), vec![0.0, 1.0]).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val([3, 1].into(), 0.0).unwrap();
///
/// resize_bilinear(&src, &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[0.0, 0.5, 1.0]);
/// ```
pub fn resize_bilinear<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
) -> Result<(), ImageError> {
    if src.size() == dst.size() {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let xs = linspace(0.0, (src.width() - 1) as f32, dst.width());
    let ys = linspace(0.0, (src.height() - 1) as f32, dst.height());
    let cols = dst.cols();

    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .zip(ys.par_iter())
        .for_each(|(row, &v)| {
            row.chunks_exact_mut(C)
                .zip(xs.iter())
                .for_each(|(out, &u)| {
                    out.copy_from_slice(&bilinear_interpolation(src, u, v));
                });
        });

    Ok(())
}
