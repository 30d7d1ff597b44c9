use planefx_image::{Image, ImageError};
use rayon::prelude::*;

use super::BorderMode;
use crate::parallel::ExecutionStrategy;

/// Trait for floating point casting
pub trait FloatConversion: Copy + Send + Sync {
    /// Convert the type to f32
    fn to_f32(&self) -> f32;
    /// Convert the type from f32
    fn from_f32(val: f32) -> Self;
}

impl FloatConversion for f32 {
    fn to_f32(&self) -> f32 {
        *self
    }

    fn from_f32(val: f32) -> Self {
        val
    }
}

impl FloatConversion for u8 {
    fn to_f32(&self) -> f32 {
        *self as f32
    }

    fn from_f32(val: f32) -> Self {
        val.round().clamp(0.0, 255.0) as u8
    }
}

impl FloatConversion for u16 {
    fn to_f32(&self) -> f32 {
        *self as f32
    }

    fn from_f32(val: f32) -> Self {
        val.round().clamp(0.0, 65535.0) as u16
    }
}

/// A separable 2D filter that applies horizontal and vertical 1D correlations sequentially.
struct SeparableFilter<'a> {
    kernel_x: &'a [f32],
    kernel_y: &'a [f32],
    half_x: isize,
    half_y: isize,
    border: BorderMode,
}

impl<'a> SeparableFilter<'a> {
    fn new(kernel_x: &'a [f32], kernel_y: &'a [f32], border: BorderMode) -> Self {
        Self {
            kernel_x,
            kernel_y,
            half_x: (kernel_x.len() / 2) as isize,
            half_y: (kernel_y.len() / 2) as isize,
            border,
        }
    }

    /// Filter one row horizontally into `row_out`.
    #[inline]
    fn horizontal_row<T: FloatConversion, const C: usize>(
        &self,
        row_in: &[T],
        row_out: &mut [f32],
        cols: usize,
    ) {
        for c in 0..cols {
            let mut acc = [0.0f32; C];
            for (i, &k) in self.kernel_x.iter().enumerate() {
                let x = c as isize + i as isize - self.half_x;
                if let Some(x) = self.border.map_index(x, cols) {
                    let idx = x * C;
                    for (ch, acc_val) in acc.iter_mut().enumerate() {
                        *acc_val += row_in[idx + ch].to_f32() * k;
                    }
                }
            }
            row_out[c * C..(c + 1) * C].copy_from_slice(&acc);
        }
    }

    /// Filter output row `r` vertically from the horizontal pass in `temp`.
    #[inline]
    fn vertical_row<T: FloatConversion, const C: usize>(
        &self,
        temp: &[f32],
        row_out: &mut [T],
        r: usize,
        rows: usize,
        cols: usize,
    ) {
        for c in 0..cols {
            let mut acc = [0.0f32; C];
            for (i, &k) in self.kernel_y.iter().enumerate() {
                let y = r as isize + i as isize - self.half_y;
                if let Some(y) = self.border.map_index(y, rows) {
                    let idx = (y * cols + c) * C;
                    for (ch, acc_val) in acc.iter_mut().enumerate() {
                        *acc_val += temp[idx + ch] * k;
                    }
                }
            }
            for (ch, &acc_val) in acc.iter().enumerate() {
                row_out[c * C + ch] = T::from_f32(acc_val);
            }
        }
    }

    fn apply<T: FloatConversion, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<T, C>,
        strategy: ExecutionStrategy,
    ) {
        let rows = src.rows();
        let cols = src.cols();
        let stride = cols * C;

        let src_data = src.as_slice();
        let mut temp = vec![0.0f32; src_data.len()];

        if strategy.is_parallel(rows * cols) {
            temp.par_chunks_mut(stride)
                .zip(src_data.par_chunks(stride))
                .for_each(|(row_temp, row_src)| {
                    self.horizontal_row::<T, C>(row_src, row_temp, cols)
                });

            dst.as_slice_mut()
                .par_chunks_mut(stride)
                .enumerate()
                .for_each(|(r, row_dst)| {
                    self.vertical_row::<T, C>(&temp, row_dst, r, rows, cols)
                });
        } else {
            temp.chunks_mut(stride)
                .zip(src_data.chunks(stride))
                .for_each(|(row_temp, row_src)| {
                    self.horizontal_row::<T, C>(row_src, row_temp, cols)
                });

            dst.as_slice_mut()
                .chunks_mut(stride)
                .enumerate()
                .for_each(|(r, row_dst)| {
                    self.vertical_row::<T, C>(&temp, row_dst, r, rows, cols)
                });
        }
    }
}

/// Apply a separable filter with border and execution strategy control.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
/// * `border` - How samples outside the image are read.
/// * `strategy` - Execution strategy: `Serial`, `Parallel`, or `Auto`.
pub fn separable_filter_with_strategy<T: FloatConversion, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
    border: BorderMode,
    strategy: ExecutionStrategy,
) -> Result<(), ImageError> {
    if kernel_x.is_empty() || kernel_y.is_empty() {
        return Err(ImageError::InvalidKernelLength(
            kernel_x.len(),
            kernel_y.len(),
        ));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    SeparableFilter::new(kernel_x, kernel_y, border).apply(src, dst, strategy);
    Ok(())
}

/// Apply a separable filter to an image.
///
/// Uses `ExecutionStrategy::Auto`. For explicit control, use [`separable_filter_with_strategy`].
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
/// * `border` - How samples outside the image are read.
pub fn separable_filter<T: FloatConversion, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
    border: BorderMode,
) -> Result<(), ImageError> {
    separable_filter_with_strategy(
        src,
        dst,
        kernel_x,
        kernel_y,
        border,
        ExecutionStrategy::Auto,
    )
}

/// Apply a fast box filter horizontally using a running sum.
///
/// Samples outside the image replicate the edge.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with transposed shape (W, H, C).
/// * `half_kernel_x_size` - Half of the kernel at weight 1. The total size would be 2*this+1
pub(crate) fn fast_horizontal_filter<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    half_kernel_x_size: usize,
) -> Result<(), ImageError> {
    if src.cols() != dst.rows() || src.rows() != dst.cols() {
        return Err(ImageError::InvalidImageSize(
            dst.cols(),
            dst.rows(),
            src.rows(),
            src.cols(),
        ));
    }

    let src_data = src.as_slice();
    let dst_data = dst.as_slice_mut();
    let (rows, cols) = (src.rows(), src.cols());
    let norm = (half_kernel_x_size * 2 + 1) as f32;
    let h = half_kernel_x_size as isize;

    let at = |r: usize, c: isize, ch: usize| -> f32 {
        let c = c.clamp(0, cols as isize - 1) as usize;
        src_data[(r * cols + c) * C + ch]
    };

    for r in 0..rows {
        for ch in 0..C {
            let mut acc: f32 = (-h..=h).map(|c| at(r, c, ch)).sum();
            for c in 0..cols {
                if c > 0 {
                    acc += at(r, c as isize + h, ch) - at(r, c as isize - h - 1, ch);
                }
                // transposed write: (c, r)
                dst_data[(c * rows + r) * C + ch] = acc / norm;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planefx_image::ImageSize;

    #[test]
    fn test_separable_filter_f32() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };

        #[rustfmt::skip]
        let img = Image::<f32, 1>::new(
            size,
            vec![
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        )?;

        let mut dst = Image::<_, 1>::from_size_val(img.size(), 0f32)?;
        let kernel_x = vec![1.0, 1.0, 1.0];
        let kernel_y = vec![1.0, 1.0, 1.0];
        separable_filter(&img, &mut dst, &kernel_x, &kernel_y, BorderMode::Constant)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ]
        );

        let xsum = dst.as_slice().iter().sum::<f32>();
        assert_eq!(xsum, 9.0);

        Ok(())
    }

    #[test]
    fn test_separable_filter_u8() -> Result<(), ImageError> {
        let mut img = Image::<u8, 1>::from_size_val([5, 5].into(), 0)?;
        img.as_slice_mut()[12] = 255;

        let mut dst = Image::<u8, 1>::from_size_val(img.size(), 0)?;
        let kernel = vec![1.0, 1.0, 1.0];
        separable_filter(&img, &mut dst, &kernel, &kernel, BorderMode::Constant)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0, 0, 0, 0, 0,
                0, 255, 255, 255, 0,
                0, 255, 255, 255, 0,
                0, 255, 255, 255, 0,
                0, 0, 0, 0, 0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_separable_filter_border_keeps_constant() -> Result<(), ImageError> {
        let img = Image::<f32, 1>::from_size_val([6, 4].into(), 0.25)?;
        let kernel = super::super::kernels::gaussian_kernel_1d(5, 1.0);

        for border in [
            BorderMode::Replicate,
            BorderMode::Reflect,
            BorderMode::Reflect101,
        ] {
            let mut dst = img.like(0.0);
            separable_filter(&img, &mut dst, &kernel, &kernel, border)?;
            for &v in dst.as_slice() {
                approx::assert_relative_eq!(v, 0.25, epsilon = 1e-6);
            }
        }
        Ok(())
    }

    #[test]
    fn test_separable_filter_empty_kernel() -> Result<(), ImageError> {
        let img = Image::<f32, 1>::from_size_val([2, 2].into(), 0.0)?;
        let mut dst = img.like(0.0);
        let res = separable_filter(&img, &mut dst, &[], &[1.0], BorderMode::Reflect101);
        assert_eq!(res, Err(ImageError::InvalidKernelLength(0, 1)));
        Ok(())
    }

    #[test]
    fn test_fast_horizontal_filter() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };

        #[rustfmt::skip]
        let img = Image::<f32, 1>::new(
            size,
            vec![
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 9.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        )?;

        let mut transposed = Image::<_, 1>::from_size_val(size, 0.0)?;

        fast_horizontal_filter(&img, &mut transposed, 1)?;

        #[rustfmt::skip]
        assert_eq!(
            transposed.as_slice(),
            &[
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 3.0, 0.0, 0.0,
                0.0, 0.0, 3.0, 0.0, 0.0,
                0.0, 0.0, 3.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ]
        );

        let mut dst = Image::<_, 1>::from_size_val(size, 0.0)?;

        fast_horizontal_filter(&transposed, &mut dst, 1)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ]
        );

        Ok(())
    }

    #[test]
    fn test_separable_filter_with_strategy() -> Result<(), ImageError> {
        let mut img = Image::<f32, 1>::from_size_val([7, 5].into(), 0.0)?;
        img.as_slice_mut()[17] = 1.0;
        let kernel = super::super::kernels::gaussian_kernel_1d(3, 0.8);

        let mut dst_serial = img.like(0.0);
        separable_filter_with_strategy(
            &img,
            &mut dst_serial,
            &kernel,
            &kernel,
            BorderMode::Reflect101,
            ExecutionStrategy::Serial,
        )?;

        let mut dst_parallel = img.like(0.0);
        separable_filter_with_strategy(
            &img,
            &mut dst_parallel,
            &kernel,
            &kernel,
            BorderMode::Reflect101,
            ExecutionStrategy::Parallel,
        )?;

        assert_eq!(dst_serial.as_slice(), dst_parallel.as_slice());
        Ok(())
    }
}
