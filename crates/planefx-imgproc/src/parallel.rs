use rayon::prelude::*;

use planefx_image::{Image, ImageError};

/// Number of pixels above which `ExecutionStrategy::Auto` runs in parallel.
const AUTO_PARALLEL_THRESHOLD: usize = 100_000;

/// Controls how row based operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Parallel for large images, serial otherwise.
    #[default]
    Auto,

    /// Run sequentially on the current thread.
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    Parallel,
}

impl ExecutionStrategy {
    /// Whether an image with `num_pixels` pixels is processed in parallel.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Auto => num_pixels >= AUTO_PARALLEL_THRESHOLD,
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel => true,
        }
    }
}

/// Return an error if `a` and `b` have different sizes.
pub fn check_same_size<T, U, const C1: usize, const C2: usize>(
    a: &Image<T, C1>,
    b: &Image<U, C2>,
) -> Result<(), ImageError> {
    if a.size() != b.size() {
        return Err(ImageError::InvalidImageSize(
            b.cols(),
            b.rows(),
            a.cols(),
            a.rows(),
        ));
    }
    Ok(())
}

/// Apply a function to each pixel in the image in parallel.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    let cols = src.cols();
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each sample in the image in parallel with a value.
pub fn par_iter_rows_val<T1, T2, const C: usize>(
    src: &Image<T1, C>,
    dst: &mut Image<T2, C>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    let stride = C * src.cols();
    src.as_slice()
        .par_chunks_exact(stride)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(stride))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each sample of an image in place, in parallel.
pub fn par_iter_rows_inplace<T, const C: usize>(
    img: &mut Image<T, C>,
    f: impl Fn(&mut T) + Send + Sync,
) where
    T: Send + Sync,
{
    let stride = C * img.cols();
    img.as_slice_mut()
        .par_chunks_exact_mut(stride)
        .for_each(|chunk| chunk.iter_mut().for_each(&f));
}

/// Apply a function to each sample in the image in parallel with two values.
pub fn par_iter_rows_val_two<T1, T2, T3, const C: usize>(
    src1: &Image<T1, C>,
    src2: &Image<T2, C>,
    dst: &mut Image<T3, C>,
    f: impl Fn(&T1, &T2, &mut T3) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
    T3: Clone + Send + Sync,
{
    let stride = C * src1.cols();
    src1.as_slice()
        .par_chunks_exact(stride)
        .zip(src2.as_slice().par_chunks_exact(stride))
        .zip(dst.as_slice_mut().par_chunks_exact_mut(stride))
        .for_each(|((src1_chunk, src2_chunk), dst_chunk)| {
            src1_chunk
                .iter()
                .zip(src2_chunk.iter())
                .zip(dst_chunk.iter_mut())
                .for_each(|((src1_pixel, src2_pixel), dst_pixel)| {
                    f(src1_pixel, src2_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each sample in the image in parallel with three values.
pub fn par_iter_rows_val_three<T, U, const C: usize>(
    src1: &Image<T, C>,
    src2: &Image<T, C>,
    src3: &Image<T, C>,
    dst: &mut Image<U, C>,
    f: impl Fn(&T, &T, &T, &mut U) + Send + Sync,
) where
    T: Clone + Send + Sync,
    U: Clone + Send + Sync,
{
    let stride = C * src1.cols();
    src1.as_slice()
        .par_chunks_exact(stride)
        .zip(src2.as_slice().par_chunks_exact(stride))
        .zip(src3.as_slice().par_chunks_exact(stride))
        .zip(dst.as_slice_mut().par_chunks_exact_mut(stride))
        .for_each(|(((c1, c2), c3), dst_chunk)| {
            for (i, d) in dst_chunk.iter_mut().enumerate() {
                f(&c1[i], &c2[i], &c3[i], d);
            }
        });
}

/// Apply a function to each sample over an arbitrary number of inputs.
///
/// The closure receives the samples of every source at the same position,
/// in the order of `srcs`.
pub fn par_iter_rows_val_many<T, U, const C: usize>(
    srcs: &[&Image<T, C>],
    dst: &mut Image<U, C>,
    f: impl Fn(&[T], &mut U) + Send + Sync,
) where
    T: Copy + Default + Send + Sync,
    U: Clone + Send + Sync,
{
    let stride = C * dst.cols();
    dst.as_slice_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each_init(
            || vec![T::default(); srcs.len()],
            |vals, (r, dst_chunk)| {
                let offset = r * stride;
                for (i, d) in dst_chunk.iter_mut().enumerate() {
                    for (v, src) in vals.iter_mut().zip(srcs.iter()) {
                        *v = src.as_slice()[offset + i];
                    }
                    f(vals.as_slice(), d);
                }
            },
        );
}

/// Update each sample of `dst` in place from the sample of `src` at the same position.
pub fn par_iter_rows_update<T, U, const C: usize>(
    dst: &mut Image<T, C>,
    src: &Image<U, C>,
    f: impl Fn(&mut T, &U) + Send + Sync,
) where
    T: Send + Sync,
    U: Send + Sync,
{
    let stride = C * dst.cols();
    dst.as_slice_mut()
        .par_chunks_exact_mut(stride)
        .zip(src.as_slice().par_chunks_exact(stride))
        .for_each(|(dst_chunk, src_chunk)| {
            dst_chunk
                .iter_mut()
                .zip(src_chunk.iter())
                .for_each(|(d, s)| f(d, s));
        });
}

/// Update each sample of `dst` in place from two sources.
pub fn par_iter_rows_update_two<T, U, V, const C: usize>(
    dst: &mut Image<T, C>,
    src1: &Image<U, C>,
    src2: &Image<V, C>,
    f: impl Fn(&mut T, &U, &V) + Send + Sync,
) where
    T: Send + Sync,
    U: Send + Sync,
    V: Send + Sync,
{
    let stride = C * dst.cols();
    dst.as_slice_mut()
        .par_chunks_exact_mut(stride)
        .zip(src1.as_slice().par_chunks_exact(stride))
        .zip(src2.as_slice().par_chunks_exact(stride))
        .for_each(|((dst_chunk, c1), c2)| {
            for (i, d) in dst_chunk.iter_mut().enumerate() {
                f(d, &c1[i], &c2[i]);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_threshold() {
        assert!(!ExecutionStrategy::Auto.is_parallel(10));
        assert!(ExecutionStrategy::Auto.is_parallel(1_000_000));
        assert!(ExecutionStrategy::Parallel.is_parallel(1));
        assert!(!ExecutionStrategy::Serial.is_parallel(1_000_000));
    }

    #[test]
    fn test_par_iter_rows_val_two() -> Result<(), ImageError> {
        let a = Image::<f32, 1>::new([2, 2].into(), vec![1.0, 2.0, 3.0, 4.0])?;
        let b = Image::<f32, 1>::new([2, 2].into(), vec![10.0, 20.0, 30.0, 40.0])?;
        let mut dst = a.like(0.0);
        par_iter_rows_val_two(&a, &b, &mut dst, |&x, &y, d| *d = x + y);
        assert_eq!(dst.as_slice(), &[11.0, 22.0, 33.0, 44.0]);
        Ok(())
    }

    #[test]
    fn test_par_iter_rows_val_many() -> Result<(), ImageError> {
        let a = Image::<f32, 1>::new([3, 1].into(), vec![1.0, 2.0, 3.0])?;
        let b = Image::<f32, 1>::new([3, 1].into(), vec![1.0, 1.0, 1.0])?;
        let c = Image::<f32, 1>::new([3, 1].into(), vec![2.0, 2.0, 2.0])?;
        let mut dst = a.like(0.0);
        par_iter_rows_val_many(&[&a, &b, &c], &mut dst, |v, d| *d = (v[0] - v[1]) * v[2]);
        assert_eq!(dst.as_slice(), &[0.0, 2.0, 4.0]);
        Ok(())
    }

    #[test]
    fn test_par_iter_rows_update_two() -> Result<(), ImageError> {
        let a = Image::<f32, 1>::new([2, 1].into(), vec![1.0, 2.0])?;
        let b = Image::<f32, 1>::new([2, 1].into(), vec![3.0, 4.0])?;
        let mut acc = a.like(1.0);
        par_iter_rows_update_two(&mut acc, &a, &b, |d, &x, &y| *d += x * y);
        assert_eq!(acc.as_slice(), &[4.0, 9.0]);

        par_iter_rows_update(&mut acc, &a, |d, &x| *d -= x);
        assert_eq!(acc.as_slice(), &[3.0, 7.0]);
        Ok(())
    }

    #[test]
    fn test_check_same_size() -> Result<(), ImageError> {
        let a = Image::<f32, 1>::from_size_val([3, 1].into(), 0.0)?;
        let b = Image::<u8, 1>::from_size_val([1, 3].into(), 0)?;
        assert_eq!(
            check_same_size(&a, &b),
            Err(ImageError::InvalidImageSize(1, 3, 3, 1))
        );
        Ok(())
    }
}
