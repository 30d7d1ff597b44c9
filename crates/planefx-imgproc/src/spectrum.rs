//! Frequency domain display.

use num_complex::Complex32;
use planefx_image::{Image, ImageError};
use rayon::prelude::*;
use rustfft::FftPlanner;

/// In-place 2D forward FFT of a row-major `rows x cols` buffer.
fn fft_2d(buf: &mut [Complex32], rows: usize, cols: usize) {
    let mut planner = FftPlanner::<f32>::new();

    let fft_rows = planner.plan_fft_forward(cols);
    buf.par_chunks_exact_mut(cols)
        .for_each(|row| fft_rows.process(row));

    let fft_cols = planner.plan_fft_forward(rows);
    let mut column = vec![Complex32::new(0.0, 0.0); rows];
    for c in 0..cols {
        for (r, v) in column.iter_mut().enumerate() {
            *v = buf[r * cols + c];
        }
        fft_cols.process(&mut column);
        for (r, v) in column.iter().enumerate() {
            buf[r * cols + c] = *v;
        }
    }
}

/// Compute a displayable power spectrum of a plane.
///
/// The zero frequency is moved to the centre, the power is log compressed
/// with `ln(1 + |F|^2)`, normalised to `[0, 1]` and raised to `gamma`.
/// A `gamma` below one brightens small responses.
///
/// # Arguments
///
/// * `src` - The input plane.
/// * `dst` - The output spectrum with the same size as `src`.
/// * `gamma` - Display exponent, must be positive.
pub fn power_spectrum(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    gamma: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (rows, cols) = (src.rows(), src.cols());
    let mut buf: Vec<Complex32> = src
        .as_slice()
        .iter()
        .map(|&v| Complex32::new(v, 0.0))
        .collect();

    fft_2d(&mut buf, rows, cols);

    let (half_r, half_c) = (rows / 2, cols / 2);
    let dst_data = dst.as_slice_mut();
    for r in 0..rows {
        let sr = (r + rows - half_r) % rows;
        for c in 0..cols {
            let sc = (c + cols - half_c) % cols;
            dst_data[r * cols + c] = buf[sr * cols + sc].norm_sqr().ln_1p();
        }
    }

    let peak = dst_data.iter().cloned().fold(0.0f32, f32::max);
    if peak > 0.0 {
        dst_data
            .par_iter_mut()
            .for_each(|v| *v = (*v / peak).powf(gamma));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_plane_has_only_dc() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([4, 4].into(), 0.5)?;
        let mut dst = src.like(0.0);
        power_spectrum(&src, &mut dst, 1.0)?;

        // dc moved to (2, 2)
        for (i, &v) in dst.as_slice().iter().enumerate() {
            if i == 2 * 4 + 2 {
                approx::assert_relative_eq!(v, 1.0);
            } else {
                approx::assert_abs_diff_eq!(v, 0.0, epsilon = 1e-6);
            }
        }
        Ok(())
    }

    #[test]
    fn test_zero_plane() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([3, 2].into(), 0.0)?;
        let mut dst = src.like(1.0);
        power_spectrum(&src, &mut dst, 0.5)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0.0));
        Ok(())
    }
}
