use planefx_image::{Image, ImageError};
use rayon::prelude::*;

use super::{separable_filter, BorderMode};

fn check_divisor(divisor: f32) -> Result<f32, ImageError> {
    if divisor == 0.0 {
        return Err(ImageError::ZeroDivisor);
    }
    Ok(1.0 / divisor)
}

/// Correlate each row with `taps`, divided by `divisor`.
///
/// `taps` is applied left to right centred on the output pixel, e.g.
/// `[-1, 0, 1]` with divisor 2 yields the central difference `(p[x+1] - p[x-1]) / 2`.
/// Samples outside the image are mirrored ([`BorderMode::Reflect101`]).
pub fn convolve_horizontal(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    taps: &[f32],
    divisor: f32,
) -> Result<(), ImageError> {
    let scale = check_divisor(divisor)?;
    let kernel: Vec<f32> = taps.iter().map(|t| t * scale).collect();
    separable_filter(src, dst, &kernel, &[1.0], BorderMode::Reflect101)
}

/// Correlate each column with `taps`, divided by `divisor`.
///
/// `taps` is applied top to bottom centred on the output pixel.
pub fn convolve_vertical(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    taps: &[f32],
    divisor: f32,
) -> Result<(), ImageError> {
    let scale = check_divisor(divisor)?;
    let kernel: Vec<f32> = taps.iter().map(|t| t * scale).collect();
    separable_filter(src, dst, &[1.0], &kernel, BorderMode::Reflect101)
}

/// Correlate a plane with a row-major 3x3 `matrix`, divided by `divisor`.
///
/// Samples outside the image are mirrored ([`BorderMode::Reflect101`]).
pub fn convolve3x3(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    matrix: &[f32; 9],
    divisor: f32,
) -> Result<(), ImageError> {
    let scale = check_divisor(divisor)?;

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (rows, cols) = (src.rows(), src.cols());
    let src_data = src.as_slice();
    let border = BorderMode::Reflect101;

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(r, row_dst)| {
            // neighbour rows are the same for the whole output row
            let ys = [-1isize, 0, 1].map(|dy| border.map_index(r as isize + dy, rows).unwrap_or(r));
            for (c, out) in row_dst.iter_mut().enumerate() {
                let xs = [-1isize, 0, 1]
                    .map(|dx| border.map_index(c as isize + dx, cols).unwrap_or(c));
                let mut acc = 0.0f32;
                for (ky, &y) in ys.iter().enumerate() {
                    for (kx, &x) in xs.iter().enumerate() {
                        acc += matrix[ky * 3 + kx] * src_data[y * cols + x];
                    }
                }
                *out = acc * scale;
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convolve_horizontal_central_difference() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::new([4, 1].into(), vec![0.0, 1.0, 3.0, 6.0])?;
        let mut dst = src.like(0.0);
        convolve_horizontal(&src, &mut dst, &[-1.0, 0.0, 1.0], 2.0)?;
        // mirrored borders make the edge derivatives vanish
        assert_eq!(dst.as_slice(), &[0.0, 1.5, 2.5, 0.0]);
        Ok(())
    }

    #[test]
    fn test_convolve_vertical_second_derivative() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::new([1, 4].into(), vec![0.0, 1.0, 4.0, 9.0])?;
        let mut dst = src.like(0.0);
        convolve_vertical(&src, &mut dst, &[1.0, -2.0, 1.0], 1.0)?;
        assert_eq!(dst.as_slice(), &[2.0, 2.0, 2.0, -10.0]);
        Ok(())
    }

    #[test]
    fn test_convolve3x3_diagonal() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = Image::<f32, 1>::new(
            [3, 3].into(),
            vec![
                1.0, 2.0, 3.0,
                4.0, 5.0, 6.0,
                7.0, 8.0, 9.0,
            ],
        )?;
        let mut dst = src.like(0.0);
        convolve3x3(&src, &mut dst, &[1., 0., 0., 0., 0., 0., 0., 0., 1.], 2.0)?;
        // centre: (top-left + bottom-right) / 2
        assert_eq!(dst.get([1, 1, 0]), Some(&5.0));
        Ok(())
    }

    #[test]
    fn test_zero_divisor() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([2, 2].into(), 1.0)?;
        let mut dst = src.like(0.0);
        assert_eq!(
            convolve3x3(&src, &mut dst, &[1.0; 9], 0.0),
            Err(ImageError::ZeroDivisor)
        );
        Ok(())
    }
}
