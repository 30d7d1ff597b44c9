//! Swap frequency bands between two planes.

use planefx_image::Plane;
use planefx_imgproc::parallel::{par_iter_rows_val_many, par_iter_rows_val_three};

use crate::error::{ensure_same_size, RecipeError};
use crate::lowpass::{apply_low_pass, LowPass};

/// Keep the low frequencies of `src` and the high frequencies of `flt`.
///
/// Computes `flt - L(flt) + L(src)` with `L` the given low-pass.
pub fn freq_merge<L: LowPass + ?Sized>(
    src: &Plane<f32>,
    flt: &Plane<f32>,
    lowpass: &L,
) -> Result<Plane<f32>, RecipeError> {
    ensure_same_size(src.size(), flt.size())?;

    let low_src = apply_low_pass(lowpass, src)?;
    let low_flt = apply_low_pass(lowpass, flt)?;

    let mut dst = src.like(0.0);
    par_iter_rows_val_three(&low_src, flt, &low_flt, &mut dst, |&ls, &f, &lf, d| {
        *d = f - lf + ls
    });
    Ok(dst)
}

/// Replace the band between two low-passes of `src` with the same band of `flt`.
///
/// With `a = lp1(x)` and `b = lp2(a)` when `cascade` is set, `b = lp2(x)`
/// otherwise, the result is `a(flt) - b(flt) + b(src) - a(src) + src`.
pub fn band_merge<L1: LowPass + ?Sized, L2: LowPass + ?Sized>(
    src: &Plane<f32>,
    flt: &Plane<f32>,
    lp1: &L1,
    lp2: &L2,
    cascade: bool,
) -> Result<Plane<f32>, RecipeError> {
    ensure_same_size(src.size(), flt.size())?;

    let low_src1 = apply_low_pass(lp1, src)?;
    let low_src2 = apply_low_pass(lp2, if cascade { &low_src1 } else { src })?;
    let low_flt1 = apply_low_pass(lp1, flt)?;
    let low_flt2 = apply_low_pass(lp2, if cascade { &low_flt1 } else { flt })?;

    let mut dst = src.like(0.0);
    par_iter_rows_val_many(
        &[&low_flt1, &low_flt2, src, &low_src1, &low_src2],
        &mut dst,
        |v, d| *d = v[0] - v[1] + v[4] - v[3] + v[2],
    );
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lowpass::{BoxLowPass, Identity};
    use planefx_image::{Image, ImageError};

    fn zero(src: &Plane<f32>) -> Result<Plane<f32>, ImageError> {
        Ok(src.like(0.0))
    }

    #[test]
    fn test_freq_merge_extremes() -> Result<(), RecipeError> {
        let src = Image::<f32, 1>::new([3, 1].into(), vec![0.1, 0.2, 0.3])?;
        let flt = Image::<f32, 1>::new([3, 1].into(), vec![0.9, 0.8, 0.7])?;

        // an all-pass low-pass keeps everything of src
        assert_eq!(freq_merge(&src, &flt, &Identity)?, src);
        // a low-pass that removes everything keeps everything of flt
        assert_eq!(freq_merge(&src, &flt, &zero)?, flt);
        Ok(())
    }

    #[test]
    fn test_freq_merge_constant_planes() -> Result<(), RecipeError> {
        let src = Image::<f32, 1>::from_size_val([6, 5].into(), 0.4)?;
        let flt = Image::<f32, 1>::from_size_val([6, 5].into(), 0.6)?;
        let out = freq_merge(&src, &flt, &BoxLowPass { radius: 1 })?;
        for &v in out.as_slice() {
            approx::assert_abs_diff_eq!(v, 0.4, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn test_band_merge() -> Result<(), RecipeError> {
        let src = Image::<f32, 1>::new([2, 1].into(), vec![0.25, 0.5])?;
        let flt = Image::<f32, 1>::new([2, 1].into(), vec![1.0, 0.0])?;

        // a = x and b = 0 take the whole of flt
        assert_eq!(band_merge(&src, &flt, &Identity, &zero, false)?, flt);
        // identical low-passes select an empty band
        assert_eq!(band_merge(&src, &flt, &Identity, &Identity, true)?, src);
        Ok(())
    }

    #[test]
    fn test_size_mismatch() -> Result<(), RecipeError> {
        let src = Image::<f32, 1>::from_size_val([2, 2].into(), 0.0)?;
        let flt = Image::<f32, 1>::from_size_val([2, 3].into(), 0.0)?;
        assert!(matches!(
            freq_merge(&src, &flt, &Identity),
            Err(RecipeError::SizeMismatch(_, _))
        ));
        Ok(())
    }
}
