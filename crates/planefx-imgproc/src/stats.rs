//! Plane statistics.
//!
//! Recipes that depend on whole-plane statistics compute them eagerly with
//! [`plane_stats`] and then run a pure per-sample transform parameterised by
//! the result.

use planefx_image::{Image, ImageError};
use rayon::prelude::*;

/// Minimum, maximum and average of a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneStats {
    /// Smallest sample.
    pub min: f32,
    /// Largest sample.
    pub max: f32,
    /// Mean of all samples, accumulated in `f64`.
    pub average: f64,
}

/// Compute the minimum, maximum and average of channel `channel`.
///
/// # Errors
///
/// Returns an error if `channel` is out of bounds.
///
/// # Example
///
/// ```
/// use planefx_image::Image;
/// use planefx_imgproc::stats::plane_stats;
///
/// let image = Image::<f32, 1>::new([2, 2].into(), vec![0.0, 0.5, 1.0, 0.5]).unwrap();
/// let stats = plane_stats(&image, 0).unwrap();
///
/// assert_eq!(stats.min, 0.0);
/// assert_eq!(stats.max, 1.0);
/// assert_eq!(stats.average, 0.5);
/// ```
pub fn plane_stats<const C: usize>(
    src: &Image<f32, C>,
    channel: usize,
) -> Result<PlaneStats, ImageError> {
    if channel >= C {
        return Err(ImageError::ChannelIndexOutOfBounds(channel, C));
    }

    let (min, max, sum) = src
        .as_slice()
        .par_chunks_exact(C * src.cols())
        .map(|row| {
            row.iter().skip(channel).step_by(C).fold(
                (f32::INFINITY, f32::NEG_INFINITY, 0.0f64),
                |(mn, mx, s), &v| (mn.min(v), mx.max(v), s + v as f64),
            )
        })
        .reduce(
            || (f32::INFINITY, f32::NEG_INFINITY, 0.0f64),
            |a, b| (a.0.min(b.0), a.1.max(b.1), a.2 + b.2),
        );

    let n = (src.width() * src.height()) as f64;

    Ok(PlaneStats {
        min,
        max,
        average: sum / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_stats_channel() -> Result<(), ImageError> {
        let image = Image::<f32, 2>::new([2, 1].into(), vec![0.1, 4.0, 0.3, -2.0])?;

        let stats = plane_stats(&image, 1)?;
        assert_eq!(stats.min, -2.0);
        assert_eq!(stats.max, 4.0);
        approx::assert_relative_eq!(stats.average, 1.0);

        assert!(plane_stats(&image, 2).is_err());
        Ok(())
    }
}
