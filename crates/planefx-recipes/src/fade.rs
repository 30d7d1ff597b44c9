//! Fade a frame sequence in or out.

use planefx_image::Image;
use planefx_imgproc::parallel::{par_iter_rows, par_iter_rows_val, par_iter_rows_val_two};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_same_size, RecipeError};

/// Direction of the fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeMode {
    /// From the target at `start` to the clip at `end`.
    #[default]
    In,
    /// From the clip at `start` to the target at `end`.
    Out,
}

/// Range and direction of a fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    /// First frame of the fade. Default `0`.
    pub start: usize,
    /// Last frame of the fade, `None` for the last frame of the clip.
    pub end: Option<usize>,
    /// Direction. Default [`FadeMode::In`].
    pub mode: FadeMode,
}

/// What the clip fades from or to.
#[derive(Debug, Clone, Copy)]
pub enum FadeTarget<'a, const C: usize> {
    /// Zero on every plane.
    Black,
    /// A constant value per plane, e.g. neutral chroma.
    Value([f32; C]),
    /// Another clip, frame by frame.
    Frames(&'a [Image<f32, C>]),
}

impl FadeConfig {
    /// Weight of the clip at frame `n`, or `None` when `n` is left untouched.
    ///
    /// `end` is the resolved last frame of the fade.
    pub fn weight(&self, n: usize, end: usize) -> Option<f32> {
        if n < self.start || n > end || end <= self.start {
            return None;
        }
        let length = (end - self.start) as f32;
        Some(match self.mode {
            FadeMode::In => (n - self.start) as f32 / length,
            FadeMode::Out => (end - n) as f32 / length,
        })
    }
}

/// Blend every frame of `frames` with `target` by its fade weight.
///
/// A frame with weight `i` becomes `x * i + t * (1 - i)`, `t` being the
/// target sample. Frames outside `[start, end]` are returned unchanged, as
/// are all frames when the range is empty.
///
/// # Errors
///
/// Fails on an empty clip, on frames of different sizes and when a target
/// clip is shorter than the faded range.
pub fn fade<const C: usize>(
    frames: &[Image<f32, C>],
    config: &FadeConfig,
    target: FadeTarget<'_, C>,
) -> Result<Vec<Image<f32, C>>, RecipeError> {
    let first = frames.first().ok_or(RecipeError::EmptyClip)?;
    let end = config.end.unwrap_or(frames.len() - 1);
    log::debug!(
        "fade: start={} end={} mode={:?}",
        config.start,
        end,
        config.mode
    );

    frames
        .iter()
        .enumerate()
        .map(|(n, frame)| -> Result<Image<f32, C>, RecipeError> {
            ensure_same_size(first.size(), frame.size())?;

            let Some(i) = config.weight(n, end) else {
                return Ok(frame.clone());
            };
            log::trace!("fade: frame {n} weight {i}");

            let out = match target {
                FadeTarget::Black => {
                    let mut out = frame.like(0.0);
                    par_iter_rows_val(frame, &mut out, |&x, o| *o = x * i);
                    out
                }
                FadeTarget::Value(value) => {
                    let mut out = frame.like(0.0);
                    par_iter_rows(frame, &mut out, |src_px, dst_px| {
                        for ((o, &x), &t) in dst_px.iter_mut().zip(src_px).zip(value.iter()) {
                            *o = x * i + t * (1.0 - i);
                        }
                    });
                    out
                }
                FadeTarget::Frames(base) => {
                    let base = base.get(n).ok_or_else(|| {
                        RecipeError::InvalidParameter(
                            "target",
                            format!("no frame {n}, the target has {} frames", base.len()),
                        )
                    })?;
                    ensure_same_size(frame.size(), base.size())?;
                    let mut out = frame.like(0.0);
                    par_iter_rows_val_two(frame, base, &mut out, |&x, &b, o| {
                        *o = x * i + b * (1.0 - i)
                    });
                    out
                }
            };
            Ok(out)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(len: usize, value: f32) -> Result<Vec<Image<f32, 1>>, RecipeError> {
        let frame = Image::<f32, 1>::from_size_val([2, 2].into(), value)?;
        Ok(vec![frame; len])
    }

    fn first_samples(frames: &[Image<f32, 1>]) -> Vec<f32> {
        frames.iter().map(|f| f.as_slice()[0]).collect()
    }

    #[test]
    fn test_weights() {
        let config = FadeConfig {
            start: 2,
            end: Some(6),
            mode: FadeMode::In,
        };
        assert_eq!(config.weight(1, 6), None);
        assert_eq!(config.weight(2, 6), Some(0.0));
        assert_eq!(config.weight(4, 6), Some(0.5));
        assert_eq!(config.weight(6, 6), Some(1.0));
        assert_eq!(config.weight(7, 6), None);

        let out = FadeConfig {
            mode: FadeMode::Out,
            ..config
        };
        assert_eq!(out.weight(3, 6), Some(0.75));

        // empty range
        assert_eq!(config.weight(2, 2), None);
    }

    #[test]
    fn test_fade_in_from_black() -> Result<(), RecipeError> {
        let frames = clip(5, 0.8)?;
        let out = fade(&frames, &FadeConfig::default(), FadeTarget::Black)?;
        let samples = first_samples(&out);
        let expected = [0.0, 0.2, 0.4, 0.6, 0.8];
        for (&a, &b) in samples.iter().zip(expected.iter()) {
            approx::assert_abs_diff_eq!(a, b, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn test_fade_out_to_clip() -> Result<(), RecipeError> {
        let frames = clip(6, 1.0)?;
        let base = clip(6, 0.0)?;
        let config = FadeConfig {
            start: 1,
            end: Some(3),
            mode: FadeMode::Out,
        };
        let out = fade(&frames, &config, FadeTarget::Frames(&base))?;
        assert_eq!(first_samples(&out), vec![1.0, 1.0, 0.5, 0.0, 1.0, 1.0]);

        let short = clip(2, 0.0)?;
        assert!(matches!(
            fade(&frames, &config, FadeTarget::Frames(&short)),
            Err(RecipeError::InvalidParameter("target", _))
        ));
        Ok(())
    }

    #[test]
    fn test_fade_to_value_and_single_frame() -> Result<(), RecipeError> {
        let frames = vec![Image::<f32, 2>::from_size_val([1, 1].into(), 1.0)?; 3];
        let out = fade(&frames, &FadeConfig::default(), FadeTarget::Value([0.0, 0.5]))?;
        assert_eq!(out[0].as_slice(), &[0.0, 0.5]);
        assert_eq!(out[1].as_slice(), &[0.5, 0.75]);
        assert_eq!(out[2].as_slice(), &[1.0, 1.0]);

        // a single frame is an empty range
        let single = clip(1, 0.3)?;
        assert_eq!(fade(&single, &FadeConfig::default(), FadeTarget::Black)?, single);

        assert_eq!(
            fade::<1>(&[], &FadeConfig::default(), FadeTarget::Black),
            Err(RecipeError::EmptyClip)
        );
        Ok(())
    }
}
