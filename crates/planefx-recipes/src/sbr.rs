//! Detail detection inspired by the `sbr` sharpening mask.

use planefx_image::{Image, Plane, Sample};
use planefx_imgproc::filter::convolve3x3;
use planefx_imgproc::parallel::par_iter_rows_val_two;
use serde::{Deserialize, Serialize};

use crate::error::RecipeError;
use crate::planes::map_planes;

#[rustfmt::skip]
const BLUR_3X3: [f32; 9] = [
    1.0, 2.0, 1.0,
    2.0, 4.0, 2.0,
    1.0, 2.0, 1.0,
];

const BOX_3X3: [f32; 9] = [1.0; 9];

/// Criterion that marks a sample as detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SbrMode {
    /// The smoothed difference flips the sign of the difference.
    SignChange,
    /// The smoothed difference is smaller in magnitude than the difference.
    #[default]
    Sensitive,
    /// Either of the above.
    Combined,
}

/// Parameters of [`sbr_detail`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SbrConfig {
    /// Radius of the smoothing. Default `1`.
    pub radius: usize,
    /// Detection criterion. Default [`SbrMode::Sensitive`].
    pub mode: SbrMode,
    /// Planes to process, `None` for all.
    pub planes: Option<Vec<usize>>,
}

impl Default for SbrConfig {
    fn default() -> Self {
        Self {
            radius: 1,
            mode: SbrMode::Sensitive,
            planes: None,
        }
    }
}

/// 3x3 binomial blur followed by `radius - 1` 3x3 box passes.
fn smooth(src: &Plane<f32>, radius: usize) -> Result<Plane<f32>, RecipeError> {
    let mut out = src.like(0.0);
    convolve3x3(src, &mut out, &BLUR_3X3, 16.0)?;

    let mut tmp = src.like(0.0);
    for _ in 1..radius {
        convolve3x3(&out, &mut tmp, &BOX_3X3, 9.0)?;
        std::mem::swap(&mut out, &mut tmp);
    }
    Ok(out)
}

/// Detail mask of a unit range plane: `1` for detail, `0` elsewhere.
///
/// With `d = x - smooth(x)` and `ds = smooth(d)`, a sample is detail when the
/// criterion of `mode` holds between `d` and `ds`.
pub fn sbr_detail(src: &Plane<f32>, config: &SbrConfig) -> Result<Plane<f32>, RecipeError> {
    let blurred = smooth(src, config.radius)?;

    let mut diff = src.like(0.0);
    par_iter_rows_val_two(src, &blurred, &mut diff, |&x, &b, d| *d = x - b);

    let smoothed_diff = smooth(&diff, config.radius)?;

    let mode = config.mode;
    let mut dst = src.like(0.0);
    par_iter_rows_val_two(&diff, &smoothed_diff, &mut dst, |&d, &ds, out| {
        let sign_change = (d - ds) * d < 0.0;
        let sensitive = (d - ds).abs() < d.abs();
        let detail = match mode {
            SbrMode::SignChange => sign_change,
            SbrMode::Sensitive => sensitive,
            SbrMode::Combined => sign_change || sensitive,
        };
        *out = if detail { 1.0 } else { 0.0 };
    });

    Ok(dst)
}

/// Detail mask of the configured planes of `src`; other planes are copied.
pub fn sbr_detail_image<T: Sample, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    bits: u32,
    config: &SbrConfig,
) -> Result<(), RecipeError> {
    let planes = config.planes.clone().unwrap_or_else(|| (0..C).collect());
    log::debug!(
        "sbr_detail: radius={} mode={:?} planes={planes:?}",
        config.radius,
        config.mode
    );
    map_planes(src, dst, bits, &planes, |plane| sbr_detail(plane, config))
}
