//! Denoising and binarization of the assembled canvas.
//!
//! The assembler emits a continuous-valued canvas; this stage turns it into
//! the final two-tone artifact. Policy is a configuration choice:
//!
//! - `Mean` / `Otsu` — global statistic threshold after optional Gaussian
//!   smoothing and optional edge-weighted blending.
//! - `Local` — adaptive mean threshold over a sliding window sized larger
//!   than one module (35 px by default), tolerant of spatially varying
//!   brightness.
//!
//! The input canvas is never mutated; the result is a fresh {0,1} canvas.
//! Pure thresholding (no smoothing) is idempotent on binary input.

pub mod filters;
pub mod threshold;

use crate::image::ImageF64;
use serde::{Deserialize, Serialize};

/// Binarization policy selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Global arithmetic-mean threshold.
    Mean,
    /// Global Otsu threshold.
    Otsu,
    /// Local adaptive mean threshold.
    Local,
}

/// Post-processing configuration.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessOptions {
    pub policy: ThresholdPolicy,
    /// Pre-threshold Gaussian sigma; `None` disables smoothing.
    pub smoothing_sigma: Option<f64>,
    /// Blend smoothed and raw values by edge weight (global policies only).
    pub edge_blend: bool,
    /// Sliding-window edge for the local policy, in pixels. Should exceed one
    /// module; ~3.5× the module size works well empirically.
    pub window: usize,
    /// Offset subtracted from the local mean before comparison.
    pub offset: f64,
}

impl Default for PostProcessOptions {
    fn default() -> Self {
        Self {
            policy: ThresholdPolicy::Otsu,
            smoothing_sigma: Some(1.0),
            edge_blend: true,
            window: 35,
            offset: 0.0,
        }
    }
}

/// Min-max normalize to `[0, 1]`. Constant canvases pass through unchanged.
fn normalize(img: &ImageF64) -> ImageF64 {
    let (lo, hi) = img.min_max();
    let span = hi - lo;
    if span <= 0.0 {
        return img.clone();
    }
    let mut out = img.clone();
    for v in out.data.iter_mut() {
        *v = (*v - lo) / span;
    }
    out
}

/// Edge-weighted blend: weight `exp(−|2·s − 1|)` is highest where the
/// smoothed field sits mid-range (edges), so edges take the smoothed value
/// while saturated regions keep the raw one.
fn edge_weighted_blend(raw: &ImageF64, smoothed: &ImageF64) -> ImageF64 {
    let mut out = raw.clone();
    for i in 0..out.data.len() {
        let s = smoothed.data[i];
        let w = (-(2.0 * s - 1.0).abs()).exp();
        out.data[i] = s * w + raw.data[i] * (1.0 - w);
    }
    out
}

/// Binarize the canvas under `opts`, producing a new {0,1} canvas.
pub fn binarize(img: &ImageF64, opts: &PostProcessOptions) -> ImageF64 {
    let field = normalize(img);
    let field = match opts.smoothing_sigma {
        Some(sigma) if sigma > 0.0 => {
            let smoothed = filters::gaussian_blur(&field, sigma);
            if opts.edge_blend && opts.policy != ThresholdPolicy::Local {
                edge_weighted_blend(&field, &smoothed)
            } else {
                smoothed
            }
        }
        _ => field,
    };

    match opts.policy {
        ThresholdPolicy::Mean => apply_global(&field, threshold::mean_threshold(&field)),
        ThresholdPolicy::Otsu => apply_global(&field, threshold::otsu_threshold(&field)),
        ThresholdPolicy::Local => threshold::local_mean_binarize(&field, opts.window, opts.offset),
    }
}

fn apply_global(field: &ImageF64, thresh: f64) -> ImageF64 {
    let mut out = field.clone();
    for v in out.data.iter_mut() {
        *v = if *v > thresh { 1.0 } else { 0.0 };
    }
    out
}
