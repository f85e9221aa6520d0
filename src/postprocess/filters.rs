//! Separable Gaussian filtering for the post-processing stage.
//!
//! Taps are generated from the requested sigma (radius 3σ, normalized) and
//! applied horizontally then vertically with clamped borders.

use crate::image::ImageF64;

/// Normalized 1-D Gaussian taps for `sigma`, truncated at radius `⌈3σ⌉`.
fn gaussian_taps(sigma: f64) -> Vec<f64> {
    let radius = (3.0 * sigma).ceil().max(1.0) as i64;
    let mut taps: Vec<f64> = (-radius..=radius)
        .map(|i| (-(i as f64).powi(2) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f64 = taps.iter().sum();
    for t in taps.iter_mut() {
        *t /= sum;
    }
    taps
}

fn convolve_axis(src: &ImageF64, taps: &[f64], horizontal: bool) -> ImageF64 {
    let radius = (taps.len() / 2) as i64;
    let mut out = ImageF64::new(src.w, src.h);
    for y in 0..src.h {
        for x in 0..src.w {
            let mut acc = 0.0;
            for (k, &t) in taps.iter().enumerate() {
                let offset = k as i64 - radius;
                let (sx, sy) = if horizontal {
                    ((x as i64 + offset).clamp(0, src.w as i64 - 1), y as i64)
                } else {
                    (x as i64, (y as i64 + offset).clamp(0, src.h as i64 - 1))
                };
                acc += t * src.get(sx as usize, sy as usize);
            }
            out.set(x, y, acc);
        }
    }
    out
}

/// Gaussian-blur a canvas with clamped borders. `sigma <= 0` is a no-op copy.
pub fn gaussian_blur(src: &ImageF64, sigma: f64) -> ImageF64 {
    if sigma <= 0.0 {
        return src.clone();
    }
    let taps = gaussian_taps(sigma);
    let pass = convolve_axis(src, &taps, true);
    convolve_axis(&pass, &taps, false)
}
