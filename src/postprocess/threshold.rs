//! Threshold statistics: global mean, Otsu, and local adaptive mean.

use crate::image::ImageF64;

const OTSU_BINS: usize = 256;

/// Global mean of the canvas. 0 for an empty canvas.
pub fn mean_threshold(img: &ImageF64) -> f64 {
    if img.data.is_empty() {
        return 0.0;
    }
    img.data.iter().sum::<f64>() / img.data.len() as f64
}

/// Otsu's threshold over a 256-bin histogram of the value range.
/// Returns the midpoint of the range when the histogram is degenerate.
pub fn otsu_threshold(img: &ImageF64) -> f64 {
    let (lo, hi) = img.min_max();
    let span = hi - lo;
    if span <= 0.0 || img.data.is_empty() {
        return lo;
    }

    let mut hist = [0u64; OTSU_BINS];
    for &v in &img.data {
        let bin = (((v - lo) / span) * (OTSU_BINS - 1) as f64).round() as usize;
        hist[bin.min(OTSU_BINS - 1)] += 1;
    }

    let total = img.data.len() as f64;
    let total_sum: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut best_bin = 0usize;
    let mut best_var = -1.0f64;
    let mut weight_bg = 0.0f64;
    let mut sum_bg = 0.0f64;
    for (i, &count) in hist.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += i as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (total_sum - sum_bg) / weight_fg;
        let between = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);
        if between > best_var {
            best_var = between;
            best_bin = i;
        }
    }

    lo + (best_bin as f64 + 0.5) / OTSU_BINS as f64 * span
}

/// Local adaptive mean threshold: binarize each pixel against the mean of a
/// `window`-sized square around it (clamped at the borders) minus `offset`.
/// Tolerates spatially varying brightness that defeats a global statistic.
pub fn local_mean_binarize(img: &ImageF64, window: usize, offset: f64) -> ImageF64 {
    let half = (window.max(1) / 2) as i64;
    let w = img.w as i64;
    let h = img.h as i64;

    // Summed-area table with a top/left zero border.
    let mut integral = vec![0.0f64; (img.w + 1) * (img.h + 1)];
    let stride = img.w + 1;
    for y in 0..img.h {
        let mut row_sum = 0.0;
        for x in 0..img.w {
            row_sum += img.get(x, y);
            integral[(y + 1) * stride + (x + 1)] = integral[y * stride + (x + 1)] + row_sum;
        }
    }
    let window_sum = |x0: i64, y0: i64, x1: i64, y1: i64| -> f64 {
        let (x0, y0) = (x0 as usize, y0 as usize);
        let (x1, y1) = (x1 as usize + 1, y1 as usize + 1);
        integral[y1 * stride + x1] + integral[y0 * stride + x0]
            - integral[y0 * stride + x1]
            - integral[y1 * stride + x0]
    };

    let mut out = ImageF64::new(img.w, img.h);
    for y in 0..h {
        for x in 0..w {
            let x0 = (x - half).max(0);
            let y0 = (y - half).max(0);
            let x1 = (x + half).min(w - 1);
            let y1 = (y + half).min(h - 1);
            let count = ((x1 - x0 + 1) * (y1 - y0 + 1)) as f64;
            let local_mean = window_sum(x0, y0, x1, y1) / count;
            let v = img.get(x as usize, y as usize);
            out.set(
                x as usize,
                y as usize,
                if v > local_mean - offset { 1.0 } else { 0.0 },
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otsu_separates_a_bimodal_canvas() {
        let img = ImageF64::from_fn(16, 16, |x, _| if x < 8 { 0.1 } else { 0.9 });
        let t = otsu_threshold(&img);
        assert!(t > 0.1 && t < 0.9, "threshold {t}");
    }

    #[test]
    fn otsu_on_constant_canvas_is_defined() {
        let img = ImageF64::from_fn(8, 8, |_, _| 0.4);
        assert_eq!(otsu_threshold(&img), 0.4);
    }

    #[test]
    fn mean_threshold_matches_arithmetic_mean() {
        let img = ImageF64::from_fn(4, 1, |x, _| x as f64);
        assert!((mean_threshold(&img) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn local_mean_tracks_a_brightness_gradient() {
        // Checkerboard on a strong left-to-right brightness ramp: a global
        // mean misclassifies the dim columns, the local window does not.
        let w = 40;
        let img = ImageF64::from_fn(w, w, |x, y| {
            let tone = if (x / 4 + y / 4) % 2 == 0 { 0.0 } else { 0.3 };
            tone + x as f64 / w as f64
        });
        let binary = local_mean_binarize(&img, 9, 0.0);
        // Sample interior cells on both ends of the ramp.
        assert_eq!(binary.get(6, 2), 1.0);
        assert_eq!(binary.get(2, 2), 0.0);
        assert_eq!(binary.get(w - 2, 2), 1.0);
        assert_eq!(binary.get(w - 6, 2), 0.0);
    }
}
