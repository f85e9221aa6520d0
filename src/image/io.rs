//! I/O helpers for the driver boundary.
//!
//! - `save_grayscale_f64`: min-max scale a canvas to 8-bit gray and write PNG.
//! - `save_binary`: write a {0,1} canvas as a black/white PNG.
//! - `write_json_file`: pretty-print a serializable report to disk.
//!
//! The core pipeline never touches the filesystem; these are collaborators
//! used by the demo binary after reconstruction completes.
use super::ImageF64;
use image::GrayImage;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Scale a continuous canvas to `[0, 255]` and save it as a grayscale PNG.
/// Constant canvases are written as mid-gray.
pub fn save_grayscale_f64(path: &Path, img: &ImageF64) -> Result<(), String> {
    let (lo, hi) = img.min_max();
    let span = hi - lo;
    let bytes: Vec<u8> = img
        .data
        .iter()
        .map(|&v| {
            if span > 0.0 {
                (((v - lo) / span) * 255.0).round().clamp(0.0, 255.0) as u8
            } else {
                128
            }
        })
        .collect();
    save_bytes(path, img.w, img.h, bytes)
}

/// Save a binary `{0,1}` canvas as a black/white PNG.
pub fn save_binary(path: &Path, img: &ImageF64) -> Result<(), String> {
    let bytes: Vec<u8> = img
        .data
        .iter()
        .map(|&v| if v > 0.5 { 255u8 } else { 0u8 })
        .collect();
    save_bytes(path, img.w, img.h, bytes)
}

fn save_bytes(path: &Path, w: usize, h: usize, bytes: Vec<u8>) -> Result<(), String> {
    let buf = GrayImage::from_raw(w as u32, h as u32, bytes)
        .ok_or_else(|| format!("Invalid buffer size for {}x{} image", w, h))?;
    buf.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Pretty-print a serializable value as JSON at `path`.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
    fs::write(path, json).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}
