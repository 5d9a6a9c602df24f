// ============================================================
// Layer 4 — Image Loader
// ============================================================
// Reads one image from disk and turns it into the float
// layout the vision encoder expects:
//
//   decode (jpeg/png) → resize to size x size → RGB
//   → scale to [0, 1] → ImageNet normalise → CHW
//
// CHW means all red values first, then all green, then all
// blue: [3, size, size] flattened.

use anyhow::{Context, Result};
use image::imageops::FilterType;
use std::path::Path;

// ImageNet mean and std values
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const STD: [f32; 3]  = [0.229, 0.224, 0.225];

pub const DEFAULT_IMAGE_SIZE: u32 = 224;

pub const CHANNELS: usize = 3;

/// Number of floats in one loaded image
pub fn image_len(size: u32) -> usize {
    CHANNELS * (size as usize) * (size as usize)
}

/// Load and normalise the image at `path` as CHW floats.
pub fn load_image(path: &Path, size: u32) -> Result<Vec<f32>> {
    let img = image::open(path)
        .with_context(|| format!("Cannot decode image '{}'", path.display()))?;

    let rgb   = img.resize_exact(size, size, FilterType::Triangle).to_rgb8();
    let plane = (size as usize) * (size as usize);
    let mut chw = vec![0.0f32; image_len(size)];

    for (i, pixel) in rgb.pixels().enumerate() {
        for c in 0..CHANNELS {
            let value = pixel.0[c] as f32 / 255.0;
            chw[c * plane + i] = (value - MEAN[c]) / STD[c];
        }
    }

    Ok(chw)
}
