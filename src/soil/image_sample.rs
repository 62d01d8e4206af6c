//! Image colour sampling
//!
//! Decodes an uploaded soil photo and averages its RGB channels over every
//! pixel. Decode failures surface as `ImageDecode`; nothing is retried.

use image::GenericImageView;
use tracing::debug;

use super::visual::MeanColor;
use crate::error::{AdvisoryError, AdvisoryResult};

/// Decode image bytes (PNG/JPEG) and compute the mean colour
pub fn mean_color(bytes: &[u8]) -> AdvisoryResult<MeanColor> {
    if bytes.is_empty() {
        return Err(AdvisoryError::ImageDecode("empty upload".to_string()));
    }

    let img = image::load_from_memory(bytes)
        .map_err(|e| AdvisoryError::ImageDecode(e.to_string()))?;

    let (width, height) = img.dimensions();
    let pixel_count = u64::from(width) * u64::from(height);
    if pixel_count == 0 {
        return Err(AdvisoryError::ImageDecode("image has no pixels".to_string()));
    }

    let rgb = img.to_rgb8();
    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for pixel in rgb.pixels() {
        r += u64::from(pixel[0]);
        g += u64::from(pixel[1]);
        b += u64::from(pixel[2]);
    }

    let n = pixel_count as f64;
    let mean = MeanColor {
        r: r as f64 / n,
        g: g as f64 / n,
        b: b as f64 / n,
    };

    debug!("Decoded {}x{} image, mean colour {:?}", width, height, mean);
    Ok(mean)
}
