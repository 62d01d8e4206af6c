//! Soil analysis from photos
//!
//! - `image_sample.rs` - decode upload, average RGB
//! - `visual.rs` - brightness bins → soil type / organic matter

pub mod image_sample;
pub mod visual;

pub use image_sample::mean_color;
pub use visual::{
    classify, classify_brightness, MeanColor, OrganicMatter, SoilObservation, SoilType,
};

use crate::error::AdvisoryResult;

/// Decode an uploaded photo and classify it
pub fn analyze_image(bytes: &[u8]) -> AdvisoryResult<SoilObservation> {
    let sample = mean_color(bytes)?;
    Ok(classify(&sample))
}
