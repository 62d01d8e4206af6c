//! Error taxonomy for the advisory core
//!
//! Every operation exposed by the engine returns one of these as a typed
//! result. Loaders that run once at start-up (config, reference tables,
//! model artifact) use `anyhow` instead.

use thiserror::Error;

/// Errors surfaced by the advisory operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisoryError {
    /// Classifier missing or failed to produce a crop label
    #[error("crop classifier unavailable: {0}")]
    ModelUnavailable(String),

    /// Uploaded image could not be decoded
    #[error("could not decode image: {0}")]
    ImageDecode(String),

    /// Crop label has no entry in the reference tables
    #[error("unknown crop: {0}")]
    UnknownCrop(String),

    /// Request input does not satisfy its contract
    #[error("invalid input: {0}")]
    Validation(String),
}

impl AdvisoryError {
    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            AdvisoryError::ModelUnavailable(_) => "model_unavailable",
            AdvisoryError::ImageDecode(_) => "image_decode_error",
            AdvisoryError::UnknownCrop(_) => "unknown_crop",
            AdvisoryError::Validation(_) => "validation_error",
        }
    }
}

pub type AdvisoryResult<T> = std::result::Result<T, AdvisoryError>;
