//! Feature Normalizer
//!
//! Turns loosely-shaped request input into the seven-number `FeatureVector`
//! the classifier and fertilizer rules consume.

pub mod normalizer;

pub use normalizer::{
    normalize, FeatureField, FeatureInput, FeatureVector, NormalizedFeatures, RangeNote,
};
