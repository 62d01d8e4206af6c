//! Crop Classifier Adapter
//!
//! One `predict(features) -> CropLabel` contract over two interchangeable
//! back-ends:
//! - `Trained` - an exported decision forest (`forest.rs`)
//! - `RuleFallback` - the deterministic pH rule (`fallback.rs`)
//!
//! The adapter itself never guesses: a failing forest reports
//! `ModelUnavailable` and the engine decides to fall back.

pub mod crop_label;
pub mod fallback;
pub mod forest;

pub use crop_label::CropLabel;
pub use fallback::PhThresholdRule;
pub use forest::{DecisionTree, ForestModel, TreeNode};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::AdvisoryResult;
use crate::features::FeatureVector;

/// Which back-end produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    Trained,
    RuleFallback,
}

/// Tagged classifier back-end
#[derive(Debug, Clone)]
pub enum CropClassifier {
    Trained(ForestModel),
    RuleFallback(PhThresholdRule),
}

impl CropClassifier {
    /// Load the forest at `path`, or fall back to the pH rule when the path is
    /// absent or the artifact cannot be read
    pub fn load_or_fallback(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("No model artifact configured; using pH rule fallback");
            return CropClassifier::RuleFallback(PhThresholdRule::default());
        };

        match ForestModel::load(path) {
            Ok(model) => {
                info!(
                    "Loaded crop model {:?} ({} trees, {} classes)",
                    path,
                    model.tree_count(),
                    model.classes().len()
                );
                CropClassifier::Trained(model)
            }
            Err(e) => {
                warn!("Crop model unavailable ({:#}); using pH rule fallback", e);
                CropClassifier::RuleFallback(PhThresholdRule::default())
            }
        }
    }

    pub fn kind(&self) -> ClassifierKind {
        match self {
            CropClassifier::Trained(_) => ClassifierKind::Trained,
            CropClassifier::RuleFallback(_) => ClassifierKind::RuleFallback,
        }
    }

    pub fn predict(&self, features: &FeatureVector) -> AdvisoryResult<CropLabel> {
        match self {
            CropClassifier::Trained(model) => model.predict(features),
            CropClassifier::RuleFallback(rule) => Ok(rule.predict(features)),
        }
    }

    /// Predict many rows in parallel (Rayon)
    pub fn predict_batch(&self, rows: &[FeatureVector]) -> Vec<AdvisoryResult<CropLabel>> {
        rows.par_iter().map(|row| self.predict(row)).collect()
    }
}
