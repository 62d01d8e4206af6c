//! Decision Forest
//!
//! Evaluates a tree ensemble that was fitted elsewhere and exported to JSON.
//! Training is out of scope; this only reads and runs the artifact.
//!
//! Artifact format:
//! ```json
//! {
//!   "feature_names": ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"],
//!   "classes": ["maize", "rice"],
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 6, "threshold": 150.0, "left": 1, "right": 2 },
//!         { "class": 0 },
//!         { "class": 1 }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Splits follow the `x <= threshold` → left convention. The forest predicts
//! by majority vote over trees; ties go to the lowest class index.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::classifier::CropLabel;
use crate::error::{AdvisoryError, AdvisoryResult};
use crate::features::{FeatureField, FeatureVector};

/// A node in an exported tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk from the root to a leaf. Bounded by node count so a malformed
    /// (cyclic) tree cannot loop forever.
    fn predict_class(&self, x: &[f64; 7]) -> Option<usize> {
        let mut index = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index)? {
                TreeNode::Leaf { class } => return Some(*class),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = *x.get(*feature)?;
                    index = if value <= *threshold { *left } else { *right };
                }
            }
        }
        None
    }
}

/// Raw artifact as serialized
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ForestArtifact {
    feature_names: Vec<String>,
    classes: Vec<String>,
    trees: Vec<DecisionTree>,
}

/// Validated forest ready for prediction
#[derive(Debug, Clone)]
pub struct ForestModel {
    classes: Vec<CropLabel>,
    trees: Vec<DecisionTree>,
}

impl ForestModel {
    /// Load and validate an exported forest
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact: {:?}", path))?;
        Self::from_json(&contents).with_context(|| format!("Invalid model artifact: {:?}", path))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ForestArtifact =
            serde_json::from_str(json).context("Failed to parse model JSON")?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: ForestArtifact) -> Result<Self> {
        let expected: Vec<&str> = FeatureField::ORDER.iter().map(|f| f.column_name()).collect();
        if artifact.feature_names != expected {
            anyhow::bail!(
                "Feature order {:?} does not match expected {:?}",
                artifact.feature_names,
                expected
            );
        }

        if artifact.trees.is_empty() {
            anyhow::bail!("Model has no trees");
        }

        let classes = artifact
            .classes
            .iter()
            .map(|c| c.parse::<CropLabel>())
            .collect::<Result<Vec<_>, _>>()
            .context("Model class list contains an unsupported crop")?;

        if classes.is_empty() {
            anyhow::bail!("Model has no classes");
        }

        for (t, tree) in artifact.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                anyhow::bail!("Tree {} has no nodes", t);
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Leaf { class } if *class >= classes.len() => {
                        anyhow::bail!("Tree {} node {}: class index {} out of range", t, i, class);
                    }
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= FeatureField::ORDER.len() {
                            anyhow::bail!("Tree {} node {}: feature index {} out of range", t, i, feature);
                        }
                        if !threshold.is_finite() {
                            anyhow::bail!("Tree {} node {}: threshold is not finite", t, i);
                        }
                        if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                            anyhow::bail!("Tree {} node {}: child index out of range", t, i);
                        }
                    }
                    _ => {}
                }
            }
        }

        Ok(Self {
            classes,
            trees: artifact.trees,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn classes(&self) -> &[CropLabel] {
        &self.classes
    }

    /// Majority vote over all trees
    pub fn predict(&self, features: &FeatureVector) -> AdvisoryResult<CropLabel> {
        let x = features.as_array();
        let mut votes = vec![0usize; self.classes.len()];

        for tree in &self.trees {
            if let Some(class) = tree.predict_class(&x) {
                if let Some(count) = votes.get_mut(class) {
                    *count += 1;
                }
            }
        }

        // max_by_key keeps the last maximum; iterate in reverse so ties
        // resolve to the lowest class index
        let (best, count) = votes
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, count)| **count)
            .ok_or_else(|| AdvisoryError::ModelUnavailable("model has no classes".to_string()))?;

        if *count == 0 {
            return Err(AdvisoryError::ModelUnavailable(
                "no tree produced a vote".to_string(),
            ));
        }

        Ok(self.classes[best])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURES: &str = r#"["N", "P", "K", "temperature", "humidity", "ph", "rainfall"]"#;

    fn rainfall_forest() -> ForestModel {
        let json = format!(
            r#"{{
                "feature_names": {},
                "classes": ["maize", "rice"],
                "trees": [
                    {{ "nodes": [
                        {{ "feature": 6, "threshold": 90.0, "left": 1, "right": 2 }},
                        {{ "class": 0 }},
                        {{ "class": 1 }}
                    ] }},
                    {{ "nodes": [
                        {{ "feature": 4, "threshold": 65.0, "left": 1, "right": 2 }},
                        {{ "class": 0 }},
                        {{ "class": 1 }}
                    ] }},
                    {{ "nodes": [ {{ "class": 1 }} ] }}
                ]
            }}"#,
            FEATURES
        );
        ForestModel::from_json(&json).unwrap()
    }

    fn features(humidity: f64, rainfall: f64) -> FeatureVector {
        FeatureVector {
            n: 90.0,
            p: 42.0,
            k: 43.0,
            temperature: 25.5,
            humidity,
            ph: 6.5,
            rainfall,
        }
    }

    #[test]
    fn test_majority_vote() {
        let forest = rainfall_forest();
        assert_eq!(forest.tree_count(), 3);
        assert_eq!(forest.predict(&features(70.0, 100.0)).unwrap(), CropLabel::Rice);
        assert_eq!(forest.predict(&features(60.0, 80.0)).unwrap(), CropLabel::Maize);
    }

    #[test]
    fn test_threshold_goes_left() {
        let forest = rainfall_forest();
        // rainfall == 90 and humidity == 65 both go left -> maize, maize, rice
        assert_eq!(forest.predict(&features(65.0, 90.0)).unwrap(), CropLabel::Maize);
    }

    #[test]
    fn test_tie_goes_to_lowest_class() {
        let json = format!(
            r#"{{ "feature_names": {}, "classes": ["coffee", "rice"],
                 "trees": [ {{ "nodes": [ {{ "class": 1 }} ] }}, {{ "nodes": [ {{ "class": 0 }} ] }} ] }}"#,
            FEATURES
        );
        let forest = ForestModel::from_json(&json).unwrap();
        assert_eq!(forest.predict(&features(70.0, 100.0)).unwrap(), CropLabel::Coffee);
    }

    #[test]
    fn test_cyclic_tree_yields_model_unavailable() {
        let json = format!(
            r#"{{ "feature_names": {}, "classes": ["rice"],
                 "trees": [ {{ "nodes": [ {{ "feature": 0, "threshold": 1.0, "left": 0, "right": 0 }} ] }} ] }}"#,
            FEATURES
        );
        let forest = ForestModel::from_json(&json).unwrap();
        assert!(matches!(
            forest.predict(&features(70.0, 100.0)),
            Err(AdvisoryError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_feature_order() {
        let json = r#"{ "feature_names": ["P", "N", "K", "temperature", "humidity", "ph", "rainfall"],
                        "classes": ["rice"], "trees": [ { "nodes": [ { "class": 0 } ] } ] }"#;
        assert!(ForestModel::from_json(json).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_indices() {
        let bad_class = format!(
            r#"{{ "feature_names": {}, "classes": ["rice"], "trees": [ {{ "nodes": [ {{ "class": 3 }} ] }} ] }}"#,
            FEATURES
        );
        assert!(ForestModel::from_json(&bad_class).is_err());

        let bad_child = format!(
            r#"{{ "feature_names": {}, "classes": ["rice"],
                 "trees": [ {{ "nodes": [ {{ "feature": 0, "threshold": 1.0, "left": 1, "right": 7 }}, {{ "class": 0 }} ] }} ] }}"#,
            FEATURES
        );
        assert!(ForestModel::from_json(&bad_child).is_err());
    }

    #[test]
    fn test_rejects_unknown_class() {
        let json = format!(
            r#"{{ "feature_names": {}, "classes": ["wheat"], "trees": [ {{ "nodes": [ {{ "class": 0 }} ] }} ] }}"#,
            FEATURES
        );
        assert!(ForestModel::from_json(&json).is_err());
    }
}
