//! pH threshold fallback
//!
//! Deterministic stand-in used whenever the trained forest is missing or
//! fails. A placeholder policy so the service degrades gracefully, not
//! agronomic advice:
//!
//! | pH            | crop        |
//! |---------------|-------------|
//! | < 5.5         | pigeonpeas  |
//! | 5.5 ..= 7.0   | rice        |
//! | > 7.0         | maize       |

use serde::{Deserialize, Serialize};

use crate::classifier::CropLabel;
use crate::features::FeatureVector;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhThresholdRule {
    /// Below this pH the soil is treated as acidic
    pub acidic_below: f64,
    /// Above this pH the soil is treated as alkaline
    pub alkaline_above: f64,
    pub acidic_crop: CropLabel,
    pub neutral_crop: CropLabel,
    pub alkaline_crop: CropLabel,
}

impl Default for PhThresholdRule {
    fn default() -> Self {
        Self {
            acidic_below: 5.5,
            alkaline_above: 7.0,
            acidic_crop: CropLabel::PigeonPeas,
            neutral_crop: CropLabel::Rice,
            alkaline_crop: CropLabel::Maize,
        }
    }
}

impl PhThresholdRule {
    pub fn predict(&self, features: &FeatureVector) -> CropLabel {
        let ph = features.ph;
        if ph < self.acidic_below {
            self.acidic_crop
        } else if ph > self.alkaline_above {
            self.alkaline_crop
        } else {
            self.neutral_crop
        }
    }
}
