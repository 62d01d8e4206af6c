//! Soil Visual Classifier
//!
//! Maps mean image brightness to a soil type and organic-matter estimate.
//! Darker soils read as clay-rich with high organic matter, bright soils as
//! sandy and poor. Three bins, half-open, ordered on one scalar:
//!
//! | brightness     | soil type  | organic matter |
//! |----------------|------------|----------------|
//! | [0, 80)        | Clay Loam  | High           |
//! | [80, 140)      | Loamy Soil | Moderate       |
//! | [140, 255]     | Sandy Soil | Low            |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AdvisoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    #[serde(rename = "Clay Loam")]
    ClayLoam,
    #[serde(rename = "Loamy Soil")]
    LoamySoil,
    #[serde(rename = "Sandy Soil")]
    SandySoil,
}

impl SoilType {
    pub fn display_name(&self) -> &'static str {
        match self {
            SoilType::ClayLoam => "Clay Loam",
            SoilType::LoamySoil => "Loamy Soil",
            SoilType::SandySoil => "Sandy Soil",
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SoilType {
    type Err = AdvisoryError;

    /// Accepts display names ("Sandy Soil") and identifiers ("sandy_soil", "SandySoil")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "clayloam" => Ok(SoilType::ClayLoam),
            "loamysoil" => Ok(SoilType::LoamySoil),
            "sandysoil" => Ok(SoilType::SandySoil),
            _ => Err(AdvisoryError::Validation(format!("unknown soil type: {}", s.trim()))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrganicMatter {
    Low,
    Moderate,
    High,
}

/// Result of the visual soil analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilObservation {
    pub soil_type: SoilType,
    pub organic_matter_estimate: OrganicMatter,
}

/// Mean colour over all pixels of an image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl MeanColor {
    pub fn brightness(&self) -> f64 {
        (self.r + self.g + self.b) / 3.0
    }
}

/// A brightness bin and the observation it maps to
#[derive(Debug, Clone)]
pub struct BrightnessBin {
    pub lower: f64,
    pub upper: f64,
    pub observation: SoilObservation,
}

// ============================================================================
// Brightness bins (upper bound exclusive; last bin open-ended)
// ============================================================================

static BRIGHTNESS_BINS: &[BrightnessBin] = &[
    BrightnessBin {
        lower: f64::NEG_INFINITY,
        upper: 80.0,
        observation: SoilObservation {
            soil_type: SoilType::ClayLoam,
            organic_matter_estimate: OrganicMatter::High,
        },
    },
    BrightnessBin {
        lower: 80.0,
        upper: 140.0,
        observation: SoilObservation {
            soil_type: SoilType::LoamySoil,
            organic_matter_estimate: OrganicMatter::Moderate,
        },
    },
    BrightnessBin {
        lower: 140.0,
        upper: f64::INFINITY,
        observation: SoilObservation {
            soil_type: SoilType::SandySoil,
            organic_matter_estimate: OrganicMatter::Low,
        },
    },
];

/// Classify by brightness alone
pub fn classify_brightness(brightness: f64) -> SoilObservation {
    BRIGHTNESS_BINS
        .iter()
        .find(|bin| brightness >= bin.lower && brightness < bin.upper)
        .map(|bin| bin.observation)
        // NaN or +inf: brightest bin
        .unwrap_or(BRIGHTNESS_BINS[BRIGHTNESS_BINS.len() - 1].observation)
}

/// Classify an averaged colour sample
pub fn classify(sample: &MeanColor) -> SoilObservation {
    classify_brightness(sample.brightness())
}
