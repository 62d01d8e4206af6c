//! Crop labels
//!
//! The fixed set of 22 crops in the reference crop-recommendation dataset.
//! Parsing is case-insensitive; the canonical form is always lower-case and
//! is what every knowledge-base lookup keys on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AdvisoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CropLabel {
    Rice,
    Maize,
    Chickpea,
    KidneyBeans,
    PigeonPeas,
    MothBeans,
    MungBean,
    BlackGram,
    Lentil,
    Pomegranate,
    Banana,
    Mango,
    Grapes,
    Watermelon,
    Muskmelon,
    Apple,
    Orange,
    Papaya,
    Coconut,
    Cotton,
    Jute,
    Coffee,
}

impl CropLabel {
    pub fn all() -> &'static [CropLabel] {
        &[
            CropLabel::Rice,
            CropLabel::Maize,
            CropLabel::Chickpea,
            CropLabel::KidneyBeans,
            CropLabel::PigeonPeas,
            CropLabel::MothBeans,
            CropLabel::MungBean,
            CropLabel::BlackGram,
            CropLabel::Lentil,
            CropLabel::Pomegranate,
            CropLabel::Banana,
            CropLabel::Mango,
            CropLabel::Grapes,
            CropLabel::Watermelon,
            CropLabel::Muskmelon,
            CropLabel::Apple,
            CropLabel::Orange,
            CropLabel::Papaya,
            CropLabel::Coconut,
            CropLabel::Cotton,
            CropLabel::Jute,
            CropLabel::Coffee,
        ]
    }

    /// Lower-case key as it appears in the dataset and reference tables
    pub fn as_str(&self) -> &'static str {
        match self {
            CropLabel::Rice => "rice",
            CropLabel::Maize => "maize",
            CropLabel::Chickpea => "chickpea",
            CropLabel::KidneyBeans => "kidneybeans",
            CropLabel::PigeonPeas => "pigeonpeas",
            CropLabel::MothBeans => "mothbeans",
            CropLabel::MungBean => "mungbean",
            CropLabel::BlackGram => "blackgram",
            CropLabel::Lentil => "lentil",
            CropLabel::Pomegranate => "pomegranate",
            CropLabel::Banana => "banana",
            CropLabel::Mango => "mango",
            CropLabel::Grapes => "grapes",
            CropLabel::Watermelon => "watermelon",
            CropLabel::Muskmelon => "muskmelon",
            CropLabel::Apple => "apple",
            CropLabel::Orange => "orange",
            CropLabel::Papaya => "papaya",
            CropLabel::Coconut => "coconut",
            CropLabel::Cotton => "cotton",
            CropLabel::Jute => "jute",
            CropLabel::Coffee => "coffee",
        }
    }

    /// Title-cased name for messages ("Pigeonpeas")
    pub fn title(&self) -> String {
        let key = self.as_str();
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl FromStr for CropLabel {
    type Err = AdvisoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        if key.is_empty() {
            return Err(AdvisoryError::Validation("crop label is empty".to_string()));
        }
        CropLabel::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == key)
            .ok_or(AdvisoryError::UnknownCrop(key))
    }
}

impl fmt::Display for CropLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CropLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CropLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
