//! Feature validation
//!
//! Missing or non-finite values are rejected. Values outside the declared
//! range are passed through unchanged and reported as `RangeNote`s, so a
//! caller can warn the user without the engine second-guessing a soil test.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AdvisoryError, AdvisoryResult};

/// Identifies one of the seven input features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureField {
    #[serde(rename = "N")]
    Nitrogen,
    #[serde(rename = "P")]
    Phosphorus,
    #[serde(rename = "K")]
    Potassium,
    #[serde(rename = "temperature")]
    Temperature,
    #[serde(rename = "humidity")]
    Humidity,
    #[serde(rename = "ph")]
    Ph,
    #[serde(rename = "rainfall")]
    Rainfall,
}

impl FeatureField {
    /// Canonical classifier column order
    pub const ORDER: [FeatureField; 7] = [
        FeatureField::Nitrogen,
        FeatureField::Phosphorus,
        FeatureField::Potassium,
        FeatureField::Temperature,
        FeatureField::Humidity,
        FeatureField::Ph,
        FeatureField::Rainfall,
    ];

    /// Column name used by the reference dataset and the JSON API
    pub fn column_name(&self) -> &'static str {
        match self {
            FeatureField::Nitrogen => "N",
            FeatureField::Phosphorus => "P",
            FeatureField::Potassium => "K",
            FeatureField::Temperature => "temperature",
            FeatureField::Humidity => "humidity",
            FeatureField::Ph => "ph",
            FeatureField::Rainfall => "rainfall",
        }
    }

    /// Declared (min, max) range; `None` = unbounded on that side
    pub fn declared_range(&self) -> (Option<f64>, Option<f64>) {
        match self {
            FeatureField::Nitrogen | FeatureField::Phosphorus | FeatureField::Potassium => {
                (Some(0.0), None)
            }
            FeatureField::Temperature => (Some(-10.0), Some(60.0)),
            FeatureField::Humidity => (Some(0.0), Some(100.0)),
            FeatureField::Ph => (Some(0.0), Some(14.0)),
            FeatureField::Rainfall => (Some(0.0), None),
        }
    }
}

/// Raw request input; every field optional so shape errors are ours to report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureInput {
    #[serde(rename = "N")]
    pub n: Option<f64>,
    #[serde(rename = "P")]
    pub p: Option<f64>,
    #[serde(rename = "K")]
    pub k: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub rainfall: Option<f64>,
}

impl FeatureInput {
    fn get(&self, field: FeatureField) -> Option<f64> {
        match field {
            FeatureField::Nitrogen => self.n,
            FeatureField::Phosphorus => self.p,
            FeatureField::Potassium => self.k,
            FeatureField::Temperature => self.temperature,
            FeatureField::Humidity => self.humidity,
            FeatureField::Ph => self.ph,
            FeatureField::Rainfall => self.rainfall,
        }
    }
}

impl From<FeatureVector> for FeatureInput {
    fn from(v: FeatureVector) -> Self {
        Self {
            n: Some(v.n),
            p: Some(v.p),
            k: Some(v.k),
            temperature: Some(v.temperature),
            humidity: Some(v.humidity),
            ph: Some(v.ph),
            rainfall: Some(v.rainfall),
        }
    }
}

/// Validated soil / climate features
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "P")]
    pub p: f64,
    #[serde(rename = "K")]
    pub k: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl FeatureVector {
    /// Features in classifier column order (see `FeatureField::ORDER`)
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.n,
            self.p,
            self.k,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }

    pub fn get(&self, field: FeatureField) -> f64 {
        match field {
            FeatureField::Nitrogen => self.n,
            FeatureField::Phosphorus => self.p,
            FeatureField::Potassium => self.k,
            FeatureField::Temperature => self.temperature,
            FeatureField::Humidity => self.humidity,
            FeatureField::Ph => self.ph,
            FeatureField::Rainfall => self.rainfall,
        }
    }
}

/// A value that fell outside its declared range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeNote {
    pub field: FeatureField,
    pub value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Normalizer output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFeatures {
    pub features: FeatureVector,
    pub out_of_range: Vec<RangeNote>,
}

/// Validate request input into a `FeatureVector`
pub fn normalize(input: &FeatureInput) -> AdvisoryResult<NormalizedFeatures> {
    let mut values = [0.0_f64; 7];
    let mut out_of_range = Vec::new();

    for (slot, field) in values.iter_mut().zip(FeatureField::ORDER) {
        let value = input.get(field).ok_or_else(|| {
            AdvisoryError::Validation(format!("missing feature: {}", field.column_name()))
        })?;

        if !value.is_finite() {
            return Err(AdvisoryError::Validation(format!(
                "feature {} is not a finite number",
                field.column_name()
            )));
        }

        let (min, max) = field.declared_range();
        let below = min.map_or(false, |m| value < m);
        let above = max.map_or(false, |m| value > m);
        if below || above {
            warn!(
                "Feature {} = {} outside declared range {:?}..{:?}; passing through",
                field.column_name(),
                value,
                min,
                max
            );
            out_of_range.push(RangeNote { field, value, min, max });
        }

        *slot = value;
    }

    let [n, p, k, temperature, humidity, ph, rainfall] = values;

    Ok(NormalizedFeatures {
        features: FeatureVector {
            n,
            p,
            k,
            temperature,
            humidity,
            ph,
            rainfall,
        },
        out_of_range,
    })
}
