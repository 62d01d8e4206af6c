//! Fertilizer Rule Engine
//!
//! Derives urea and DAP doses from the nitrogen / phosphorus gap between a
//! soil test and a reference baseline. The default baselines (N=90, P=42)
//! come from rice in the reference dataset.
//!
//! This is a linear placeholder policy, not a validated soil-science model:
//!
//! ```text
//! n_diff = N0 - N        urea_kg = urea_base + (n_diff / 10) * urea_slope
//! p_diff = P0 - P        dap_kg  = dap_base  + (p_diff / 10) * dap_slope
//! ```
//!
//! Direction is `Low` only when the diff is strictly positive; a soil exactly
//! at baseline reads as `High`.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Whether the soil sits below or at/above the baseline for a nutrient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientLevel {
    Low,
    High,
}

impl NutrientLevel {
    fn from_diff(diff: f64) -> Self {
        if diff > 0.0 {
            NutrientLevel::Low
        } else {
            NutrientLevel::High
        }
    }

    /// Template key for the localized level word
    pub fn template_key(&self) -> &'static str {
        match self {
            NutrientLevel::Low => "level.low",
            NutrientLevel::High => "level.high",
        }
    }
}

/// Baselines and slopes for the dose formulas
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FertilizerPolicy {
    pub nitrogen_baseline: f64,
    pub phosphorus_baseline: f64,
    pub urea_base_kg: f64,
    pub urea_kg_per_10_units: f64,
    pub dap_base_kg: f64,
    pub dap_kg_per_10_units: f64,
}

impl Default for FertilizerPolicy {
    fn default() -> Self {
        Self {
            nitrogen_baseline: 90.0,
            phosphorus_baseline: 42.0,
            urea_base_kg: 50.0,
            urea_kg_per_10_units: 5.0,
            dap_base_kg: 50.0,
            dap_kg_per_10_units: 2.5,
        }
    }
}

/// Advice for a single nutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientAdvice {
    pub level: NutrientLevel,
    /// Baseline minus measured value
    pub diff: f64,
    /// Recommended product amount (kg)
    pub amount_kg: f64,
}

/// Combined nitrogen (urea) and phosphorus (DAP) recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FertilizerAdvice {
    pub nitrogen: NutrientAdvice,
    pub phosphorus: NutrientAdvice,
}

impl FertilizerAdvice {
    pub fn urea_kg(&self) -> f64 {
        self.nitrogen.amount_kg
    }

    pub fn dap_kg(&self) -> f64 {
        self.phosphorus.amount_kg
    }
}

impl FertilizerPolicy {
    /// Compute the recommendation for measured N and P
    ///
    /// Doses follow the linear formula without clamping. A soil far above
    /// baseline yields a negative amount: N=300 at the default policy gives
    /// -55 kg urea.
    pub fn recommend(&self, n: f64, p: f64) -> FertilizerAdvice {
        let n_diff = self.nitrogen_baseline - n;
        let p_diff = self.phosphorus_baseline - p;

        FertilizerAdvice {
            nitrogen: NutrientAdvice {
                level: NutrientLevel::from_diff(n_diff),
                diff: n_diff,
                amount_kg: self.urea_base_kg + (n_diff / 10.0) * self.urea_kg_per_10_units,
            },
            phosphorus: NutrientAdvice {
                level: NutrientLevel::from_diff(p_diff),
                diff: p_diff,
                amount_kg: self.dap_base_kg + (p_diff / 10.0) * self.dap_kg_per_10_units,
            },
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let values = [
            ("nitrogen_baseline", self.nitrogen_baseline),
            ("phosphorus_baseline", self.phosphorus_baseline),
            ("urea_base_kg", self.urea_base_kg),
            ("urea_kg_per_10_units", self.urea_kg_per_10_units),
            ("dap_base_kg", self.dap_base_kg),
            ("dap_kg_per_10_units", self.dap_kg_per_10_units),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                anyhow::bail!("fertilizer.{} must be a finite number", name);
            }
        }
        Ok(())
    }
}
