//! Cultivation plans per (language, crop)
//!
//! JSON layout keeps stage order explicit:
//! `{ "<lang>": { "<crop>": [ {"stage": "...", "steps": ["..."]} ] } }`

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Language;
use crate::classifier::CropLabel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStage {
    pub stage: String,
    pub steps: Vec<String>,
}

/// Ordered stages of a cultivation guide
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CultivationPlan {
    pub stages: Vec<PlanStage>,
}

impl CultivationPlan {
    pub fn stage(&self, name: &str) -> Option<&PlanStage> {
        self.stages.iter().find(|s| s.stage == name)
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CultivationPlans {
    plans: FxHashMap<Language, FxHashMap<CropLabel, CultivationPlan>>,
}

impl CultivationPlans {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, HashMap<String, CultivationPlan>> =
            serde_json::from_str(json).context("Failed to parse action plans")?;

        let mut plans = FxHashMap::default();
        for (lang, crops) in raw {
            let language = Language::new(&lang)
                .with_context(|| format!("Invalid language in action plans: {:?}", lang))?;
            let mut by_crop = FxHashMap::default();
            for (crop, plan) in crops {
                let label: CropLabel = crop
                    .parse()
                    .with_context(|| format!("Action plan for unknown crop {:?}", crop))?;
                by_crop.insert(label, plan);
            }
            plans.insert(language, by_crop);
        }

        Ok(Self { plans })
    }

    /// Static plan for exactly this crop and language (no language fallback)
    pub fn get(&self, crop: CropLabel, language: &Language) -> Option<&CultivationPlan> {
        self.plans.get(language).and_then(|by_crop| by_crop.get(&crop))
    }

    pub fn plan_count(&self) -> usize {
        self.plans.values().map(|by_crop| by_crop.len()).sum()
    }
}
