//! Crop profiles: yield, price and maturity period per crop

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::classifier::CropLabel;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropProfile {
    /// Quintals per acre
    pub yield_per_acre: f64,
    /// Rupees per quintal
    pub market_price_per_quintal: f64,
    /// Days from sowing to harvest
    pub maturity_days: u32,
}

#[derive(Debug, Clone, Default)]
pub struct CropProfiles {
    profiles: FxHashMap<CropLabel, CropProfile>,
}

impl CropProfiles {
    /// Parse `{ "<crop>": {yield_per_acre, market_price_per_quintal, maturity_days} }`
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, CropProfile> =
            serde_json::from_str(json).context("Failed to parse crop profiles")?;

        let mut profiles = FxHashMap::default();
        for (crop, profile) in raw {
            let label: CropLabel = crop
                .parse()
                .with_context(|| format!("Crop profile for unknown crop {:?}", crop))?;
            anyhow::ensure!(
                profile.yield_per_acre >= 0.0 && profile.market_price_per_quintal >= 0.0,
                "Crop profile for {} has negative yield or price",
                label
            );
            profiles.insert(label, profile);
        }

        Ok(Self { profiles })
    }

    pub fn get(&self, crop: CropLabel) -> Option<&CropProfile> {
        self.profiles.get(&crop)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
