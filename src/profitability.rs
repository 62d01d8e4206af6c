//! Profit forecast: expected revenue per acre from the crop profile

use serde::{Deserialize, Serialize};

use crate::classifier::CropLabel;
use crate::error::{AdvisoryError, AdvisoryResult};
use crate::knowledge::CropProfiles;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitForecast {
    pub crop: CropLabel,
    /// Quintals per acre
    pub yield_per_acre_quintals: f64,
    pub market_price_per_quintal: f64,
    pub estimated_revenue_per_acre: f64,
}

pub fn forecast(profiles: &CropProfiles, crop: CropLabel) -> AdvisoryResult<ProfitForecast> {
    let profile = profiles
        .get(crop)
        .ok_or_else(|| AdvisoryError::UnknownCrop(format!("no profile for {}", crop)))?;

    Ok(ProfitForecast {
        crop,
        yield_per_acre_quintals: profile.yield_per_acre,
        market_price_per_quintal: profile.market_price_per_quintal,
        estimated_revenue_per_acre: profile.yield_per_acre * profile.market_price_per_quintal,
    })
}
