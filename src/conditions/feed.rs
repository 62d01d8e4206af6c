//! Feed-backed conditions
//!
//! Wraps values that an upstream weather/market collaborator has already
//! resolved. The core never performs network I/O: a feed is either a JSON
//! snapshot written by an external fetcher or a payload carried in the request.
//!
//! Snapshot format:
//! ```json
//! {
//!   "weather": {"temperature": 29.4, "humidity": 71, "forecast_condition": "cloudy"},
//!   "outlook": "stable",
//!   "market_trend": "stable",
//!   "crop_trends": {"rice": "trending_up"}
//! }
//! ```

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use super::{MarketProvider, MarketTrend, WeatherOutlook, WeatherProvider, WeatherSample};
use crate::classifier::CropLabel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionsSnapshot {
    pub weather: WeatherSample,
    pub outlook: WeatherOutlook,
    /// Trend for crops without an entry in `crop_trends`
    pub market_trend: MarketTrend,
    #[serde(default)]
    pub crop_trends: HashMap<String, MarketTrend>,
}

#[derive(Debug, Clone)]
pub struct FeedConditions {
    weather: WeatherSample,
    outlook: WeatherOutlook,
    market_trend: MarketTrend,
    crop_trends: FxHashMap<CropLabel, MarketTrend>,
}

impl FeedConditions {
    /// Load a snapshot file written by an external fetcher
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read conditions snapshot: {:?}", path))?;
        let snapshot: ConditionsSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse conditions snapshot: {:?}", path))?;
        let feed = Self::from_snapshot(snapshot)?;
        info!("Loaded conditions snapshot from {:?}", path);
        Ok(feed)
    }

    pub fn from_snapshot(snapshot: ConditionsSnapshot) -> Result<Self> {
        let mut crop_trends = FxHashMap::default();
        for (crop, trend) in snapshot.crop_trends {
            let label: CropLabel = crop
                .parse()
                .with_context(|| format!("Invalid crop in conditions snapshot: {:?}", crop))?;
            crop_trends.insert(label, trend);
        }

        Ok(Self {
            weather: snapshot.weather,
            outlook: snapshot.outlook,
            market_trend: snapshot.market_trend,
            crop_trends,
        })
    }

    /// Conditions resolved for a single request: one weather sample, one outlook,
    /// one trend for every crop
    pub fn resolved(weather: WeatherSample, outlook: WeatherOutlook, trend: MarketTrend) -> Self {
        Self {
            weather,
            outlook,
            market_trend: trend,
            crop_trends: FxHashMap::default(),
        }
    }
}

impl WeatherProvider for FeedConditions {
    fn current_sample(&self) -> WeatherSample {
        self.weather
    }

    fn outlook(&self) -> WeatherOutlook {
        self.outlook
    }
}

impl MarketProvider for FeedConditions {
    fn trend(&self, crop: CropLabel) -> MarketTrend {
        self.crop_trends
            .get(&crop)
            .copied()
            .unwrap_or(self.market_trend)
    }
}
