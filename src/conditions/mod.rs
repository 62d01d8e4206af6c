//! Weather and market conditions
//!
//! The irrigation and harvest advisories never sample conditions themselves.
//! They receive already-resolved values from a `WeatherProvider` /
//! `MarketProvider` injected into the engine:
//! - `fixed.rs` - deterministic values (tests, demos)
//! - `simulated.rs` - seedable pseudo-random values
//! - `feed.rs` - values resolved upstream (JSON snapshot or request payload)

pub mod feed;
pub mod fixed;
pub mod simulated;

pub use feed::{ConditionsSnapshot, FeedConditions};
pub use fixed::FixedConditions;
pub use simulated::SimulatedConditions;

use serde::{Deserialize, Serialize};

use crate::classifier::CropLabel;

// ============================================================================
// Weather
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastCondition {
    Sunny,
    Cloudy,
    LightHaze,
    ChanceOfRain,
}

impl ForecastCondition {
    pub const ALL: [ForecastCondition; 4] = [
        ForecastCondition::Sunny,
        ForecastCondition::Cloudy,
        ForecastCondition::LightHaze,
        ForecastCondition::ChanceOfRain,
    ];

    pub fn indicates_precipitation(&self) -> bool {
        matches!(self, ForecastCondition::ChanceOfRain)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ForecastCondition::Sunny => "Sunny",
            ForecastCondition::Cloudy => "Cloudy",
            ForecastCondition::LightHaze => "Light Haze",
            ForecastCondition::ChanceOfRain => "Chance of Rain",
        }
    }
}

/// Current weather at the farm, regenerated per irrigation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// °C
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    pub forecast_condition: ForecastCondition,
}

/// Multi-day outlook used for harvest timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherOutlook {
    ClearSkies,
    Stable,
    Unsettled,
    RainForecast,
    StormWarning,
}

impl WeatherOutlook {
    pub const ALL: [WeatherOutlook; 5] = [
        WeatherOutlook::ClearSkies,
        WeatherOutlook::Stable,
        WeatherOutlook::Unsettled,
        WeatherOutlook::RainForecast,
        WeatherOutlook::StormWarning,
    ];

    /// Weather that threatens a standing crop
    pub fn is_adverse(&self) -> bool {
        matches!(self, WeatherOutlook::RainForecast | WeatherOutlook::StormWarning)
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, WeatherOutlook::ClearSkies | WeatherOutlook::Stable)
    }

    pub fn template_key(&self) -> &'static str {
        match self {
            WeatherOutlook::ClearSkies => "outlook.clear_skies",
            WeatherOutlook::Stable => "outlook.stable",
            WeatherOutlook::Unsettled => "outlook.unsettled",
            WeatherOutlook::RainForecast => "outlook.rain_forecast",
            WeatherOutlook::StormWarning => "outlook.storm_warning",
        }
    }
}

// ============================================================================
// Market
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketTrend {
    TrendingUp,
    Stable,
    TrendingDown,
}

impl MarketTrend {
    pub const ALL: [MarketTrend; 3] = [
        MarketTrend::TrendingUp,
        MarketTrend::Stable,
        MarketTrend::TrendingDown,
    ];

    pub fn is_rising(&self) -> bool {
        matches!(self, MarketTrend::TrendingUp)
    }

    pub fn template_key(&self) -> &'static str {
        match self {
            MarketTrend::TrendingUp => "market.trending_up",
            MarketTrend::Stable => "market.stable",
            MarketTrend::TrendingDown => "market.trending_down",
        }
    }
}

// ============================================================================
// Provider capabilities
// ============================================================================

/// Source of weather readings and outlooks
pub trait WeatherProvider: Send + Sync {
    fn current_sample(&self) -> WeatherSample;
    fn outlook(&self) -> WeatherOutlook;
}

/// Source of market price trends
pub trait MarketProvider: Send + Sync {
    fn trend(&self, crop: CropLabel) -> MarketTrend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rain_is_precipitation() {
        let wet: Vec<_> = ForecastCondition::ALL
            .iter()
            .filter(|c| c.indicates_precipitation())
            .collect();
        assert_eq!(wet, vec![&ForecastCondition::ChanceOfRain]);
    }

    #[test]
    fn test_outlook_classes_are_disjoint() {
        for outlook in WeatherOutlook::ALL {
            assert!(!(outlook.is_adverse() && outlook.is_stable()), "{:?}", outlook);
        }
        assert!(!WeatherOutlook::Unsettled.is_adverse());
        assert!(!WeatherOutlook::Unsettled.is_stable());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&WeatherOutlook::StormWarning).unwrap();
        assert_eq!(json, "\"storm_warning\"");
        let trend: MarketTrend = serde_json::from_str("\"trending_up\"").unwrap();
        assert!(trend.is_rising());
    }
}
