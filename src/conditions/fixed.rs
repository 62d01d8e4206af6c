use super::{
    ForecastCondition, MarketProvider, MarketTrend, WeatherOutlook, WeatherProvider, WeatherSample,
};
use crate::classifier::CropLabel;

/// Deterministic conditions: always returns the values it was built with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedConditions {
    pub sample: WeatherSample,
    pub outlook: WeatherOutlook,
    pub trend: MarketTrend,
}

impl Default for FixedConditions {
    fn default() -> Self {
        Self {
            sample: WeatherSample {
                temperature: 27.0,
                humidity: 65.0,
                forecast_condition: ForecastCondition::Sunny,
            },
            outlook: WeatherOutlook::Stable,
            trend: MarketTrend::Stable,
        }
    }
}

impl FixedConditions {
    pub fn new(sample: WeatherSample, outlook: WeatherOutlook, trend: MarketTrend) -> Self {
        Self { sample, outlook, trend }
    }

    pub fn with_sample(mut self, sample: WeatherSample) -> Self {
        self.sample = sample;
        self
    }

    pub fn with_outlook(mut self, outlook: WeatherOutlook) -> Self {
        self.outlook = outlook;
        self
    }

    pub fn with_trend(mut self, trend: MarketTrend) -> Self {
        self.trend = trend;
        self
    }
}

impl WeatherProvider for FixedConditions {
    fn current_sample(&self) -> WeatherSample {
        self.sample
    }

    fn outlook(&self) -> WeatherOutlook {
        self.outlook
    }
}

impl MarketProvider for FixedConditions {
    fn trend(&self, _crop: CropLabel) -> MarketTrend {
        self.trend
    }
}
