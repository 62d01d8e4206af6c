//! Irrigation Advisory
//!
//! First-match rule list over soil type and the current weather sample:
//!
//! 1. precipitation forecast        → `rain_expected` (skip watering)
//! 2. sandy soil, temp > 28 °C      → `sandy_hot` (45-60 min)
//! 3. clay loam, temp < 26 °C       → `clay_cool` (15-20 min)
//! 4. temp > 30 °C                  → `hot_day` (30-40 min)
//! 5. otherwise                     → `default` (25-30 min)
//!
//! Order is significant: rain overrides everything, and the soil-specific
//! rules shadow the generic hot-day rule.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::conditions::WeatherSample;
use crate::soil::SoilType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationAdvice {
    RainExpected,
    SandyHot,
    ClayCool,
    HotDay,
    Default,
}

impl IrrigationAdvice {
    pub fn key(&self) -> &'static str {
        match self {
            IrrigationAdvice::RainExpected => "rain_expected",
            IrrigationAdvice::SandyHot => "sandy_hot",
            IrrigationAdvice::ClayCool => "clay_cool",
            IrrigationAdvice::HotDay => "hot_day",
            IrrigationAdvice::Default => "default",
        }
    }

    pub fn template_key(&self) -> &'static str {
        match self {
            IrrigationAdvice::RainExpected => "irrigation.rain_expected",
            IrrigationAdvice::SandyHot => "irrigation.sandy_hot",
            IrrigationAdvice::ClayCool => "irrigation.clay_cool",
            IrrigationAdvice::HotDay => "irrigation.hot_day",
            IrrigationAdvice::Default => "irrigation.default",
        }
    }

    /// Suggested watering duration in minutes (None = no watering)
    pub fn duration_minutes(&self) -> Option<(u32, u32)> {
        match self {
            IrrigationAdvice::RainExpected => None,
            IrrigationAdvice::SandyHot => Some((45, 60)),
            IrrigationAdvice::ClayCool => Some((15, 20)),
            IrrigationAdvice::HotDay => Some((30, 40)),
            IrrigationAdvice::Default => Some((25, 30)),
        }
    }
}

/// Temperature cut-offs (°C)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrigationThresholds {
    /// Sandy soil above this is `sandy_hot`
    pub sandy_hot_above: f64,
    /// Clay loam below this is `clay_cool`
    pub clay_cool_below: f64,
    /// Any soil above this is `hot_day`
    pub hot_day_above: f64,
}

impl Default for IrrigationThresholds {
    fn default() -> Self {
        Self {
            sandy_hot_above: 28.0,
            clay_cool_below: 26.0,
            hot_day_above: 30.0,
        }
    }
}

impl IrrigationThresholds {
    pub(crate) fn validate(&self) -> Result<()> {
        let values = [
            ("sandy_hot_above", self.sandy_hot_above),
            ("clay_cool_below", self.clay_cool_below),
            ("hot_day_above", self.hot_day_above),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                anyhow::bail!("irrigation.{} must be a finite number", name);
            }
        }
        Ok(())
    }

    pub fn advise(&self, soil: SoilType, weather: &WeatherSample) -> IrrigationAdvice {
        let t = weather.temperature;

        if weather.forecast_condition.indicates_precipitation() {
            IrrigationAdvice::RainExpected
        } else if soil == SoilType::SandySoil && t > self.sandy_hot_above {
            IrrigationAdvice::SandyHot
        } else if soil == SoilType::ClayLoam && t < self.clay_cool_below {
            IrrigationAdvice::ClayCool
        } else if t > self.hot_day_above {
            IrrigationAdvice::HotDay
        } else {
            IrrigationAdvice::Default
        }
    }
}

/// Advise with the default thresholds
pub fn advise(soil: SoilType, weather: &WeatherSample) -> IrrigationAdvice {
    IrrigationThresholds::default().advise(soil, weather)
}
