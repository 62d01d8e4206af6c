//! Harvest Advisory
//!
//! `harvest_date = sowing_date + maturity_days` (plain calendar addition),
//! then first match wins:
//!
//! 1. adverse outlook (rain / storm)        → `harvest_now`
//! 2. stable outlook and rising market      → `wait`
//! 3. otherwise                             → `default`
//!
//! The reported window is always `[harvest_date, harvest_date + 10 days]`.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::conditions::{MarketTrend, WeatherOutlook};
use crate::error::{AdvisoryError, AdvisoryResult};

/// Grace period after the computed harvest date
pub const HARVEST_WINDOW_DAYS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarvestAdvice {
    HarvestNow,
    Wait,
    Default,
}

impl HarvestAdvice {
    pub fn key(&self) -> &'static str {
        match self {
            HarvestAdvice::HarvestNow => "harvest_now",
            HarvestAdvice::Wait => "wait",
            HarvestAdvice::Default => "default",
        }
    }

    pub fn template_key(&self) -> &'static str {
        match self {
            HarvestAdvice::HarvestNow => "harvest.harvest_now",
            HarvestAdvice::Wait => "harvest.wait",
            HarvestAdvice::Default => "harvest.default",
        }
    }
}

/// Symbolic harvest decision, before localisation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestDecision {
    pub harvest_window_start: NaiveDate,
    pub harvest_window_end: NaiveDate,
    pub outlook: WeatherOutlook,
    pub market_trend: MarketTrend,
    pub advice: HarvestAdvice,
}

pub fn choose_advice(outlook: WeatherOutlook, trend: MarketTrend) -> HarvestAdvice {
    if outlook.is_adverse() {
        HarvestAdvice::HarvestNow
    } else if outlook.is_stable() && trend.is_rising() {
        HarvestAdvice::Wait
    } else {
        HarvestAdvice::Default
    }
}

/// Compute the harvest window and timing advice
///
/// # Arguments
/// * `maturity_days` - sowing-to-harvest period of the crop
/// * `sowing_date` - calendar date of sowing
/// * `outlook` / `trend` - conditions already resolved by the providers
pub fn plan_harvest(
    maturity_days: u32,
    sowing_date: NaiveDate,
    outlook: WeatherOutlook,
    trend: MarketTrend,
) -> AdvisoryResult<HarvestDecision> {
    let start = sowing_date
        .checked_add_days(Days::new(u64::from(maturity_days)))
        .ok_or_else(|| {
            AdvisoryError::Validation(format!(
                "harvest date out of range: {} + {} days",
                sowing_date, maturity_days
            ))
        })?;
    let end = start
        .checked_add_days(Days::new(HARVEST_WINDOW_DAYS))
        .ok_or_else(|| {
            AdvisoryError::Validation(format!("harvest window out of range after {}", start))
        })?;

    Ok(HarvestDecision {
        harvest_window_start: start,
        harvest_window_end: end,
        outlook,
        market_trend: trend,
        advice: choose_advice(outlook, trend),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calendar_addition() {
        let plan = plan_harvest(
            120,
            date(2024, 6, 1),
            WeatherOutlook::Unsettled,
            MarketTrend::Stable,
        )
        .unwrap();
        assert_eq!(plan.harvest_window_start, date(2024, 9, 29));
        assert_eq!(plan.harvest_window_end, date(2024, 10, 9));
        assert_eq!(plan.advice, HarvestAdvice::Default);
    }

    #[test]
    fn test_crosses_leap_day() {
        let plan = plan_harvest(
            1,
            date(2024, 2, 28),
            WeatherOutlook::Stable,
            MarketTrend::Stable,
        )
        .unwrap();
        assert_eq!(plan.harvest_window_start, date(2024, 2, 29));
    }

    #[test]
    fn test_window_always_ten_days() {
        for outlook in WeatherOutlook::ALL {
            for trend in MarketTrend::ALL {
                for maturity in [0, 100, 180, 1500] {
                    let plan = plan_harvest(maturity, date(2023, 12, 25), outlook, trend).unwrap();
                    let width = plan.harvest_window_end - plan.harvest_window_start;
                    assert_eq!(width.num_days(), 10);
                }
            }
        }
    }

    #[test]
    fn test_adverse_outlook_wins_over_rising_market() {
        assert_eq!(
            choose_advice(WeatherOutlook::StormWarning, MarketTrend::TrendingUp),
            HarvestAdvice::HarvestNow
        );
        assert_eq!(
            choose_advice(WeatherOutlook::RainForecast, MarketTrend::TrendingDown),
            HarvestAdvice::HarvestNow
        );
    }

    #[test]
    fn test_wait_needs_stable_and_rising() {
        assert_eq!(
            choose_advice(WeatherOutlook::ClearSkies, MarketTrend::TrendingUp),
            HarvestAdvice::Wait
        );
        assert_eq!(
            choose_advice(WeatherOutlook::Stable, MarketTrend::Stable),
            HarvestAdvice::Default
        );
        assert_eq!(
            choose_advice(WeatherOutlook::Unsettled, MarketTrend::TrendingUp),
            HarvestAdvice::Default
        );
    }

    #[test]
    fn test_overflow_is_validation_error() {
        let err = plan_harvest(
            u32::MAX,
            NaiveDate::MAX,
            WeatherOutlook::Stable,
            MarketTrend::Stable,
        )
        .unwrap_err();
        assert!(matches!(err, AdvisoryError::Validation(_)));
    }
}
