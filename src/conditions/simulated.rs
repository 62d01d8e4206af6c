//! Simulated conditions
//!
//! Stand-in for a real weather/market feed. Values are drawn from a seedable
//! `StdRng` so a fixed seed replays the same sequence.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use super::{
    ForecastCondition, MarketProvider, MarketTrend, WeatherOutlook, WeatherProvider, WeatherSample,
};
use crate::classifier::CropLabel;

const TEMPERATURE_RANGE: (f64, f64) = (24.0, 32.0);
const HUMIDITY_RANGE: (u32, u32) = (55, 85);

pub struct SimulatedConditions {
    rng: Mutex<StdRng>,
}

impl SimulatedConditions {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic while sampling leaves the generator itself intact
        let mut guard = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut *guard)
    }
}

impl Default for SimulatedConditions {
    fn default() -> Self {
        Self::new()
    }
}

fn pick<T: Copy>(rng: &mut StdRng, options: &[T]) -> T {
    // Options are non-empty constant arrays
    *options.choose(rng).unwrap_or(&options[0])
}

impl WeatherProvider for SimulatedConditions {
    fn current_sample(&self) -> WeatherSample {
        self.with_rng(|rng| {
            let raw = rng.gen_range(TEMPERATURE_RANGE.0..=TEMPERATURE_RANGE.1);
            WeatherSample {
                temperature: (raw * 10.0).round() / 10.0,
                humidity: f64::from(rng.gen_range(HUMIDITY_RANGE.0..=HUMIDITY_RANGE.1)),
                forecast_condition: pick(rng, &ForecastCondition::ALL),
            }
        })
    }

    fn outlook(&self) -> WeatherOutlook {
        self.with_rng(|rng| pick(rng, &WeatherOutlook::ALL))
    }
}

impl MarketProvider for SimulatedConditions {
    fn trend(&self, _crop: CropLabel) -> MarketTrend {
        self.with_rng(|rng| pick(rng, &MarketTrend::ALL))
    }
}
