//! Advisory state machines
//!
//! Small first-match rule evaluators, each producing one of a fixed set of
//! named recommendations. They return symbolic keys only; wording comes from
//! the template renderer.

pub mod harvest;
pub mod irrigation;

pub use harvest::{choose_advice, plan_harvest, HarvestAdvice, HarvestDecision, HARVEST_WINDOW_DAYS};
pub use irrigation::{IrrigationAdvice, IrrigationThresholds};
