//! Agro Advisor
//!
//! Advisory decision engine for smallholder farms: turns soil tests, a soil
//! photo, weather readings and a sowing date into crop, fertilizer,
//! irrigation and harvest-timing recommendations with localized text.
//!
//! Layout (leaf → root):
//! - `features/`: validate raw inputs into a `FeatureVector`
//! - `classifier/`: decision-forest crop classifier with pH-rule fallback
//! - `fertilizer`: urea / DAP dose rules
//! - `soil/`: photo brightness → soil type and organic matter
//! - `conditions/`: weather and market providers
//! - `advisory/`: irrigation and harvest state machines
//! - `knowledge/`: static reference tables
//! - `render`, `action_plan`: localized output
//! - `engine`: the operations exposed to the request layer
//! - `api_server` (feature `api`): axum HTTP boundary

pub mod action_plan;
pub mod advisory;
pub mod classifier;
pub mod conditions;
pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod fertilizer;
pub mod knowledge;
pub mod profitability;
pub mod render;
pub mod sms;
pub mod soil;
pub mod threat;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use classifier::{ClassifierKind, CropClassifier, CropLabel};
pub use config::EngineConfig;
pub use engine::{AdvisoryEngine, CropRecommendation, HarvestPlan, IrrigationReport};
pub use error::{AdvisoryError, AdvisoryResult};
pub use features::{FeatureInput, FeatureVector};
pub use knowledge::{Language, ReferenceData};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
