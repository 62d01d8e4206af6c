//! Reference Data
//!
//! Static knowledge tables, loaded once at start-up and read-only afterwards:
//! - `crops.rs` - crop profiles (yield, price, maturity)
//! - `plans.rs` - cultivation plans per language
//! - `threats.rs` - pest/disease/weed records per language
//! - `templates.rs` - localized phrase templates
//!
//! Tables come either from a data directory or from the copies compiled into
//! the binary (`ReferenceData::builtin`).

pub mod crops;
pub mod language;
pub mod plans;
pub mod templates;
pub mod threats;

pub use crops::{CropProfile, CropProfiles};
pub use language::Language;
pub use plans::{CultivationPlan, CultivationPlans, PlanStage};
pub use templates::TemplateTable;
pub use threats::{ThreatDatabase, ThreatKey, ThreatRecord, ThreatType};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

const CROP_PROFILES_FILE: &str = "crop_profiles.json";
const ACTION_PLANS_FILE: &str = "action_plans.json";
const THREATS_FILE: &str = "threats.json";
const TEMPLATES_FILE: &str = "templates.json";

const BUILTIN_CROP_PROFILES: &str = include_str!("../../data/crop_profiles.json");
const BUILTIN_ACTION_PLANS: &str = include_str!("../../data/action_plans.json");
const BUILTIN_THREATS: &str = include_str!("../../data/threats.json");
const BUILTIN_TEMPLATES: &str = include_str!("../../data/templates.json");

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub crop_profiles: CropProfiles,
    pub action_plans: CultivationPlans,
    pub threats: ThreatDatabase,
    pub templates: TemplateTable,
}

impl ReferenceData {
    /// Tables compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_sources(
            BUILTIN_CROP_PROFILES,
            BUILTIN_ACTION_PLANS,
            BUILTIN_THREATS,
            BUILTIN_TEMPLATES,
        )
        .context("Built-in reference data is invalid")
    }

    /// Load all four tables from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let read = |name: &str| -> Result<String> {
            let path = dir.join(name);
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read reference table: {:?}", path))
        };

        let data = Self::from_sources(
            &read(CROP_PROFILES_FILE)?,
            &read(ACTION_PLANS_FILE)?,
            &read(THREATS_FILE)?,
            &read(TEMPLATES_FILE)?,
        )
        .with_context(|| format!("Invalid reference data in {:?}", dir))?;

        info!(
            "Loaded reference data from {:?}: {} crop profiles, {} plans, {} threat records",
            dir,
            data.crop_profiles.len(),
            data.action_plans.plan_count(),
            data.threats.record_count()
        );
        Ok(data)
    }

    pub fn load_or_builtin(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::load(dir),
            None => {
                info!("No data directory configured; using built-in reference data");
                Self::builtin()
            }
        }
    }

    fn from_sources(crops: &str, plans: &str, threats: &str, templates: &str) -> Result<Self> {
        Ok(Self {
            crop_profiles: CropProfiles::from_json(crops)?,
            action_plans: CultivationPlans::from_json(plans)?,
            threats: ThreatDatabase::from_json(threats)?,
            templates: TemplateTable::from_json(templates)?,
        })
    }
}
