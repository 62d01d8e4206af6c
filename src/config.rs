//! Engine Configuration
//!
//! JSON config file plus environment overrides. Everything has a default so
//! the engine starts with no config at all (embedded reference tables, pH
//! fallback classifier).
//!
//! Environment variables:
//! - `CONFIG_PATH` - JSON file to load before applying the overrides below
//! - `DATA_DIR` - directory holding the reference tables
//! - `MODEL_PATH` - exported decision-forest JSON
//! - `DEFAULT_LANGUAGE` - language code used when a request has none

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::advisory::IrrigationThresholds;
use crate::fertilizer::FertilizerPolicy;

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Language used when the requested one has no table or key
    pub default_language: String,

    /// Baselines and dose slopes for the fertilizer rules
    pub fertilizer: FertilizerPolicy,

    /// Temperature cut-offs for the irrigation rules
    pub irrigation: IrrigationThresholds,

    /// Directory with `crop_profiles.json`, `action_plans.json`,
    /// `threats.json` and `templates.json`. `None` = embedded tables.
    pub data_dir: Option<PathBuf>,

    /// Exported decision forest. `None` or unreadable = pH rule fallback.
    pub model_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            fertilizer: FertilizerPolicy::default(),
            irrigation: IrrigationThresholds::default(),
            data_dir: None,
            model_path: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: EngineConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Build configuration from `CONFIG_PATH` (if set) and the environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(dir) = std::env::var("DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(path) = std::env::var("MODEL_PATH") {
            config.model_path = Some(PathBuf::from(path));
        }
        if let Ok(lang) = std::env::var("DEFAULT_LANGUAGE") {
            config.default_language = lang;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.default_language.trim().is_empty() {
            anyhow::bail!("default_language must not be empty");
        }
        self.fertilizer.validate()?;
        self.irrigation.validate()
    }
}
