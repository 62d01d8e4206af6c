//! Threat records (pests, diseases, weeds) per language

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::Language;
use crate::error::AdvisoryError;

/// Identifier returned by the image classifier, e.g. `fall_armyworm`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreatKey(String);

impl ThreatKey {
    pub fn new(key: &str) -> Result<Self, AdvisoryError> {
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(AdvisoryError::Validation("threat key is empty".to_string()));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable name: `fall_armyworm` → `Fall Armyworm`
    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ThreatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatType {
    Pest,
    Disease,
    Weed,
}

impl ThreatType {
    pub fn template_key(&self) -> &'static str {
        match self {
            ThreatType::Pest => "threat_type.pest",
            ThreatType::Disease => "threat_type.disease",
            ThreatType::Weed => "threat_type.weed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatRecord {
    #[serde(rename = "type")]
    pub threat_type: ThreatType,
    pub solution: String,
}

#[derive(Debug, Clone, Default)]
pub struct ThreatDatabase {
    records: FxHashMap<Language, FxHashMap<ThreatKey, ThreatRecord>>,
}

impl ThreatDatabase {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, HashMap<String, ThreatRecord>> =
            serde_json::from_str(json).context("Failed to parse threat database")?;

        let mut records = FxHashMap::default();
        for (lang, entries) in raw {
            let language = Language::new(&lang)
                .with_context(|| format!("Invalid language in threat database: {:?}", lang))?;
            let mut by_key = FxHashMap::default();
            for (key, record) in entries {
                by_key.insert(ThreatKey::new(&key)?, record);
            }
            records.insert(language, by_key);
        }

        Ok(Self { records })
    }

    pub fn get(&self, key: &ThreatKey, language: &Language) -> Option<&ThreatRecord> {
        self.records.get(language).and_then(|by_key| by_key.get(key))
    }

    /// Every key known in any language, sorted
    pub fn keys(&self) -> Vec<ThreatKey> {
        let mut keys: Vec<ThreatKey> = self
            .records
            .values()
            .flat_map(|by_key| by_key.keys().cloned())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    pub fn record_count(&self) -> usize {
        self.records.values().map(|by_key| by_key.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let key = ThreatKey::new("fall_armyworm").unwrap();
        assert_eq!(key.display_name(), "Fall Armyworm");
        assert_eq!(ThreatKey::new("leaf_blight").unwrap().display_name(), "Leaf Blight");
    }

    #[test]
    fn test_parse_records() {
        let json = r#"{"en": {"leaf_blight": {"type": "disease", "solution": "Spray."}}}"#;
        let db = ThreatDatabase::from_json(json).unwrap();
        let key = ThreatKey::new("leaf_blight").unwrap();
        let record = db.get(&key, &Language::english()).unwrap();
        assert_eq!(record.threat_type, ThreatType::Disease);
        assert_eq!(db.keys(), vec![key]);
    }

    #[test]
    fn test_bad_type_rejected() {
        let json = r#"{"en": {"x": {"type": "fungus", "solution": "?"}}}"#;
        assert!(ThreatDatabase::from_json(json).is_err());
    }
}
