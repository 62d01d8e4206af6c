use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::collections::HashMap;

use super::Language;

/// Two-level phrase table: language → template key → text
#[derive(Debug, Clone, Default)]
pub struct TemplateTable {
    tables: FxHashMap<Language, FxHashMap<String, String>>,
}

impl TemplateTable {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, HashMap<String, String>> =
            serde_json::from_str(json).context("Failed to parse templates")?;

        let mut tables = FxHashMap::default();
        for (lang, entries) in raw {
            let language = Language::new(&lang)
                .with_context(|| format!("Invalid language in templates: {:?}", lang))?;
            tables.insert(language, entries.into_iter().collect());
        }

        Ok(Self { tables })
    }

    pub fn has_language(&self, language: &Language) -> bool {
        self.tables.contains_key(language)
    }

    pub fn get(&self, language: &Language, key: &str) -> Option<&str> {
        self.tables
            .get(language)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    /// Keys defined for one language, sorted
    pub fn keys(&self, language: &Language) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .tables
            .get(language)
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    pub fn languages(&self) -> Vec<&Language> {
        let mut langs: Vec<&Language> = self.tables.keys().collect();
        langs.sort();
        langs
    }
}
