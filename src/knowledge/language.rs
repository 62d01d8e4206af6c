use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AdvisoryError;

/// Language code used to select localized text ("en", "kn", "hi", ...)
///
/// Stored trimmed and lower-cased, so "EN" and "en" select the same table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language(String);

impl Language {
    pub fn new(code: &str) -> Result<Self, AdvisoryError> {
        let code = code.trim().to_ascii_lowercase();
        if code.is_empty() {
            return Err(AdvisoryError::Validation("language code is empty".to_string()));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(AdvisoryError::Validation(format!(
                "invalid language code: {:?}",
                code
            )));
        }
        Ok(Self(code))
    }

    pub fn english() -> Self {
        Self("en".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Language {
    type Err = AdvisoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::new(s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Language::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalises_case() {
        assert_eq!(Language::new(" KN ").unwrap().as_str(), "kn");
        assert_eq!("EN".parse::<Language>().unwrap(), Language::english());
    }

    #[test]
    fn test_rejects_empty_and_garbage() {
        assert!(Language::new("").is_err());
        assert!(Language::new("e n").is_err());
        assert!(serde_json::from_str::<Language>("\"\"").is_err());
    }
}
