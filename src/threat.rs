//! Threat diagnosis
//!
//! Image-based identification is an external collaborator behind
//! `ThreatClassifier`; it hands back a `ThreatKey`. This module owns only
//! the key → localized record lookup.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::debug;

use crate::error::{AdvisoryError, AdvisoryResult};
use crate::knowledge::{Language, ThreatDatabase, ThreatKey, ThreatRecord};
use crate::render::TemplateRenderer;

/// Identifies the pest, disease or weed shown in a field photo
pub trait ThreatClassifier: Send + Sync {
    fn classify(&self, image: Option<&[u8]>) -> AdvisoryResult<ThreatKey>;
}

/// Always reports the same key
#[derive(Debug, Clone)]
pub struct FixedThreatClassifier {
    key: ThreatKey,
}

impl FixedThreatClassifier {
    pub fn new(key: ThreatKey) -> Self {
        Self { key }
    }
}

impl ThreatClassifier for FixedThreatClassifier {
    fn classify(&self, _image: Option<&[u8]>) -> AdvisoryResult<ThreatKey> {
        Ok(self.key.clone())
    }
}

/// Picks uniformly among known keys; stands in for a trained image model
pub struct SimulatedThreatClassifier {
    keys: Vec<ThreatKey>,
    rng: Mutex<StdRng>,
}

impl SimulatedThreatClassifier {
    pub fn new(keys: Vec<ThreatKey>) -> Self {
        Self {
            keys,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(keys: Vec<ThreatKey>, seed: u64) -> Self {
        Self {
            keys,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ThreatClassifier for SimulatedThreatClassifier {
    fn classify(&self, _image: Option<&[u8]>) -> AdvisoryResult<ThreatKey> {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.keys
            .choose(&mut *rng)
            .cloned()
            .ok_or_else(|| AdvisoryError::ModelUnavailable("no threat classes configured".to_string()))
    }
}

/// Localized diagnosis returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatDiagnosis {
    pub threat_key: ThreatKey,
    pub threat_name: String,
    pub threat_type: String,
    pub recommended_action: String,
}

/// Record for `key`, trying `language` first and then the default language
pub fn find_record<'a>(
    db: &'a ThreatDatabase,
    key: &ThreatKey,
    language: &Language,
    default_language: &Language,
) -> Option<&'a ThreatRecord> {
    db.get(key, language)
        .or_else(|| db.get(key, default_language))
}

/// Resolve a key to localized text; unknown keys still produce readable output
pub fn describe(
    db: &ThreatDatabase,
    renderer: &TemplateRenderer,
    key: ThreatKey,
    language: &Language,
) -> ThreatDiagnosis {
    let record = find_record(db, &key, language, renderer.default_language());

    let (threat_type, recommended_action) = match record {
        Some(record) => (
            renderer.text(record.threat_type.template_key(), language),
            record.solution.clone(),
        ),
        None => {
            debug!("No threat record for {} in {}", key, language);
            (
                renderer.text("threat.unknown_type", language),
                renderer.text("threat.no_solution", language),
            )
        }
    };

    ThreatDiagnosis {
        threat_name: key.display_name(),
        threat_key: key,
        threat_type,
        recommended_action,
    }
}
