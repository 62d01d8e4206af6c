//! Advisory Engine
//!
//! Entry point for the request layer. Holds the read-only state shared by
//! every request (classifier, reference tables, renderer, injected
//! providers) and exposes one method per advisory operation. Nothing derived
//! from a request is retained between calls.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::action_plan;
use crate::advisory::{plan_harvest, HarvestAdvice, IrrigationAdvice, IrrigationThresholds};
use crate::classifier::{ClassifierKind, CropClassifier, CropLabel, PhThresholdRule};
use crate::conditions::{
    MarketProvider, MarketTrend, SimulatedConditions, WeatherOutlook, WeatherProvider,
    WeatherSample,
};
use crate::config::EngineConfig;
use crate::error::{AdvisoryError, AdvisoryResult};
use crate::features::{normalize, FeatureInput, FeatureVector, RangeNote};
use crate::fertilizer::{FertilizerAdvice, FertilizerPolicy};
use crate::knowledge::{
    CropProfiles, CultivationPlan, CultivationPlans, Language, ReferenceData, ThreatDatabase,
};
use crate::profitability::{self, ProfitForecast};
use crate::render::TemplateRenderer;
use crate::sms::{self, SmsAlert};
use crate::soil::{self, SoilObservation, SoilType};
use crate::threat::{self, SimulatedThreatClassifier, ThreatClassifier, ThreatDiagnosis};

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub recommended_crop: CropLabel,
    /// Back-end that produced the label
    pub classifier: ClassifierKind,
    pub action_plan: CultivationPlan,
    pub fertilizer: FertilizerAdvice,
    /// Inputs accepted despite lying outside their declared range
    pub out_of_range: Vec<RangeNote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrigationReport {
    pub weather: WeatherSample,
    pub advice_key: IrrigationAdvice,
    pub advice: String,
}

/// Localized harvest timing plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestPlan {
    pub crop: CropLabel,
    pub harvest_window_start: NaiveDate,
    pub harvest_window_end: NaiveDate,
    pub weather_outlook: String,
    pub market_outlook: String,
    pub advice_key: HarvestAdvice,
    pub advice: String,
}

// ============================================================================
// Engine
// ============================================================================

pub struct AdvisoryEngine {
    classifier: CropClassifier,
    fallback_rule: PhThresholdRule,
    fertilizer: FertilizerPolicy,
    irrigation: IrrigationThresholds,
    crop_profiles: CropProfiles,
    action_plans: CultivationPlans,
    threats: ThreatDatabase,
    renderer: TemplateRenderer,
    weather: Arc<dyn WeatherProvider>,
    market: Arc<dyn MarketProvider>,
    threat_classifier: Arc<dyn ThreatClassifier>,
}

impl AdvisoryEngine {
    /// Engine with default policies and simulated collaborators
    pub fn new(data: ReferenceData, classifier: CropClassifier, default_language: Language) -> Self {
        if !data.templates.has_language(&default_language) {
            warn!(
                "Default language {} has no template table; output will use placeholders",
                default_language
            );
        }

        let conditions = Arc::new(SimulatedConditions::new());
        let threat_classifier = Arc::new(SimulatedThreatClassifier::new(data.threats.keys()));

        Self {
            classifier,
            fallback_rule: PhThresholdRule::default(),
            fertilizer: FertilizerPolicy::default(),
            irrigation: IrrigationThresholds::default(),
            crop_profiles: data.crop_profiles,
            action_plans: data.action_plans,
            threats: data.threats,
            renderer: TemplateRenderer::new(data.templates, default_language),
            weather: conditions.clone(),
            market: conditions,
            threat_classifier,
        }
    }

    /// Load reference data and classifier as described by `config`
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let default_language = Language::new(&config.default_language)
            .context("Invalid default_language in config")?;
        let data = ReferenceData::load_or_builtin(config.data_dir.as_deref())?;
        let classifier = CropClassifier::load_or_fallback(config.model_path.as_deref());

        info!(
            "Advisory engine ready (classifier: {:?}, default language: {})",
            classifier.kind(),
            default_language
        );

        Ok(Self::new(data, classifier, default_language)
            .with_fertilizer_policy(config.fertilizer.clone())
            .with_irrigation_thresholds(config.irrigation))
    }

    pub fn with_fertilizer_policy(mut self, policy: FertilizerPolicy) -> Self {
        self.fertilizer = policy;
        self
    }

    pub fn with_irrigation_thresholds(mut self, thresholds: IrrigationThresholds) -> Self {
        self.irrigation = thresholds;
        self
    }

    /// Use one provider for both weather and market conditions
    pub fn with_conditions<P>(mut self, provider: P) -> Self
    where
        P: WeatherProvider + MarketProvider + 'static,
    {
        let shared = Arc::new(provider);
        let weather: Arc<dyn WeatherProvider> = shared.clone();
        let market: Arc<dyn MarketProvider> = shared;
        self.weather = weather;
        self.market = market;
        self
    }

    pub fn with_weather_provider(mut self, provider: Arc<dyn WeatherProvider>) -> Self {
        self.weather = provider;
        self
    }

    pub fn with_market_provider(mut self, provider: Arc<dyn MarketProvider>) -> Self {
        self.market = provider;
        self
    }

    pub fn with_threat_classifier(mut self, classifier: Arc<dyn ThreatClassifier>) -> Self {
        self.threat_classifier = classifier;
        self
    }

    /// Reseed the simulated collaborators so a run can be replayed
    pub fn with_simulation_seed(self, seed: u64) -> Self {
        let keys = self.threats.keys();
        self.with_conditions(SimulatedConditions::with_seed(seed))
            .with_threat_classifier(Arc::new(SimulatedThreatClassifier::with_seed(keys, seed)))
    }

    pub fn classifier_kind(&self) -> ClassifierKind {
        self.classifier.kind()
    }

    pub fn default_language(&self) -> &Language {
        self.renderer.default_language()
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    /// Parse a request language, defaulting when absent
    pub fn resolve_language(&self, code: Option<&str>) -> AdvisoryResult<Language> {
        match code {
            Some(code) if !code.trim().is_empty() => Language::new(code),
            _ => Ok(self.default_language().clone()),
        }
    }

    // ========================================================================
    // Crop recommendation
    // ========================================================================

    /// Predict with the configured back-end, dropping to the pH rule when the
    /// trained model fails on this input
    pub fn predict(&self, features: &FeatureVector) -> (CropLabel, ClassifierKind) {
        match self.classifier.predict(features) {
            Ok(label) => (label, self.classifier.kind()),
            Err(e) => {
                warn!("{}; applying pH rule", e);
                (self.fallback_rule.predict(features), ClassifierKind::RuleFallback)
            }
        }
    }

    /// Predict many rows in parallel
    pub fn predict_batch(&self, rows: &[FeatureVector]) -> Vec<CropLabel> {
        let results = self.classifier.predict_batch(rows);
        results
            .into_par_iter()
            .zip(rows.par_iter())
            .map(|(result, row)| match result {
                Ok(label) => label,
                Err(_) => self.fallback_rule.predict(row),
            })
            .collect()
    }

    pub fn recommend_crop(
        &self,
        input: &FeatureInput,
        language: &Language,
    ) -> AdvisoryResult<CropRecommendation> {
        let normalized = normalize(input)?;
        let features = normalized.features;

        let (crop, kind) = self.predict(&features);
        let fertilizer = self.fertilizer.recommend(features.n, features.p);
        let plan = action_plan::build(&self.action_plans, &self.renderer, crop, &fertilizer, language);

        debug!(
            "Recommended {} via {:?} (urea {:.1} kg, DAP {:.1} kg, {} stages)",
            crop,
            kind,
            fertilizer.urea_kg(),
            fertilizer.dap_kg(),
            plan.stages.len()
        );

        Ok(CropRecommendation {
            recommended_crop: crop,
            classifier: kind,
            action_plan: plan,
            fertilizer,
            out_of_range: normalized.out_of_range,
        })
    }

    // ========================================================================
    // Soil and irrigation
    // ========================================================================

    pub fn analyze_soil_image(&self, image: &[u8]) -> AdvisoryResult<SoilObservation> {
        let observation = soil::analyze_image(image)?;
        debug!("Soil image classified as {:?}", observation);
        Ok(observation)
    }

    /// Irrigation advice using the injected weather provider
    pub fn advise_irrigation(&self, soil_type: SoilType, language: &Language) -> IrrigationReport {
        let sample = self.weather.current_sample();
        self.advise_irrigation_for(soil_type, sample, language)
    }

    /// Irrigation advice for a weather sample resolved by the caller
    pub fn advise_irrigation_for(
        &self,
        soil_type: SoilType,
        weather: WeatherSample,
        language: &Language,
    ) -> IrrigationReport {
        let advice = self.irrigation.advise(soil_type, &weather);
        debug!("Irrigation for {} at {:?}: {}", soil_type, weather, advice.key());

        IrrigationReport {
            weather,
            advice_key: advice,
            advice: self.renderer.text(advice.template_key(), language),
        }
    }

    // ========================================================================
    // Harvest
    // ========================================================================

    /// Harvest plan using the injected weather and market providers
    pub fn advise_harvest(
        &self,
        crop: CropLabel,
        sowing_date: NaiveDate,
        language: &Language,
    ) -> AdvisoryResult<HarvestPlan> {
        self.advise_harvest_with(crop, sowing_date, None, None, language)
    }

    /// Harvest plan where the caller may pin the outlook, the trend or both;
    /// whichever is missing comes from the injected provider
    pub fn advise_harvest_with(
        &self,
        crop: CropLabel,
        sowing_date: NaiveDate,
        outlook: Option<WeatherOutlook>,
        trend: Option<MarketTrend>,
        language: &Language,
    ) -> AdvisoryResult<HarvestPlan> {
        // unknown crops fail before any provider is sampled
        self.profile_maturity(crop)?;
        let outlook = outlook.unwrap_or_else(|| self.weather.outlook());
        let trend = trend.unwrap_or_else(|| self.market.trend(crop));
        self.advise_harvest_for(crop, sowing_date, outlook, trend, language)
    }

    /// Harvest plan for an outlook and trend resolved by the caller
    pub fn advise_harvest_for(
        &self,
        crop: CropLabel,
        sowing_date: NaiveDate,
        outlook: WeatherOutlook,
        trend: MarketTrend,
        language: &Language,
    ) -> AdvisoryResult<HarvestPlan> {
        let maturity_days = self.profile_maturity(crop)?;
        let decision = plan_harvest(maturity_days, sowing_date, outlook, trend)?;

        debug!(
            "Harvest for {} sown {}: {:?}/{:?} -> {}",
            crop,
            sowing_date,
            outlook,
            trend,
            decision.advice.key()
        );

        Ok(HarvestPlan {
            crop,
            harvest_window_start: decision.harvest_window_start,
            harvest_window_end: decision.harvest_window_end,
            weather_outlook: self.renderer.text(outlook.template_key(), language),
            market_outlook: self.renderer.text(trend.template_key(), language),
            advice_key: decision.advice,
            advice: self.renderer.text(decision.advice.template_key(), language),
        })
    }

    fn profile_maturity(&self, crop: CropLabel) -> AdvisoryResult<u32> {
        self.crop_profiles
            .get(crop)
            .map(|p| p.maturity_days)
            .ok_or_else(|| AdvisoryError::UnknownCrop(format!("no maturity data for {}", crop)))
    }

    // ========================================================================
    // Threats, profit, SMS
    // ========================================================================

    pub fn diagnose_threat(
        &self,
        image: Option<&[u8]>,
        language: &Language,
    ) -> AdvisoryResult<ThreatDiagnosis> {
        let key = self.threat_classifier.classify(image)?;
        Ok(threat::describe(&self.threats, &self.renderer, key, language))
    }

    pub fn forecast_profit(&self, crop: CropLabel) -> AdvisoryResult<ProfitForecast> {
        profitability::forecast(&self.crop_profiles, crop)
    }

    pub fn compose_sms_alert(
        &self,
        crop: CropLabel,
        phone: &str,
        language: &Language,
    ) -> AdvisoryResult<SmsAlert> {
        sms::compose(&self.renderer, crop, phone, language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ForestModel;
    use crate::conditions::{FixedConditions, ForecastCondition};
    use crate::knowledge::ThreatKey;
    use crate::threat::FixedThreatClassifier;

    fn engine() -> AdvisoryEngine {
        AdvisoryEngine::new(
            ReferenceData::builtin().unwrap(),
            CropClassifier::RuleFallback(PhThresholdRule::default()),
            Language::english(),
        )
        .with_conditions(FixedConditions::default())
    }

    fn input(ph: f64) -> FeatureInput {
        FeatureInput {
            n: Some(90.0),
            p: Some(42.0),
            k: Some(43.0),
            temperature: Some(25.5),
            humidity: Some(70.0),
            ph: Some(ph),
            rainfall: Some(100.0),
        }
    }

    #[test]
    fn test_recommend_with_rule_fallback() {
        let rec = engine().recommend_crop(&input(7.5), &Language::english()).unwrap();
        assert_eq!(rec.recommended_crop, CropLabel::Maize);
        assert_eq!(rec.classifier, ClassifierKind::RuleFallback);
        assert_eq!(rec.action_plan.stages.len(), 5);
    }

    #[test]
    fn test_missing_feature_rejected_before_classifier() {
        let mut bad = input(6.5);
        bad.rainfall = None;
        let err = engine().recommend_crop(&bad, &Language::english()).unwrap_err();
        assert!(matches!(err, AdvisoryError::Validation(_)));
    }

    #[test]
    fn test_irrigation_uses_provider() {
        let rainy = FixedConditions::default().with_sample(WeatherSample {
            temperature: 35.0,
            humidity: 80.0,
            forecast_condition: ForecastCondition::ChanceOfRain,
        });
        let engine = engine().with_conditions(rainy);
        let report = engine.advise_irrigation(SoilType::SandySoil, &Language::english());
        assert_eq!(report.advice_key, IrrigationAdvice::RainExpected);
        assert_eq!(report.advice, "NO watering needed. Rain is expected.");
    }

    #[test]
    fn test_harvest_unknown_profile() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let err = engine()
            .advise_harvest(CropLabel::Banana, date, &Language::english())
            .unwrap_err();
        assert!(matches!(err, AdvisoryError::UnknownCrop(_)));
    }

    #[test]
    fn test_harvest_outlook_labels_fall_back_to_default_language() {
        let engine = engine().with_conditions(
            FixedConditions::default()
                .with_outlook(WeatherOutlook::ClearSkies)
                .with_trend(MarketTrend::TrendingUp),
        );
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let plan = engine
            .advise_harvest(CropLabel::Rice, date, &Language::new("kn").unwrap())
            .unwrap();
        assert_eq!(plan.advice_key, HarvestAdvice::Wait);
        assert_eq!(plan.weather_outlook, "Clear Skies");
        assert_eq!(plan.market_outlook, "Trending Up");
        assert_eq!(plan.advice, "ಕೊಯ್ಲು ತಡೆಹಿಡಿಯಿರಿ. 5-7 ದಿನ ಕಾಯಿರಿ.");
    }

    #[test]
    fn test_threat_with_fixed_classifier() {
        let engine = engine().with_threat_classifier(Arc::new(FixedThreatClassifier::new(
            ThreatKey::new("fall_armyworm").unwrap(),
        )));
        let d = engine.diagnose_threat(None, &Language::english()).unwrap();
        assert_eq!(d.threat_name, "Fall Armyworm");
    }

    #[test]
    fn test_resolve_language() {
        let engine = engine();
        assert_eq!(engine.resolve_language(None).unwrap(), Language::english());
        assert_eq!(engine.resolve_language(Some("  ")).unwrap(), Language::english());
        assert_eq!(engine.resolve_language(Some("HI")).unwrap().as_str(), "hi");
    }

    fn cyclic_forest() -> CropClassifier {
        let json = r#"{
            "feature_names": ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"],
            "classes": ["maize"],
            "trees": [ { "nodes": [ { "feature": 0, "threshold": 1.0, "left": 0, "right": 0 } ] } ]
        }"#;
        CropClassifier::Trained(ForestModel::from_json(json).unwrap())
    }

    #[test]
    fn test_failing_model_falls_back_per_request() {
        let engine = AdvisoryEngine::new(
            ReferenceData::builtin().unwrap(),
            cyclic_forest(),
            Language::english(),
        )
        .with_conditions(FixedConditions::default());
        assert_eq!(engine.classifier_kind(), ClassifierKind::Trained);

        let rec = engine.recommend_crop(&input(6.5), &Language::english()).unwrap();
        assert_eq!(rec.recommended_crop, CropLabel::Rice);
        assert_eq!(rec.classifier, ClassifierKind::RuleFallback);
        assert_eq!(
            rec.action_plan.stages.last().unwrap().stage,
            action_plan::FERTILIZER_STAGE
        );
    }

    #[test]
    fn test_failing_model_falls_back_per_row() {
        let engine = AdvisoryEngine::new(
            ReferenceData::builtin().unwrap(),
            cyclic_forest(),
            Language::english(),
        );
        let rows: Vec<FeatureVector> = [4.0, 6.0, 8.0]
            .iter()
            .map(|&ph| normalize(&input(ph)).unwrap().features)
            .collect();
        assert_eq!(
            engine.predict_batch(&rows),
            vec![CropLabel::PigeonPeas, CropLabel::Rice, CropLabel::Maize]
        );
    }

    #[test]
    fn test_harvest_partial_override_samples_missing_half() {
        let engine = engine().with_conditions(
            FixedConditions::default()
                .with_outlook(WeatherOutlook::ClearSkies)
                .with_trend(MarketTrend::Stable),
        );
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let en = Language::english();

        // trend pinned, outlook from the provider
        let plan = engine
            .advise_harvest_with(CropLabel::Rice, date, None, Some(MarketTrend::TrendingUp), &en)
            .unwrap();
        assert_eq!(plan.advice_key, HarvestAdvice::Wait);

        // outlook pinned, trend from the provider
        let plan = engine
            .advise_harvest_with(CropLabel::Rice, date, Some(WeatherOutlook::StormWarning), None, &en)
            .unwrap();
        assert_eq!(plan.advice_key, HarvestAdvice::HarvestNow);
        assert_eq!(plan.market_outlook, "Stable");

        let plan = engine.advise_harvest_with(CropLabel::Rice, date, None, None, &en).unwrap();
        assert_eq!(plan.advice_key, HarvestAdvice::Default);
    }

    #[test]
    fn test_from_config_applies_irrigation_thresholds() {
        let mut config = EngineConfig::default();
        config.irrigation.hot_day_above = 32.5;

        let engine = AdvisoryEngine::from_config(&config).unwrap();
        let sample = WeatherSample {
            temperature: 31.0,
            humidity: 60.0,
            forecast_condition: ForecastCondition::Sunny,
        };
        let report = engine.advise_irrigation_for(SoilType::LoamySoil, sample, &Language::english());
        assert_eq!(report.advice_key, IrrigationAdvice::Default);
    }

    #[test]
    fn test_predict_batch_order() {
        let engine = engine();
        let rows: Vec<FeatureVector> = [4.0, 6.0, 8.0]
            .iter()
            .map(|&ph| normalize(&input(ph)).unwrap().features)
            .collect();
        assert_eq!(
            engine.predict_batch(&rows),
            vec![CropLabel::PigeonPeas, CropLabel::Rice, CropLabel::Maize]
        );
    }
}
