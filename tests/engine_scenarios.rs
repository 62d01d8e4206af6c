// Engine Scenario Tests
//
// Purpose: End-to-end runs of every advisory operation with the fixture
// forest and deterministic providers.
// Run with: cargo test --test engine_scenarios

use agro_advisor::action_plan::FERTILIZER_STAGE;
use agro_advisor::advisory::{HarvestAdvice, IrrigationAdvice};
use agro_advisor::conditions::{
    FeedConditions, FixedConditions, ForecastCondition, MarketTrend, WeatherOutlook, WeatherSample,
};
use agro_advisor::knowledge::ThreatKey;
use agro_advisor::soil::{OrganicMatter, SoilType};
use agro_advisor::threat::FixedThreatClassifier;
use agro_advisor::{
    AdvisoryEngine, AdvisoryError, ClassifierKind, CropClassifier, CropLabel, EngineConfig,
    FeatureInput, Language, ReferenceData,
};
use approx::assert_relative_eq;
use chrono::NaiveDate;
use image::{ImageOutputFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn fixture_model() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/crop_forest.json")
}

fn trained_engine() -> AdvisoryEngine {
    let model = fixture_model();
    let classifier = CropClassifier::load_or_fallback(Some(model.as_path()));
    AdvisoryEngine::new(
        ReferenceData::builtin().expect("built-in data"),
        classifier,
        Language::english(),
    )
    .with_conditions(FixedConditions::default())
}

fn rice_features() -> FeatureInput {
    FeatureInput {
        n: Some(90.0),
        p: Some(42.0),
        k: Some(43.0),
        temperature: Some(25.5),
        humidity: Some(70.0),
        ph: Some(6.5),
        rainfall: Some(100.0),
    }
}

fn png(color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 8, Rgb(color));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageOutputFormat::Png).unwrap();
    buf.into_inner()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// =========================================================================
// Section 1: Crop recommendation
// =========================================================================

#[test]
fn test_reference_scenario_recommends_rice() {
    let engine = trained_engine();
    assert_eq!(engine.classifier_kind(), ClassifierKind::Trained);

    let rec = engine
        .recommend_crop(&rice_features(), &Language::english())
        .unwrap();

    assert_eq!(rec.recommended_crop, CropLabel::Rice);
    assert_eq!(rec.recommended_crop.to_string(), "rice");
    assert_eq!(rec.classifier, ClassifierKind::Trained);
    assert_relative_eq!(rec.fertilizer.urea_kg(), 50.0);
    assert_relative_eq!(rec.fertilizer.dap_kg(), 50.0);

    let stage = rec
        .action_plan
        .stage(FERTILIZER_STAGE)
        .expect("fertilizer stage present");
    assert!(stage.steps[0].contains("50.0 kg of Urea"), "{}", stage.steps[0]);
    assert_eq!(rec.action_plan.stages.first().unwrap().stage, "Land Preparation");
}

#[test]
fn test_trained_model_predicts_maize() {
    let engine = trained_engine();
    let input = FeatureInput {
        n: Some(80.0),
        p: Some(40.0),
        k: Some(20.0),
        temperature: Some(22.0),
        humidity: Some(65.0),
        ph: Some(6.2),
        rainfall: Some(70.0),
    };
    let rec = engine.recommend_crop(&input, &Language::english()).unwrap();
    assert_eq!(rec.recommended_crop, CropLabel::Maize);
}

#[test]
fn test_missing_model_uses_ph_rule() {
    let engine = AdvisoryEngine::new(
        ReferenceData::builtin().unwrap(),
        CropClassifier::load_or_fallback(Some(Path::new("/nonexistent/model.json"))),
        Language::english(),
    );
    let mut input = rice_features();
    input.ph = Some(5.0);

    let rec = engine.recommend_crop(&input, &Language::english()).unwrap();
    assert_eq!(rec.classifier, ClassifierKind::RuleFallback);
    assert_eq!(rec.recommended_crop, CropLabel::PigeonPeas);
    // no authored guide: fertilizer stage only
    assert_eq!(rec.action_plan.stages.len(), 1);
}

#[test]
fn test_out_of_range_inputs_pass_through() {
    let engine = trained_engine();
    let mut input = rice_features();
    input.humidity = Some(140.0);

    let rec = engine.recommend_crop(&input, &Language::english()).unwrap();
    assert_eq!(rec.out_of_range.len(), 1);
    assert_relative_eq!(rec.out_of_range[0].value, 140.0);
}

#[test]
fn test_localized_plan_is_independent_per_call() {
    let engine = trained_engine();
    let kn = Language::new("kn").unwrap();

    let mut first = engine.recommend_crop(&rice_features(), &kn).unwrap();
    first.action_plan.stages[0].steps.clear();

    let second = engine.recommend_crop(&rice_features(), &kn).unwrap();
    assert_eq!(second.action_plan.stages.len(), 2);
    assert_eq!(second.action_plan.stages[0].steps.len(), 1);
    assert!(second.action_plan.stages[1].steps[0].contains("ಯೂರಿಯಾ"));
}

// =========================================================================
// Section 2: Soil photo + irrigation
// =========================================================================

#[test]
fn test_soil_photo_to_irrigation() {
    let engine = trained_engine().with_conditions(FixedConditions::default().with_sample(
        WeatherSample {
            temperature: 29.0,
            humidity: 60.0,
            forecast_condition: ForecastCondition::Sunny,
        },
    ));

    let soil = engine.analyze_soil_image(&png([200, 190, 170])).unwrap();
    assert_eq!(soil.soil_type, SoilType::SandySoil);
    assert_eq!(soil.organic_matter_estimate, OrganicMatter::Low);

    let report = engine.advise_irrigation(soil.soil_type, &Language::english());
    assert_eq!(report.advice_key, IrrigationAdvice::SandyHot);
    assert_eq!(report.advice, "HIGH watering needed (45-60 mins).");
}

#[test]
fn test_dark_soil_photo() {
    let soil = trained_engine().analyze_soil_image(&png([40, 30, 20])).unwrap();
    assert_eq!(soil.soil_type, SoilType::ClayLoam);
    assert_eq!(soil.organic_matter_estimate, OrganicMatter::High);
}

#[test]
fn test_corrupt_photo() {
    let err = trained_engine().analyze_soil_image(b"\x89PNG broken").unwrap_err();
    assert!(matches!(err, AdvisoryError::ImageDecode(_)));
}

#[test]
fn test_caller_supplied_weather() {
    let engine = trained_engine();
    let weather = WeatherSample {
        temperature: 24.0,
        humidity: 70.0,
        forecast_condition: ForecastCondition::Cloudy,
    };
    let hi = Language::new("hi").unwrap();
    let report = engine.advise_irrigation_for(SoilType::ClayLoam, weather, &hi);
    assert_eq!(report.advice_key, IrrigationAdvice::ClayCool);
    assert_eq!(report.advice, "कम पानी दें (15-20 मिनट)।");
    assert_eq!(report.weather, weather);
}

// =========================================================================
// Section 3: Harvest
// =========================================================================

#[test]
fn test_storm_forces_harvest_now() {
    let engine = trained_engine().with_conditions(
        FixedConditions::default()
            .with_outlook(WeatherOutlook::StormWarning)
            .with_trend(MarketTrend::TrendingUp),
    );
    let plan = engine
        .advise_harvest(CropLabel::Maize, date("2024-06-15"), &Language::english())
        .unwrap();

    assert_eq!(plan.advice_key, HarvestAdvice::HarvestNow);
    assert_eq!(plan.harvest_window_start, date("2024-09-23"));
    assert_eq!(plan.harvest_window_end, date("2024-10-03"));
    assert_eq!(plan.weather_outlook, "Storm Warning");
}

#[test]
fn test_feed_conditions_per_crop_trend() {
    let snapshot = serde_json::from_str(
        r#"{
            "weather": {"temperature": 27.0, "humidity": 60, "forecast_condition": "sunny"},
            "outlook": "clear_skies",
            "market_trend": "trending_down",
            "crop_trends": {"rice": "trending_up"}
        }"#,
    )
    .unwrap();
    let feed = FeedConditions::from_snapshot(snapshot).unwrap();
    let engine = trained_engine().with_conditions(feed);
    let sown = date("2024-01-01");

    let rice = engine
        .advise_harvest(CropLabel::Rice, sown, &Language::english())
        .unwrap();
    assert_eq!(rice.advice_key, HarvestAdvice::Wait);
    assert_eq!(rice.advice, "HOLD HARVEST. Wait for 5-7 days for a better price.");

    let maize = engine
        .advise_harvest(CropLabel::Maize, sown, &Language::english())
        .unwrap();
    assert_eq!(maize.advice_key, HarvestAdvice::Default);
    assert_eq!(maize.market_outlook, "Trending Down");
}

#[test]
fn test_window_width_for_every_profiled_crop() {
    let engine = trained_engine();
    for crop in [CropLabel::Rice, CropLabel::Maize, CropLabel::PigeonPeas, CropLabel::Coffee] {
        for outlook in WeatherOutlook::ALL {
            for trend in MarketTrend::ALL {
                let plan = engine
                    .advise_harvest_for(crop, date("2023-03-10"), outlook, trend, &Language::english())
                    .unwrap();
                assert_eq!((plan.harvest_window_end - plan.harvest_window_start).num_days(), 10);
            }
        }
    }
}

#[test]
fn test_harvest_for_crop_without_profile() {
    let err = trained_engine()
        .advise_harvest(CropLabel::Jute, date("2024-01-01"), &Language::english())
        .unwrap_err();
    assert!(matches!(err, AdvisoryError::UnknownCrop(_)));
}

// =========================================================================
// Section 4: Threats, profit, SMS, config
// =========================================================================

#[test]
fn test_threat_diagnosis_localized() {
    let engine = trained_engine().with_threat_classifier(Arc::new(FixedThreatClassifier::new(
        ThreatKey::new("amaranthus_viridis").unwrap(),
    )));
    let d = engine
        .diagnose_threat(Some(&png([0, 120, 0])), &Language::new("kn").unwrap())
        .unwrap();
    assert_eq!(d.threat_name, "Amaranthus Viridis");
    assert_eq!(d.threat_type, "ಕಳೆ");
    assert_eq!(d.recommended_action, "ಕೈಯಿಂದ ತೆಗೆಯುವುದು ಪರಿಣಾಮಕಾರಿ.");
}

#[test]
fn test_seeded_simulation_is_replayable() {
    let a = trained_engine().with_simulation_seed(11);
    let b = trained_engine().with_simulation_seed(11);
    let en = Language::english();
    for _ in 0..5 {
        let ra = a.advise_irrigation(SoilType::LoamySoil, &en);
        let rb = b.advise_irrigation(SoilType::LoamySoil, &en);
        assert_eq!(ra.weather, rb.weather);
        assert_eq!(
            a.diagnose_threat(None, &en).unwrap(),
            b.diagnose_threat(None, &en).unwrap()
        );
    }
}

#[test]
fn test_profit_and_sms() {
    let engine = trained_engine();
    let forecast = engine.forecast_profit(CropLabel::PigeonPeas).unwrap();
    assert_relative_eq!(forecast.estimated_revenue_per_acre, 52_000.0);

    let sms = engine
        .compose_sms_alert(CropLabel::PigeonPeas, "9000000001", &Language::english())
        .unwrap();
    assert!(sms.sms_message.contains("+91-9000000001"));
    assert!(sms.sms_message.contains("Pigeonpeas"));

    assert!(matches!(
        engine.compose_sms_alert(CropLabel::Rice, "123", &Language::english()),
        Err(AdvisoryError::Validation(_))
    ));
}

#[test]
fn test_engine_from_config() {
    let config = EngineConfig {
        default_language: "hi".to_string(),
        data_dir: Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("data")),
        model_path: Some(fixture_model()),
        ..EngineConfig::default()
    };
    let engine = AdvisoryEngine::from_config(&config).unwrap();
    assert_eq!(engine.classifier_kind(), ClassifierKind::Trained);
    assert_eq!(engine.default_language().as_str(), "hi");

    let lang = engine.resolve_language(None).unwrap();
    let rec = engine.recommend_crop(&rice_features(), &lang).unwrap();
    assert_eq!(rec.recommended_crop, CropLabel::Rice);
    assert_eq!(rec.action_plan.stages[0].stage, "खेत की तैयारी");
}
