// Axum API Server Module
//
// Purpose: JSON boundary over the advisory engine. Handlers only parse
// requests, call one engine operation and map errors to HTTP statuses.

#[cfg(feature = "api")]
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

#[cfg(feature = "api")]
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use chrono::NaiveDate;

#[cfg(feature = "api")]
use crate::conditions::{MarketTrend, WeatherOutlook, WeatherSample};

#[cfg(feature = "api")]
use crate::config::EngineConfig;

#[cfg(feature = "api")]
use crate::engine::AdvisoryEngine;

#[cfg(feature = "api")]
use crate::error::AdvisoryError;

#[cfg(feature = "api")]
use crate::features::FeatureInput;

#[cfg(feature = "api")]
use crate::knowledge::Language;

#[cfg(feature = "api")]
use crate::classifier::CropLabel;

#[cfg(feature = "api")]
use crate::soil::SoilType;

/// Largest accepted photo upload
#[cfg(feature = "api")]
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AdvisoryEngine>,
}

#[cfg(feature = "api")]
impl AppState {
    pub fn new(engine: AdvisoryEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Build the engine from config; `seed` makes the simulated collaborators replayable
    pub fn from_config(config: &EngineConfig, seed: Option<u64>) -> anyhow::Result<Self> {
        tracing::info!("Initializing advisory engine...");
        let mut engine = AdvisoryEngine::from_config(config)?;

        if let Some(seed) = seed {
            tracing::info!("Simulated conditions seeded with {}", seed);
            engine = engine.with_simulation_seed(seed);
        }

        Ok(Self::new(engine))
    }
}

// ============================================================================
// Router Configuration
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Crop + fertilizer
        .route("/api/crop/recommend", post(recommend_crop))

        // Photo uploads (raw bytes)
        .route("/api/soil/analyze", post(analyze_soil))
        .route("/api/threat/diagnose", post(diagnose_threat))

        // Advisories
        .route("/api/irrigation/advice", post(irrigation_advice))
        .route("/api/harvest/advice", post(harvest_advice))

        // Supplementary tools
        .route("/api/profit/forecast", post(profit_forecast))
        .route("/api/sms/simulate", post(simulate_sms))

        // Middleware (applied in reverse order)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "classifier": state.engine.classifier_kind(),
    }))
}

#[cfg(feature = "api")]
async fn recommend_crop(
    State(state): State<AppState>,
    Json(payload): Json<CropRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let language = state.engine.resolve_language(payload.lang.as_deref())?;
    let recommendation = state.engine.recommend_crop(&payload.features, &language)?;

    Ok(Json(serde_json::json!({
        "recommended_crop": recommendation.recommended_crop,
        "classifier": recommendation.classifier,
        "action_plan": recommendation.action_plan,
        "fertilizer": recommendation.fertilizer,
        "out_of_range": recommendation.out_of_range,
    })))
}

/// Soil photo → soil type (image decoding on the blocking pool)
#[cfg(feature = "api")]
async fn analyze_soil(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.is_empty() {
        return Err(AdvisoryError::Validation("no image uploaded".to_string()).into());
    }

    let engine = state.engine.clone();
    let observation = tokio::task::spawn_blocking(move || engine.analyze_soil_image(&body))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(serde_json::json!(observation)))
}

#[cfg(feature = "api")]
async fn irrigation_advice(
    State(state): State<AppState>,
    Json(payload): Json<IrrigationRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let language = state.engine.resolve_language(payload.lang.as_deref())?;
    let soil_type: SoilType = payload.soil_type.parse()?;

    // Weather resolved upstream wins over the configured provider
    let report = match payload.weather {
        Some(weather) => state.engine.advise_irrigation_for(soil_type, weather, &language),
        None => state.engine.advise_irrigation(soil_type, &language),
    };

    Ok(Json(serde_json::json!(report)))
}

#[cfg(feature = "api")]
async fn harvest_advice(
    State(state): State<AppState>,
    Json(payload): Json<HarvestRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let language = state.engine.resolve_language(payload.lang.as_deref())?;
    let crop: CropLabel = payload.crop.parse()?;
    let sowing_date = NaiveDate::parse_from_str(payload.sowing_date.trim(), "%Y-%m-%d")
        .map_err(|e| {
            AdvisoryError::Validation(format!(
                "sowing_date must be YYYY-MM-DD ({}): {}",
                payload.sowing_date, e
            ))
        })?;

    // Supplied conditions win; a missing half comes from the provider
    let plan = state.engine.advise_harvest_with(
        crop,
        sowing_date,
        payload.weather_outlook,
        payload.market_trend,
        &language,
    )?;

    Ok(Json(serde_json::json!(plan)))
}

#[cfg(feature = "api")]
async fn diagnose_threat(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let language = state.engine.resolve_language(query.lang.as_deref())?;

    let engine = state.engine.clone();
    let diagnosis = tokio::task::spawn_blocking(move || {
        let image = if body.is_empty() { None } else { Some(body.as_ref()) };
        engine.diagnose_threat(image, &language)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(serde_json::json!(diagnosis)))
}

#[cfg(feature = "api")]
async fn profit_forecast(
    State(state): State<AppState>,
    Json(payload): Json<ProfitRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let crop: CropLabel = payload.crop.parse()?;
    let forecast = state.engine.forecast_profit(crop)?;
    Ok(Json(serde_json::json!(forecast)))
}

#[cfg(feature = "api")]
async fn simulate_sms(
    State(state): State<AppState>,
    Json(payload): Json<SmsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let language = state.engine.resolve_language(payload.lang.as_deref())?;
    let crop: CropLabel = payload.crop.parse()?;
    let alert = state
        .engine
        .compose_sms_alert(crop, &payload.phone_number, &language)?;

    Ok(Json(serde_json::json!({
        "sms_message": alert.sms_message,
    })))
}

// ============================================================================
// Request Types
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug, serde::Deserialize)]
struct CropRequest {
    #[serde(flatten)]
    features: FeatureInput,
    lang: Option<String>,
}

#[cfg(feature = "api")]
#[derive(Debug, serde::Deserialize)]
struct IrrigationRequest {
    /// "Clay Loam", "Loamy Soil", "Sandy Soil" (or snake_case)
    soil_type: String,
    lang: Option<String>,
    weather: Option<WeatherSample>,
}

#[cfg(feature = "api")]
#[derive(Debug, serde::Deserialize)]
struct HarvestRequest {
    crop: String,
    /// YYYY-MM-DD
    sowing_date: String,
    lang: Option<String>,
    /// Outlook and trend resolved upstream; either may be omitted
    weather_outlook: Option<WeatherOutlook>,
    market_trend: Option<MarketTrend>,
}

#[cfg(feature = "api")]
#[derive(Debug, serde::Deserialize)]
struct ProfitRequest {
    crop: String,
}

#[cfg(feature = "api")]
#[derive(Debug, serde::Deserialize)]
struct SmsRequest {
    crop: String,
    phone_number: String,
    lang: Option<String>,
}

#[cfg(feature = "api")]
#[derive(Debug, serde::Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
enum AppError {
    Advisory(AdvisoryError),
    Internal(String),
}

#[cfg(feature = "api")]
impl From<AdvisoryError> for AppError {
    fn from(err: AdvisoryError) -> Self {
        AppError::Advisory(err)
    }
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Advisory(err) => {
                let status = match err {
                    AdvisoryError::Validation(_) | AdvisoryError::ImageDecode(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    AdvisoryError::UnknownCrop(_) => StatusCode::NOT_FOUND,
                    AdvisoryError::ModelUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
