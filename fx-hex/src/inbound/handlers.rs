//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use fx_types::{
    AlertEvaluation, AlertId, AlertResponse, AppError, ConversionResponse, ConvertRequest,
    CreateAlertRequest, CurrencyCode, CurrencyInfo, MultiConvertRequest, MultiConvertResponse,
    QuoteRequest, QuoteResponse, SnapshotStore,
};

use crate::FxService;

/// Application state shared across handlers.
pub struct AppState<S: SnapshotStore> {
    pub service: Arc<FxService<S>>,
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Unsupported currency: XYZ")]
    pub error: String,
    #[schema(example = 400)]
    pub code: u16,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = ErrorResponse {
            error: message,
            code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

fn parse_alert_id(raw: &str) -> Result<AlertId, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid alert ID: {}", raw)))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Currencies & Rates
// ─────────────────────────────────────────────────────────────────────────────

/// List the supported currencies.
pub async fn list_currencies() -> impl IntoResponse {
    let currencies: Vec<CurrencyInfo> = CurrencyCode::all().iter().copied().map(Into::into).collect();
    Json(currencies)
}

/// List every effective rate.
#[tracing::instrument(skip(state))]
pub async fn list_rates<S: SnapshotStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let rates = state.service.rates()?;
    Ok(Json(rates))
}

/// Fetch fresh rates from the provider.
#[tracing::instrument(skip(state))]
pub async fn refresh_rates<S: SnapshotStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let rates = state.service.refresh().await?;
    Ok(Json(rates.to_response()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────────────────────

/// Convert an amount between two currencies.
#[tracing::instrument(skip(state), fields(from = %req.from, to = %req.to))]
pub async fn convert<S: SnapshotStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<ConvertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let conversion = state.service.convert(req)?;
    Ok(Json(ConversionResponse::from(conversion)))
}

/// Convert an amount into several currencies.
#[tracing::instrument(skip(state), fields(base = %req.base, targets = req.targets.len()))]
pub async fn convert_many<S: SnapshotStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<MultiConvertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.service.convert_many(req)?;
    Ok(Json(MultiConvertResponse::from(result)))
}

/// Convert and apply fee and tax.
#[tracing::instrument(skip(state), fields(from = %req.from, to = %req.to))]
pub async fn quote<S: SnapshotStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<QuoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = state.service.quote(req)?;
    Ok(Json(QuoteResponse::from(quote)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Alerts
// ─────────────────────────────────────────────────────────────────────────────

/// Create a rate alert.
#[tracing::instrument(skip(state), fields(pair = %format!("{}/{}", req.from, req.to)))]
pub async fn create_alert<S: SnapshotStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateAlertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let alert = state.service.create_alert(req)?;
    Ok((StatusCode::CREATED, Json(AlertResponse::from(&alert))))
}

/// List alerts in creation order.
#[tracing::instrument(skip(state))]
pub async fn list_alerts<S: SnapshotStore>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    let alerts: Vec<AlertResponse> = state
        .service
        .list_alerts()
        .iter()
        .map(AlertResponse::from)
        .collect();
    Json(alerts)
}

/// Activate or deactivate an alert.
#[tracing::instrument(skip(state), fields(alert_id = %id))]
pub async fn toggle_alert<S: SnapshotStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let alert = state.service.toggle_alert(parse_alert_id(&id)?)?;
    Ok(Json(AlertResponse::from(&alert)))
}

/// Delete an alert.
#[tracing::instrument(skip(state), fields(alert_id = %id))]
pub async fn remove_alert<S: SnapshotStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.remove_alert(parse_alert_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckAlertsResponse {
    pub checked: usize,
    pub fired: usize,
    pub evaluations: Vec<AlertEvaluation>,
}

/// Evaluate every alert and notify the ones that just fired.
#[tracing::instrument(skip(state))]
pub async fn check_alerts<S: SnapshotStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let evaluations = state.service.check_alerts().await?;
    Ok(Json(CheckAlertsResponse {
        checked: evaluations.len(),
        fired: evaluations.iter().filter(|e| e.fired).count(),
        evaluations,
    }))
}
