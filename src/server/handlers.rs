use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::weather::{LookupError, WeatherOutcome};

use super::state::AppState;
use super::static_files;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        let status = match err {
            LookupError::EmptyLocation => StatusCode::BAD_REQUEST,
            LookupError::MissingCredential { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            LookupError::Completion(_) => StatusCode::BAD_GATEWAY,
        };
        api_error(status, err.user_message())
    }
}

// ─── Static file handlers ────────────────────────────────────────

pub async fn index() -> Html<&'static str> {
    Html(static_files::INDEX_HTML)
}

pub async fn style() -> Response {
    (
        [(header::CONTENT_TYPE, "text/css")],
        static_files::STYLE_CSS,
    )
        .into_response()
}

pub async fn script() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        static_files::APP_JS,
    )
        .into_response()
}

// ─── GET /api/weather ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct WeatherQuery {
    pub location: Option<String>,
}

pub(super) async fn weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeatherQuery>,
) -> Result<Json<WeatherOutcome>, ApiError> {
    let start = Instant::now();

    let location = params.location.unwrap_or_default().trim().to_string();
    if location.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'location' parameter"));
    }

    // The lookup does blocking HTTP; keep it off the async workers.
    let worker_state = Arc::clone(&state);
    let query = location.clone();
    let result = tokio::task::spawn_blocking(move || worker_state.orchestrator.fetch(&query))
        .await
        .map_err(|e| {
            tracing::error!("Lookup task for '{}' panicked: {}", location, e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Lookup failed unexpectedly")
        })?;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    match result {
        Ok(outcome) => {
            tracing::info!(
                "GET /api/weather?location={} -> {} ({:.1}ms)",
                location,
                outcome.pathway,
                elapsed_ms
            );
            Ok(Json(outcome))
        }
        Err(err) => {
            tracing::warn!(
                "GET /api/weather?location={} -> error: {} ({:.1}ms)",
                location,
                err,
                elapsed_ms
            );
            Err(err.into())
        }
    }
}
