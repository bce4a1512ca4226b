//! REST API endpoints.
//!
//! Axum-based read-only HTTP API over the match history: summary, equipment
//! and synergy tables, insights and the placement trend.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::calculate::StatsParams;
use crate::config::AnalysisConfig;
use crate::models::{EmptyReason, Outcome};

use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Filter parameters accepted by every analysis endpoint.
///
/// Unset fields fall back to the `[analysis]` section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisQuery {
    /// "all", "solo" or "double-up"
    pub mode: Option<String>,
    /// Most recent matches to include, 0 for all
    pub games: Option<usize>,
    pub min_games: Option<u32>,
    pub min_synergy_games: Option<u32>,
    /// "all" or "primary"
    pub scope: Option<String>,
}

impl AnalysisQuery {
    pub fn to_params(&self, defaults: &AnalysisConfig) -> Result<StatsParams, ApiError> {
        let mut params = defaults.to_params();

        if let Some(mode) = &self.mode {
            params.mode = mode.parse().map_err(ApiError::BadRequest)?;
        }
        if let Some(games) = self.games {
            params.max_matches = (games > 0).then_some(games);
        }
        if let Some(min) = self.min_games {
            params.min_equipment_games = min;
        }
        if let Some(min) = self.min_synergy_games {
            params.min_synergy_games = Some(min);
        }
        if let Some(scope) = &self.scope {
            params.synergy_scope = scope.parse().map_err(ApiError::BadRequest)?;
        }

        Ok(params)
    }
}

/// Engine outcome as a response body: `{"status":"ready","data":...}` or
/// `{"status":"empty","reason":...}`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeBody<T> {
    Ready { data: T },
    Empty { reason: EmptyReason },
}

impl<T> From<Outcome<T>> for OutcomeBody<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Ready(data) => OutcomeBody::Ready { data },
            Outcome::Empty(reason) => OutcomeBody::Empty { reason },
        }
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);

    if origin == "*" {
        return cors.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => cors.allow_origin(value),
        Err(_) => {
            tracing::warn!("Invalid CORS origin {:?}, allowing any origin", origin);
            cors.allow_origin(Any)
        }
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/api/health", get(routes::overview::health))
        .route("/api/analysis", get(routes::overview::analysis))
        .route("/api/summary", get(routes::overview::summary))
        .route("/api/levels", get(routes::overview::levels))
        .route("/api/insights", get(routes::overview::insights))
        .route("/api/trend", get(routes::overview::trend))
        .route("/api/equipment", get(routes::equipment::list))
        .route("/api/equipment/:name", get(routes::equipment::detail))
        .route("/api/synergies", get(routes::synergies::list))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
