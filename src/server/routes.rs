//! HTTP route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ServerState>` and is
//! read-only: every request is evaluated independently.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::parser::parse_odds_token;
use crate::report;
use crate::strategy::evaluate_input_sized;
use crate::strategy::kelly::{KellyConfig, KellySizer};
use crate::types::{BetEvaluation, DevigMethod, Leg};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Request defaults and CORS settings, fixed at startup.
pub struct ServerState {
    pub default_method: DevigMethod,
    pub sizer: KellySizer,
    pub allowed_origins: Vec<String>,
}

impl ServerState {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            default_method: cfg.engine.default_devig_method,
            sizer: KellySizer::new(KellyConfig {
                default_fraction: cfg.engine.default_kelly_fraction,
            }),
            allowed_origins: cfg.server.allowed_origins.clone(),
        }
    }
}

pub type AppState = Arc<ServerState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseOddsResponse {
    #[serde(flatten)]
    pub leg: Leg,
    pub input: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculateBetParams {
    pub input_str: String,
    pub final_odds: f64,
    pub bankroll: f64,
    pub kelly_fraction: Option<f64>,
    pub devig_method: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalculateBetResponse {
    pub output: Vec<String>,
    pub parsed_legs: Vec<Leg>,
    pub evaluation: BetEvaluation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub input: String,
}

/// A rejected request, rendered as `400` with an [`ErrorBody`].
#[derive(Debug)]
pub struct ApiError {
    pub error: String,
    pub input: String,
}

impl ApiError {
    fn new(error: impl ToString, input: &str) -> Self {
        Self { error: error.to_string(), input: input.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self.error, input = %self.input, "Request rejected");
        let body = ErrorBody { error: self.error, input: self.input };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Devig & Kelly pricing service".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// GET /parse-odds/:odds_str
pub async fn parse_odds(Path(odds_str): Path<String>) -> Result<Json<ParseOddsResponse>, ApiError> {
    let leg = parse_odds_token(&odds_str).map_err(|e| ApiError::new(e, &odds_str))?;
    debug!(input = %odds_str, leg = %leg, "Token parsed");
    Ok(Json(ParseOddsResponse { leg, input: odds_str }))
}

/// GET /calculate-bet
pub async fn calculate_bet(
    State(state): State<AppState>,
    Query(params): Query<CalculateBetParams>,
) -> Result<Json<CalculateBetResponse>, ApiError> {
    let input = params.input_str.as_str();

    let method = match params.devig_method.as_deref() {
        Some(name) => name.parse::<DevigMethod>().map_err(|e| ApiError::new(e, input))?,
        None => state.default_method,
    };

    let evaluation = evaluate_input_sized(
        &state.sizer,
        input,
        params.final_odds,
        params.bankroll,
        params.kelly_fraction,
        method,
    )
    .map_err(|e| ApiError::new(e, input))?;

    Ok(Json(CalculateBetResponse {
        output: report::render(&evaluation),
        parsed_legs: evaluation.per_leg.iter().map(|v| v.leg).collect(),
        evaluation,
    }))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
