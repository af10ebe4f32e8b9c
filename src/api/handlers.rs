//! HTTP request handlers for the pricing engine API.
//!
//! Every endpoint is a `POST` taking and returning JSON. Handlers parse the
//! body, call into the shared [`Engine`](crate::engine::Engine) and map
//! engine errors onto status codes.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::ProjectSnapshot;

use super::request::{
    CoverageRequest, InvestmentRequest, MarginRequest, ScenarioRequest, TaxRequest,
    TeamCostRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/team-cost", post(team_cost_handler))
        .route("/coverage", post(coverage_handler))
        .route("/taxes", post(taxes_handler))
        .route("/margin", post(margin_handler))
        .route("/investment", post(investment_handler))
        .route("/scenarios", post(scenarios_handler))
        .route("/budget", post(budget_handler))
        .route("/calculate", post(calculate_handler))
        .with_state(state)
}

/// Unwraps a JSON body, turning extractor rejections into 400 responses.
fn read_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the problem
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

/// Logs the outcome of a request and builds its response.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    endpoint: &'static str,
    started: Instant,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                endpoint,
                duration_us = started.elapsed().as_micros() as u64,
                "Request completed successfully"
            );
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                endpoint,
                category = ?err.category(),
                error = %err,
                "Request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

macro_rules! read_or_reject {
    ($payload:expr, $correlation_id:expr) => {
        match read_body($payload, $correlation_id) {
            Ok(request) => request,
            Err(rejection) => return rejection.into_response(),
        }
    };
}

fn begin(endpoint: &'static str) -> (Uuid, Instant) {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint, "Processing request");
    (correlation_id, Instant::now())
}

/// Handler for `POST /team-cost`.
async fn team_cost_handler(
    State(state): State<AppState>,
    payload: Result<Json<TeamCostRequest>, JsonRejection>,
) -> Response {
    let (correlation_id, started) = begin("/team-cost");
    let request = read_or_reject!(payload, correlation_id);
    let result = state
        .engine()
        .team_cost(&request.team, &request.schedules);
    respond(correlation_id, "/team-cost", started, result)
}

/// Handler for `POST /coverage`.
async fn coverage_handler(
    State(state): State<AppState>,
    payload: Result<Json<CoverageRequest>, JsonRejection>,
) -> Response {
    let (correlation_id, started) = begin("/coverage");
    let request = read_or_reject!(payload, correlation_id);
    let result = Ok(state.engine().coverage(&request.schedules));
    respond(correlation_id, "/coverage", started, result)
}

/// Handler for `POST /taxes`.
async fn taxes_handler(
    State(state): State<AppState>,
    payload: Result<Json<TaxRequest>, JsonRejection>,
) -> Response {
    let (correlation_id, started) = begin("/taxes");
    let request = read_or_reject!(payload, correlation_id);
    let result = state.engine().taxes(request.revenue, &request.config);
    respond(correlation_id, "/taxes", started, result)
}

/// Handler for `POST /margin`.
async fn margin_handler(
    State(state): State<AppState>,
    payload: Result<Json<MarginRequest>, JsonRejection>,
) -> Response {
    let (correlation_id, started) = begin("/margin");
    let request = read_or_reject!(payload, correlation_id);
    let result = state
        .engine()
        .margin(request.cost, &request.config, &request.additional_costs);
    respond(correlation_id, "/margin", started, result)
}

/// Handler for `POST /investment`.
async fn investment_handler(
    State(state): State<AppState>,
    payload: Result<Json<InvestmentRequest>, JsonRejection>,
) -> Response {
    let (correlation_id, started) = begin("/investment");
    let request = read_or_reject!(payload, correlation_id);
    let result = state.engine().investment(
        request.investment,
        &request.returns,
        request.discount_rate,
    );
    respond(correlation_id, "/investment", started, result)
}

/// Handler for `POST /scenarios`.
///
/// Scenario evaluation fans out over the rayon pool, so it runs off the
/// async workers.
async fn scenarios_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScenarioRequest>, JsonRejection>,
) -> Response {
    let (correlation_id, started) = begin("/scenarios");
    let request = read_or_reject!(payload, correlation_id);
    let engine = state.engine_handle();
    let result = tokio::task::spawn_blocking(move || {
        engine.compare(&request.baseline, &request.scenarios)
    })
    .await
    .unwrap_or_else(|e| {
        Err(EngineError::CalculationError {
            message: format!("scenario evaluation aborted: {}", e),
        })
    });
    respond(correlation_id, "/scenarios", started, result)
}

/// Handler for `POST /budget`.
async fn budget_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProjectSnapshot>, JsonRejection>,
) -> Response {
    let (correlation_id, started) = begin("/budget");
    let snapshot = read_or_reject!(payload, correlation_id);
    let result = state.engine().budget(&snapshot);
    respond(correlation_id, "/budget", started, result)
}

/// Handler for `POST /calculate`, the full pipeline.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProjectSnapshot>, JsonRejection>,
) -> Response {
    let (correlation_id, started) = begin("/calculate");
    let snapshot = read_or_reject!(payload, correlation_id);
    let result = state.engine().calculate(&snapshot);
    respond(correlation_id, "/calculate", started, result)
}
