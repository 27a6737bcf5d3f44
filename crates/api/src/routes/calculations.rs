//! Calculation routes.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use fiscus_core::{
    CalculationError,
    calculator::{ParameterBag, supported_types},
};
use fiscus_db::{CalculationRepository, NewCalculation};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, error::ApiError, middleware::OptionalAuthUser};

/// Creates the calculation routes. Both are public.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calculations/types", get(list_types))
        .route("/calculations/calculate", post(calculate))
}

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /calculations/calculate`.
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    /// Calculation type wire name, e.g. `SIMPLE_INTEREST`.
    #[serde(rename = "type")]
    pub calculation_type: Option<String>,
    /// Loosely typed parameters for the chosen type.
    #[serde(default)]
    pub parameters: Option<ParameterBag>,
    /// Free-text note stored with the history record.
    #[serde(default)]
    pub description: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /calculations/types
async fn list_types() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": supported_types()
        })),
    )
}

/// POST /calculations/calculate
async fn calculate(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::invalid_parameter(e.body_text()))?;

    let calculation_type = request
        .calculation_type
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| CalculationError::MissingParameters(vec!["type".to_string()]))?;
    let parameters = request.parameters.unwrap_or_default();
    let description = request.description;

    let (input, result) = state
        .calculator
        .calculate_raw(calculation_type.trim(), &parameters)?;

    info!(
        calculation_type = %input.calculation_type(),
        authenticated = auth.0.is_some(),
        "Calculation completed"
    );

    if let Some(db) = &state.db {
        match NewCalculation::from_outcome(auth.user_id(), &input, &result, description.clone()) {
            Ok(record) => {
                let repo = CalculationRepository::new((**db).clone());
                tokio::spawn(async move {
                    if let Err(e) = repo.record(record).await {
                        error!(error = %e, "Failed to record calculation");
                    }
                });
            }
            Err(e) => error!(error = %e, "Failed to serialize calculation for history"),
        }
    }

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "type": input.calculation_type(),
                "parameters": input,
                "result": result,
                "description": description
            }
        })),
    ))
}
