//! Calculation history routes (requires auth middleware to be applied externally).

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use fiscus_db::entities::calculations;
use fiscus_shared::types::{CalculationId, PageRequest, PageResponse};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the history routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calculations/history", get(list_history))
        .route(
            "/calculations/history/{id}",
            get(get_calculation).delete(delete_calculation),
        )
}

// ============================================================================
// Response Types
// ============================================================================

/// A stored calculation as returned to its owner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRecordResponse {
    /// Record ID.
    pub id: Uuid,
    /// Calculation type wire name.
    #[serde(rename = "type")]
    pub calculation_type: String,
    /// Resolved parameters.
    pub parameters: serde_json::Value,
    /// Stored result.
    pub result: serde_json::Value,
    /// Caller's note.
    pub description: Option<String>,
    /// When the calculation ran.
    pub created_at: DateTimeWithTimeZone,
}

impl From<calculations::Model> for CalculationRecordResponse {
    fn from(model: calculations::Model) -> Self {
        Self {
            id: model.id,
            calculation_type: model.calculation_type,
            parameters: model.parameters,
            result: model.result,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

fn parse_id(path: Result<Path<Uuid>, PathRejection>) -> Result<CalculationId, ApiError> {
    path.map(|Path(id)| CalculationId::from_uuid(id))
        .map_err(|e| ApiError::invalid_parameter(e.body_text()))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /calculations/history
async fn list_history(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(page) = query.map_err(|e| ApiError::invalid_parameter(e.body_text()))?;
    let page = page.normalized();
    let repo = state.history()?;

    let (items, total) = repo.list_for_user(auth.user_id(), page).await?;
    let response = PageResponse::new(
        items
            .into_iter()
            .map(CalculationRecordResponse::from)
            .collect(),
        page.page,
        page.per_page,
        total,
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": response.data,
            "meta": response.meta
        })),
    ))
}

/// GET /calculations/history/{id}
async fn get_calculation(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path)?;
    let repo = state.history()?;

    let model = repo.get_for_user(id, auth.user_id()).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": CalculationRecordResponse::from(model)
        })),
    ))
}

/// DELETE /calculations/history/{id}
async fn delete_calculation(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path)?;
    let repo = state.history()?;

    repo.delete(id, auth.user_id()).await?;
    info!(calculation_id = %id, user_id = %auth.user_id(), "Calculation deleted");

    Ok(StatusCode::NO_CONTENT)
}
