//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for calculations and their history
//! - Authentication middleware
//! - Error to response mapping

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use fiscus_core::CalculatorService;
use fiscus_db::CalculationRepository;
use fiscus_shared::{AppError, JwtService};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Calculation dispatcher.
    pub calculator: CalculatorService,
    /// JWT service for token verification.
    pub jwt_service: Arc<JwtService>,
    /// Database connection pool, when history persistence is configured.
    pub db: Option<Arc<DatabaseConnection>>,
}

impl AppState {
    /// Returns a history repository, or 503 when no database is configured.
    pub fn history(&self) -> Result<CalculationRepository, ApiError> {
        self.db
            .as_ref()
            .map(|db| CalculationRepository::new((**db).clone()))
            .ok_or_else(|| {
                AppError::ServiceUnavailable("Calculation history is not configured".to_string())
                    .into()
            })
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
