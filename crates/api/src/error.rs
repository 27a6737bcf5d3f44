//! Mapping of domain errors to JSON error responses.
//!
//! Every error body has the shape `{"success": false, "error": CODE, "message": ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fiscus_core::CalculationError;
use fiscus_db::HistoryError;
use fiscus_shared::AppError;
use serde_json::json;
use tracing::error;

/// An error ready to be sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// A 401 with the given code.
    #[must_use]
    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    /// A 400 for a request field that could not be read.
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETER", message)
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "success": false,
                "error": self.code,
                "message": self.message
            })),
        )
            .into_response()
    }
}

impl From<CalculationError> for ApiError {
    fn from(err: CalculationError) -> Self {
        let status = if err.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };
        Self::new(status, err.error_code(), err.to_string())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match &err {
            AppError::Database(_) | AppError::Internal(_) => {
                error!(error = %err, "Request failed");
                "An error occurred".to_string()
            }
            _ => err.to_string(),
        };
        Self::new(status, err.error_code(), message)
    }
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NotFound(id) => {
                AppError::NotFound(format!("Calculation {id} not found")).into()
            }
            HistoryError::Database(e) => AppError::Database(e.to_string()).into(),
            HistoryError::Serialization(e) => AppError::Internal(e.to_string()).into(),
        }
    }
}
