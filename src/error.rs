//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::BackendError;
use crate::reservations::session::SessionError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Session(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
            AppError::Backend(e) if e.is_not_found() => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Backend(_) => (StatusCode::BAD_GATEWAY, "backend"),
            AppError::Template(_) => (StatusCode::INTERNAL_SERVER_ERROR, "template"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        match &self {
            AppError::Backend(e) => tracing::error!("Backend error: {}", e),
            AppError::Template(e) => tracing::error!("Template error: {}", e),
            AppError::NotFound(_) | AppError::Session(_) => {
                tracing::debug!("Rejected request: {}", self)
            }
        }

        let details = match &self {
            AppError::Session(SessionError::Incomplete(problems)) => {
                Some(serde_json::json!(problems))
            }
            _ => None,
        };

        let message = match &self {
            // internals stay in the log
            AppError::Template(_) => "Internal error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservations::ledger::LedgerError;

    #[test]
    fn test_status_mapping() {
        let err = AppError::Session(SessionError::Ledger(LedgerError::NoEntrySelected));
        assert_eq!(err.status_and_type().0, StatusCode::UNPROCESSABLE_ENTITY);

        let err = AppError::Backend(BackendError::Api {
            status: 404,
            message: "Reserva no encontrada".to_string(),
        });
        assert_eq!(err.status_and_type().0, StatusCode::NOT_FOUND);

        let err = AppError::Backend(BackendError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(err.status_and_type().0, StatusCode::BAD_GATEWAY);

        let err = AppError::NotFound("Session".to_string());
        assert_eq!(err.to_string(), "Session not found");

        let err = AppError::Session(SessionError::Ledger(LedgerError::AmountOverflow));
        assert_eq!(err.status_and_type(), (StatusCode::UNPROCESSABLE_ENTITY, "validation"));
    }
}
