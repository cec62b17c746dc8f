use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Guard rejection that tells the client where to send the user next
    #[error("Redirect to {redirect_to}: {message}")]
    Redirect {
        status: StatusCode,
        message: String,
        redirect_to: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl AppError {
    /// Whether this is an authentication/authorization failure rather than a generic one
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            AppError::Auth(_)
                | AppError::Unauthorized(_)
                | AppError::Forbidden(_)
                | AppError::Redirect { .. }
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Auth(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::Redirect {
                status,
                ref message,
                ref redirect_to,
            } => (
                status,
                message.clone(),
                Some(vec![format!("redirect_to:{}", redirect_to)]),
            ),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::ExternalServiceError(ref msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone(), None)
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_are_distinguished_from_generic_errors() {
        assert!(AppError::Unauthorized("x".into()).is_auth_error());
        assert!(AppError::Forbidden("x".into()).is_auth_error());
        assert!(AppError::Redirect {
            status: StatusCode::UNAUTHORIZED,
            message: "x".into(),
            redirect_to: "/login".into(),
        }
        .is_auth_error());
        assert!(!AppError::Validation("x".into()).is_auth_error());
        assert!(!AppError::ExternalServiceError("x".into()).is_auth_error());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ExternalServiceError("x".into())
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Redirect {
                status: StatusCode::FORBIDDEN,
                message: "x".into(),
                redirect_to: "/".into(),
            }
            .into_response()
            .status(),
            StatusCode::FORBIDDEN
        );
    }
}
