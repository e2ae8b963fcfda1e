//! Error type shared by the service layer, with the HTTP mapping in one
//! place so handlers can bubble failures with `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The addressed resource does not exist.
    #[error("not found")]
    NotFound,

    /// Login failed. Deliberately carries no detail about whether the
    /// email exists, so responses stay uniform.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A password-reset token that is unknown, expired or already used.
    #[error("invalid or expired token")]
    InvalidOrExpiredToken,

    /// The request was well-formed JSON but semantically unacceptable.
    #[error("{0}")]
    Validation(String),

    /// Missing or unverifiable session.
    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))).into_response()
            }
            ServiceError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Invalid credentials"})),
            )
                .into_response(),
            ServiceError::InvalidOrExpiredToken => (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": "Invalid or expired token"})),
            )
                .into_response(),
            ServiceError::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({"message": message}))).into_response()
            }
            ServiceError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Unauthorized"})),
            )
                .into_response(),
            ServiceError::Internal(err) => {
                error!("Internal error handling request: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"message": "Internal server error"})),
                )
                    .into_response()
            }
        }
    }
}
