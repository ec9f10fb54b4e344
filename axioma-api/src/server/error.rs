//! Error responses of the HTTP API.
//!
//! Every error is returned as `{"detail": "<message>"}`. Upstream failures are
//! logged and reported with a generic message.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axioma_engine::EngineError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound(msg) => Self::NotFound(msg),
            EngineError::InvalidArgument(msg) => Self::BadRequest(msg),
            e @ EngineError::LimitExceeded { .. } => Self::BadRequest(e.to_string()),
            EngineError::Repository(e) => {
                error!(error = %e, "Repository failure");
                Self::Internal(e.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => Self::Unauthorized("Not authenticated".to_string()),
            AuthError::InvalidToken(_) => {
                Self::Unauthorized("Invalid authentication credentials".to_string())
            }
            // An identity without an email cannot be mapped to a user.
            AuthError::UserResolution(EngineError::InvalidArgument(_)) => {
                Self::Unauthorized("Invalid authentication credentials".to_string())
            }
            AuthError::UserResolution(e) => e.into(),
            AuthError::KeyFetch(msg) => {
                error!(error = %msg, "Failed to fetch token signing keys");
                Self::Internal(msg)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) | Self::Unauthorized(msg) => msg,
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
