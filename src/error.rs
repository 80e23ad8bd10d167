use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by request handlers.
///
/// Every variant maps to a fixed status code and a client-safe message;
/// internal causes are logged and never written to the response body.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, empty or malformed input.
    #[error("{0}")]
    Validation(String),

    /// The normalized email is already registered.
    #[error("user already exists")]
    Conflict,

    /// Unknown email or wrong password. Both cases look the same.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, badly signed or expired bearer token.
    #[error("unauthenticated: {0}")]
    Unauthenticated(&'static str),

    /// The task does not exist or belongs to someone else.
    #[error("task not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            // Login failures stay 400 rather than 401 so clients can't tell
            // them apart from other bad input.
            Self::Validation(_) | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Validation(msg) => msg.clone(),
            Self::Conflict => "User already exists".into(),
            Self::InvalidCredentials => "Invalid credentials".into(),
            Self::Unauthenticated(reason) => (*reason).into(),
            Self::NotFound => "Task not found".into(),
            Self::Internal(e) => {
                error!(error = ?e, "internal error");
                "Internal server error".into()
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
