use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Unified application error type that maps to JSON HTTP responses.
///
/// Body format: `{ "error": { "code": "...", "message": "..." } }`.
#[derive(Debug)]
pub enum AppError {
    /// 400 Bad Request (missing or invalid input)
    BadRequest(String),
    /// 401 Unauthorized
    Unauthorized(String),
    /// 404 Not Found
    NotFound(String),
    /// 409 Conflict
    Conflict(String),
    /// 413 Payload Too Large
    PayloadTooLarge(String),
    /// 500 Internal Server Error (wraps any error, logs details, returns generic message)
    Internal(anyhow::Error),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn game_not_found() -> Self {
        Self::NotFound("Game not found".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            Self::BadRequest(msg) => ("BAD_REQUEST", msg),
            Self::Unauthorized(msg) => ("UNAUTHORIZED", msg),
            Self::NotFound(msg) => ("NOT_FOUND", msg),
            Self::Conflict(msg) => ("CONFLICT", msg),
            Self::PayloadTooLarge(msg) => ("PAYLOAD_TOO_LARGE", msg),
            Self::Internal(err) => {
                tracing::error!("Internal server error: {err:#}");
                ("INTERNAL_ERROR", "An internal error occurred".to_string())
            }
        };

        (
            status,
            Json(json!({
                "error": {
                    "code": code,
                    "message": message,
                }
            })),
        )
            .into_response()
    }
}

/// Allow `?` to automatically convert any `anyhow::Error` into `AppError::Internal`.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
