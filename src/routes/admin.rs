use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::auth::Credentials;
use crate::error::AppError;
use crate::state::AppState;

/// Admin console router.
pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// `POST /api/admin/login`: Check the admin console credentials.
async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Value>, AppError> {
    if !state.auth.verify(&credentials) {
        tracing::warn!(email = %credentials.email, "Rejected admin login");
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    tracing::info!(email = %credentials.email, "Admin logged in");
    Ok(Json(json!({
        "authenticated": true,
        "email": credentials.email.trim(),
    })))
}
