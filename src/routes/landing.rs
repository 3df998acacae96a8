use std::path::PathBuf;

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse},
    routing::get,
};

use crate::{error::AppError, state::AppState, store::GameStore};

/// Public landing pages and download redirects.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/game/{id}", get(landing_page))
        .route("/download/{token}", get(download))
}

/// `GET /game/:id`: Serve the pre-generated landing page artifact `<id>.html`.
async fn landing_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let path = artifact_path(&state.config.landing_page_dir, &id).ok_or_else(not_found)?;

    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Ok(Html(html)),
        Err(err) => {
            tracing::warn!(%id, path = %path.display(), error = %err, "Landing page not served");
            Err(not_found())
        }
    }
}

/// `GET /download/:token`: Redirect the browser to the game's external download URL.
async fn download(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let game = GameStore::get_by_slug(&state.db, &token).await?;

    if !game.has_download() {
        return Err(AppError::Conflict(
            "Download link not available yet".to_string(),
        ));
    }

    let location = HeaderValue::from_str(&game.game_url).map_err(|_| {
        anyhow::anyhow!("download link of game {} is not a valid Location", game.id)
    })?;

    tracing::info!(id = %game.id, target = %game.game_url, "Redirecting to download");
    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]))
}

fn not_found() -> AppError {
    AppError::NotFound("Landing page not found".to_string())
}

/// Only plain file stems map to artifacts; anything that could leave the directory is refused.
fn artifact_path(dir: &str, id: &str) -> Option<PathBuf> {
    let plain = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    plain.then(|| PathBuf::from(dir).join(format!("{id}.html")))
}
