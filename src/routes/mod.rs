mod admin;
mod games;
mod health;
mod landing;

use axum::Router;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::state::AppState;
use crate::storage::UPLOADS_ROUTE;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health`: lightweight liveness check
/// - `GET /api/health`: health check with database connectivity
/// - `/api/games`: game catalog CRUD
/// - `POST /api/admin/login`: admin console credential check
/// - `GET /game/{id}`, `GET /download/{token}`: landing artifacts and download redirects
/// - `GET /uploads/*`: locally stored images
pub fn router(config: &Config) -> Router<AppState> {
    let api = Router::new()
        .merge(health::api_router())
        .nest("/games", games::router(config.max_upload_bytes))
        .nest("/admin", admin::router());

    Router::new()
        .merge(health::root_router())
        .merge(landing::router())
        .nest("/api", api)
        .nest_service(UPLOADS_ROUTE, ServeDir::new(&config.upload_dir))
}
