#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use tower::ServiceExt;

use game_catalog_api::auth::StaticCredentials;
use game_catalog_api::config::{Config, DEFAULT_MAX_UPLOAD_BYTES, Environment};
use game_catalog_api::state::AppState;
use game_catalog_api::storage::{ImageStore, LocalImageStore};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse";
pub const BOUNDARY: &str = "----game-catalog-test-boundary";

/// A fresh scratch directory under the system temp dir.
pub fn scratch_dir(label: &str) -> String {
    std::env::temp_dir()
        .join(format!("game-catalog-{label}-{}", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned()
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        database_max_connections: 1,
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment: Environment::Development,
        log_level: "warn".to_string(),
        frontend_url: "http://localhost:5173".to_string(),
        upload_dir: scratch_dir("uploads"),
        landing_page_dir: scratch_dir("landing"),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        asset_host: None,
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
    }
}

/// Application state backed by an in-memory `SQLite` database with migrations.
pub async fn test_state_with(config: Config, images: Option<Arc<dyn ImageStore>>) -> AppState {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();

    let images: Arc<dyn ImageStore> = match images {
        Some(images) => images,
        None => match LocalImageStore::new(&config.upload_dir).await {
            Ok(store) => Arc::new(store),
            Err(err) => unreachable!("cannot create upload dir: {err}"),
        },
    };

    AppState {
        db,
        auth: Arc::new(StaticCredentials::from_config(&config)),
        config,
        images,
    }
}

pub async fn test_state() -> AppState {
    test_state_with(test_config(), None).await
}

pub fn app(state: AppState) -> Router {
    game_catalog_api::routes::router(&state.config).with_state(state)
}

pub async fn test_app() -> Router {
    app(test_state().await)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let body_str = String::from_utf8(body.to_vec()).unwrap_or_default();

    (status, body_str)
}

/// Send a request and return the full response, for checking headers.
pub async fn send_raw(app: &Router, method: &str, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap_or_default();
    app.clone().oneshot(request).await.unwrap_or_default()
}

/// Test helper: send a GET request to the app and return (status, body).
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap_or_default();
    send(app, request).await
}

pub async fn put_json(app: &Router, uri: &str, body: &serde_json::Value) -> (StatusCode, String) {
    send_json(app, "PUT", uri, body).await
}

pub async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> (StatusCode, String) {
    send_json(app, "POST", uri, body).await
}

/// Image part for [`multipart_body`]: (file name, content type, bytes).
pub type ImagePart<'a> = (&'a str, &'a str, &'a [u8]);

/// Encode text fields and an optional `image` part as `multipart/form-data`.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<ImagePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((file_name, content_type, data)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(
    app: &Router,
    uri: &str,
    fields: &[(&str, &str)],
    image: Option<ImagePart<'_>>,
) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, image)))
        .unwrap_or_default();
    send(app, request).await
}

pub const PNG_BYTES: &[u8] = b"fake-png-image-data";

/// Create a game through the API and return its JSON representation.
pub async fn create_game(app: &Router, name: &str) -> serde_json::Value {
    let (status, body) = post_multipart(
        app,
        "/api/games",
        &[("name", name), ("signUpBonus", "500"), ("minWithdraw", "100")],
        Some(("cover.png", "image/png", PNG_BYTES)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create game failed: {body}");
    serde_json::from_str(&body).unwrap_or_default()
}

pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or(serde_json::Value::Null)
}
