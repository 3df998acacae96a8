mod common;

use axum::http::{StatusCode, header};
use serde_json::json;

use common::{create_game, get, put_json, send_raw};
use game_catalog_api::store::{GameChanges, GameStore};

#[tokio::test]
async fn landing_page_serves_artifact() {
    let state = common::test_state().await;
    let dir = state.config.landing_page_dir.clone();
    let app = common::app(state);

    let _ = std::fs::create_dir_all(&dir);
    let _ = std::fs::write(
        std::path::Path::new(&dir).join("abc-123.html"),
        "<h1>Arcade X</h1>",
    );

    let (status, body) = get(&app, "/game/abc-123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>Arcade X</h1>");
}

#[tokio::test]
async fn landing_page_missing_artifact_is_404() {
    let app = common::test_app().await;

    let (status, _) = get(&app, "/game/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/game/..").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_redirects_to_game_url() {
    let app = common::test_app().await;
    let game = create_game(&app, "Redirector").await;
    let id = game["id"].as_str().unwrap_or_default();
    let slug = game["landingPageUrl"].as_str().unwrap_or_default();
    let token = slug.trim_start_matches("/game/");

    let (status, _) = put_json(
        &app,
        &format!("/api/games/{id}"),
        &json!({ "gameUrl": "https://cdn.example.com/x.apk" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response = send_raw(&app, "GET", &format!("/download/{token}")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("https://cdn.example.com/x.apk")
    );
}

#[tokio::test]
async fn download_without_link_is_conflict() {
    let app = common::test_app().await;
    let game = create_game(&app, "Not Yet").await;
    let token = game["landingPageUrl"]
        .as_str()
        .unwrap_or_default()
        .trim_start_matches("/game/")
        .to_string();

    let (status, body) = get(&app, &format!("/download/{token}")).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
}

#[tokio::test]
async fn download_unknown_slug_is_404() {
    let app = common::test_app().await;

    let (status, _) = get(&app, &format!("/download/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_non_ascii_link_is_refused_up_front() {
    let app = common::test_app().await;
    let game = create_game(&app, "Accents").await;
    let id = game["id"].as_str().unwrap_or_default();
    let token = game["landingPageUrl"]
        .as_str()
        .unwrap_or_default()
        .trim_start_matches("/game/")
        .to_string();

    let (status, _) = put_json(
        &app,
        &format!("/api/games/{id}"),
        &json!({ "gameUrl": "https://cdn.example.com/jeu-é.apk" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, &format!("/download/{token}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn download_with_unusable_stored_link_is_500() {
    let state = common::test_state().await;
    let db = state.db.clone();
    let app = common::app(state);
    let game = create_game(&app, "Legacy").await;
    let id = uuid::Uuid::parse_str(game["id"].as_str().unwrap_or_default()).unwrap_or_default();
    let token = game["landingPageUrl"]
        .as_str()
        .unwrap_or_default()
        .trim_start_matches("/game/")
        .to_string();

    // Written straight to the store, as rows predating link validation could be
    let updated = GameStore::update(
        &db,
        id,
        GameChanges {
            game_url: Some("https://cdn.example.com/jeu-é.apk".to_string()),
            ..GameChanges::default()
        },
    )
    .await;
    assert!(updated.is_ok(), "{updated:?}");

    let (status, body) = get(&app, &format!("/download/{token}")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{body}");
}
