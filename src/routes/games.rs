use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        CreateGameForm, GameResponse, MessageResponse, UpdateGameNameRequest,
        UpdateGameUrlRequest,
    },
    error::AppError,
    state::AppState,
    storage::{self, ImageUpload},
    store::{GameChanges, GameStore, NewGame},
};

/// Room for the text fields and multipart framing on top of the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Game catalog router.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_games).post(create_game))
        .route(
            "/{key}",
            get(get_game).put(update_game_url).delete(delete_game),
        )
        .route("/{key}/name", put(update_game_name))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
        ))
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /api/games`: List all games, newest first.
async fn list_games(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let games = GameStore::list(&state.db).await?;
    Ok(Json(
        games.into_iter().map(GameResponse::from).collect::<Vec<_>>(),
    ))
}

/// `POST /api/games`: Create a game from a multipart form with an `image` part.
async fn create_game(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_create_form(multipart, state.config.max_upload_bytes).await?;
    let validated = form.validate()?;

    let image_url = state.images.store(validated.image).await?;

    let new_game = NewGame {
        name: validated.name,
        image_url: image_url.clone(),
        sign_up_bonus: validated.sign_up_bonus,
        min_withdraw: validated.min_withdraw,
    };

    match GameStore::create(&state.db, new_game).await {
        Ok(game) => {
            tracing::info!(
                id = %game.id,
                slug = %game.landing_page_url,
                name = %game.name,
                "Game created"
            );
            Ok((StatusCode::CREATED, Json(GameResponse::from(game))))
        }
        Err(err) => {
            // No record means nothing refers to the image
            storage::discard(state.images.as_ref(), &image_url).await;
            Err(err)
        }
    }
}

/// `GET /api/games/:slug`: Get a game by landing slug.
///
/// Falls back to an id lookup when no slug matches, which is how the admin console
/// loads a game it only knows by id.
async fn get_game(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let game = match GameStore::get_by_slug(&state.db, &key).await {
        Err(AppError::NotFound(msg)) => match Uuid::parse_str(key.trim()) {
            Ok(id) => GameStore::get_by_id(&state.db, id).await?,
            Err(_) => return Err(AppError::NotFound(msg)),
        },
        other => other?,
    };

    Ok(Json(GameResponse::from(game)))
}

/// `PUT /api/games/:id`: Set the external download URL.
async fn update_game_url(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<UpdateGameUrlRequest>,
) -> Result<impl IntoResponse, AppError> {
    let game_url = req.validated_game_url()?;
    let id = parse_game_id(&key)?;

    let game = GameStore::update(
        &state.db,
        id,
        GameChanges {
            game_url: Some(game_url),
            ..GameChanges::default()
        },
    )
    .await?;

    tracing::info!(%id, game_url = %game.game_url, "Download URL updated");
    Ok(Json(GameResponse::from(game)))
}

/// `PUT /api/games/:id/name`: Rename a game.
async fn update_game_name(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<UpdateGameNameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = req.validated_name()?;
    let id = parse_game_id(&key)?;

    let game = GameStore::update(
        &state.db,
        id,
        GameChanges {
            name: Some(name),
            ..GameChanges::default()
        },
    )
    .await?;

    tracing::info!(%id, name = %game.name, "Game renamed");
    Ok(Json(GameResponse::from(game)))
}

/// `DELETE /api/games/:id`: Delete a game and, best effort, its image.
async fn delete_game(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_game_id(&key)?;

    let game = GameStore::delete(&state.db, id).await?;
    storage::discard(state.images.as_ref(), &game.image_url).await;

    tracing::info!(%id, slug = %game.landing_page_url, "Game deleted");
    Ok(Json(MessageResponse {
        message: "Game deleted successfully".to_string(),
    }))
}

// ============================================================================
// Helpers
// ============================================================================

/// Ids that cannot be parsed cannot exist, so they are reported as not found.
fn parse_game_id(key: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(key.trim()).map_err(|_| AppError::game_not_found())
}

fn multipart_error(err: &MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the size limit".to_string())
    } else {
        AppError::BadRequest(format!("Multipart error: {}", err.body_text()))
    }
}

/// Collect the create form. Unknown parts are ignored; for repeated parts the last wins.
async fn read_create_form(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<CreateGameForm, AppError> {
    let mut form = CreateGameForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| multipart_error(&e))?;

                if bytes.len() > max_upload_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "Image exceeds the {max_upload_bytes} byte limit"
                    )));
                }

                form.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    data: bytes.to_vec(),
                });
            }
            "name" | "signUpBonus" | "minWithdraw" => {
                let value = field.text().await.map_err(|e| multipart_error(&e))?;
                match name.as_str() {
                    "name" => form.name = Some(value),
                    "signUpBonus" => form.sign_up_bonus = Some(value),
                    _ => form.min_withdraw = Some(value),
                }
            }
            _ => {}
        }
    }

    Ok(form)
}
