use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::game;
use crate::error::AppError;
use crate::storage::ImageUpload;

/// Column widths of the `game` table, in characters.
pub const MAX_NAME_CHARS: usize = 200;
pub const MAX_GAME_URL_CHARS: usize = 2000;

// ============ Request DTOs ============

/// POST /api/games - Multipart create form, collected field by field.
#[derive(Debug, Default)]
pub struct CreateGameForm {
    pub name: Option<String>,
    pub sign_up_bonus: Option<String>,
    pub min_withdraw: Option<String>,
    pub image: Option<ImageUpload>,
}

/// Create form after validation, ready to be stored.
#[derive(Debug)]
pub struct ValidatedGame {
    pub name: String,
    pub sign_up_bonus: i32,
    pub min_withdraw: i32,
    pub image: ImageUpload,
}

/// PUT /api/games/:id - Set the external download URL
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameUrlRequest {
    #[serde(default)]
    pub game_url: String,
}

/// PUT /api/games/:id/name - Rename a game
#[derive(Debug, Deserialize)]
pub struct UpdateGameNameRequest {
    #[serde(default)]
    pub name: String,
}

impl CreateGameForm {
    /// Check the form in the order clients expect errors: image, name, then the bonus
    /// fields. Nothing is stored until this passes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] naming the first missing or invalid field.
    pub fn validate(self) -> Result<ValidatedGame, AppError> {
        let image = self
            .image
            .filter(|img| !img.data.is_empty())
            .ok_or_else(|| AppError::BadRequest("No image file provided".to_string()))?;

        let name = validate_name(self.name.as_deref().unwrap_or_default())?;

        let (Some(sign_up_bonus), Some(min_withdraw)) = (
            non_blank(self.sign_up_bonus),
            non_blank(self.min_withdraw),
        ) else {
            return Err(AppError::BadRequest(
                "Sign up bonus and minimum withdrawal are required".to_string(),
            ));
        };

        Ok(ValidatedGame {
            name,
            sign_up_bonus: parse_amount("signUpBonus", &sign_up_bonus)?,
            min_withdraw: parse_amount("minWithdraw", &min_withdraw)?,
            image,
        })
    }
}

impl UpdateGameNameRequest {
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] if the name is blank or too long.
    pub fn validated_name(&self) -> Result<String, AppError> {
        validate_name(&self.name)
    }
}

impl UpdateGameUrlRequest {
    /// The trimmed download URL. An empty value clears the link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] unless the value is empty or an absolute
    /// `http`/`https` URL made of printable ASCII that fits the column.
    pub fn validated_game_url(&self) -> Result<String, AppError> {
        let url = self.game_url.trim();
        if url.is_empty() {
            return Ok(String::new());
        }

        if url.chars().count() > MAX_GAME_URL_CHARS {
            return Err(AppError::BadRequest(format!(
                "gameUrl must be at most {MAX_GAME_URL_CHARS} characters"
            )));
        }

        // The value ends up verbatim in a Location header
        let has_host = strip_http_scheme(url)
            .and_then(|rest| rest.split(['/', '?', '#']).next())
            .is_some_and(|host| !host.is_empty());
        if !has_host || !url.chars().all(|c| c.is_ascii_graphic()) {
            return Err(AppError::BadRequest(
                "gameUrl must be an absolute http(s) URL".to_string(),
            ));
        }

        Ok(url.to_string())
    }
}

fn validate_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::BadRequest(format!(
            "Name must be at most {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}

fn strip_http_scheme(url: &str) -> Option<&str> {
    ["https://", "http://"].into_iter().find_map(|scheme| {
        url.get(..scheme.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
            .and_then(|_| url.get(scheme.len()..))
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_amount(field: &str, raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .map_err(|_| AppError::BadRequest(format!("{field} must be a whole number")))
}

// ============ Response DTOs ============

/// Game record as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub game_url: String,
    pub landing_page_url: String,
    pub sign_up_bonus: i32,
    pub min_withdraw: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<game::Model> for GameResponse {
    fn from(game: game::Model) -> Self {
        Self {
            id: game.id,
            name: game.name,
            image_url: game.image_url,
            game_url: game.game_url,
            landing_page_url: game.landing_page_url,
            sign_up_bonus: game.sign_up_bonus,
            min_withdraw: game.min_withdraw,
            created_at: game.created_at.to_rfc3339(),
            updated_at: game.updated_at.to_rfc3339(),
        }
    }
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
