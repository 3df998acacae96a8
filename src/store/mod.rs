//! Game record store.
//!
//! Every operation touches a single record; concurrent updates to the same game are
//! last-write-wins.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use crate::entities::game;
use crate::error::AppError;
use crate::utils::{generate_landing_slug, normalize_landing_slug};

/// Maximum attempts to generate a landing slug that is not already taken
const MAX_SLUG_GENERATION_ATTEMPTS: u32 = 10;

/// Fields required to insert a game. The image must already be stored.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub name: String,
    pub image_url: String,
    pub sign_up_bonus: i32,
    pub min_withdraw: i32,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct GameChanges {
    pub name: Option<String>,
    pub game_url: Option<String>,
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub struct GameStore;

impl GameStore {
    /// Insert a new game with a fresh id and landing slug and an empty download URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] for an empty name, or an internal error if the
    /// database rejects the insert.
    pub async fn create(
        db: &DatabaseConnection,
        new_game: NewGame,
    ) -> Result<game::Model, AppError> {
        Self::create_with_slugs(db, new_game, generate_landing_slug).await
    }

    /// Insert with slugs drawn from `next_slug`. A unique violation on insert means the
    /// slug (or id) is taken, so both are regenerated and the insert is retried.
    async fn create_with_slugs(
        db: &DatabaseConnection,
        new_game: NewGame,
        mut next_slug: impl FnMut() -> String,
    ) -> Result<game::Model, AppError> {
        let name = new_game.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("Name is required".to_string()));
        }

        for attempt in 1..=MAX_SLUG_GENERATION_ATTEMPTS {
            let slug = next_slug();
            let now = chrono::Utc::now();

            let game = game::ActiveModel {
                id: ActiveValue::Set(Uuid::now_v7()),
                created_at: ActiveValue::Set(now.into()),
                updated_at: ActiveValue::Set(now.into()),
                name: ActiveValue::Set(name.clone()),
                image_url: ActiveValue::Set(new_game.image_url.clone()),
                game_url: ActiveValue::Set(String::new()),
                landing_page_url: ActiveValue::Set(slug.clone()),
                sign_up_bonus: ActiveValue::Set(new_game.sign_up_bonus),
                min_withdraw: ActiveValue::Set(new_game.min_withdraw),
            };

            match game.insert(db).await {
                Ok(game) => return Ok(game),
                Err(err) if is_unique_violation(&err) => {
                    tracing::warn!(attempt, %slug, "Landing slug already taken, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "Failed to generate unique landing slug after multiple attempts"
        )))
    }

    /// All games, newest first. Ids are time ordered, so they break timestamp ties.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the query fails.
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<game::Model>, AppError> {
        Ok(game::Entity::find()
            .order_by_desc(game::Column::CreatedAt)
            .order_by_desc(game::Column::Id)
            .all(db)
            .await?)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no game has this id.
    pub async fn get_by_id(db: &DatabaseConnection, id: Uuid) -> Result<game::Model, AppError> {
        game::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(AppError::game_not_found)
    }

    /// Look up a game by landing slug, given either as `/game/<token>` or as the token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no game has this slug.
    pub async fn get_by_slug(
        db: &DatabaseConnection,
        slug: &str,
    ) -> Result<game::Model, AppError> {
        let slug = normalize_landing_slug(slug).ok_or_else(AppError::game_not_found)?;

        game::Entity::find()
            .filter(game::Column::LandingPageUrl.eq(slug))
            .one(db)
            .await?
            .ok_or_else(AppError::game_not_found)
    }

    /// Apply a partial update and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the id is unknown and [`AppError::BadRequest`] if
    /// the new name is empty. Nothing is written in either case.
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: GameChanges,
    ) -> Result<game::Model, AppError> {
        let name = match changes.name {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(AppError::BadRequest("Name is required".to_string()));
                }
                Some(name)
            }
            None => None,
        };

        let game = Self::get_by_id(db, id).await?;

        let mut active: game::ActiveModel = game.into();
        active.updated_at = ActiveValue::Set(chrono::Utc::now().into());

        if let Some(name) = name {
            active.name = ActiveValue::Set(name);
        }
        if let Some(game_url) = changes.game_url {
            active.game_url = ActiveValue::Set(game_url.trim().to_string());
        }

        Ok(active.update(db).await?)
    }

    /// Remove a game and return the record as it was before deletion.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the id is unknown.
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<game::Model, AppError> {
        let game = Self::get_by_id(db, id).await?;

        let result = game::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            // Lost a race with another delete of the same game
            return Err(AppError::game_not_found());
        }

        Ok(game)
    }
}
