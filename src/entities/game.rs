use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub name: String,
    pub image_url: String,
    pub game_url: String,
    #[sea_orm(unique)]
    pub landing_page_url: String,
    pub sign_up_bonus: i32,
    pub min_withdraw: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A record whose download link was never set is valid; it just cannot be downloaded yet.
    #[must_use]
    pub fn has_download(&self) -> bool {
        !self.game_url.trim().is_empty()
    }
}
