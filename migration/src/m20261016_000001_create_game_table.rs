use sea_orm_migration::prelude::*;

/// Creates the `game` table holding catalog entries.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    Name,
    ImageUrl,
    GameUrl,
    LandingPageUrl,
    SignUpBonus,
    MinWithdraw,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Game::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Game::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Game::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Game::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Game::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Game::ImageUrl).string_len(1000).not_null())
                    .col(
                        ColumnDef::new(Game::GameUrl)
                            .string_len(2000)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Game::LandingPageUrl)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Game::SignUpBonus).integer().not_null())
                    .col(ColumnDef::new(Game::MinWithdraw).integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Listing is always newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_game_created_at")
                    .table(Game::Table)
                    .col(Game::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Game::Table).to_owned())
            .await
    }
}
