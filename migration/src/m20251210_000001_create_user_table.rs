use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_null(User::SteamId))
                    .col(string_null(User::SteamName))
                    .col(string_null(User::SteamAvatar))
                    .col(string_null(User::SteamProfileUrl))
                    .col(string_null(User::DiscordId))
                    .col(string_null(User::DiscordUsername))
                    .col(string_null(User::DiscordDisplayName))
                    .col(string_null(User::DiscordAvatar))
                    .col(string_null(User::DiscordEmail))
                    .col(boolean(User::IsFullyAuthenticated))
                    .col(timestamp_with_time_zone(User::LastLogin))
                    .col(timestamp_with_time_zone(User::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Unique indexes allow any number of NULLs but reject duplicate provider ids
        manager
            .create_index(
                Index::create()
                    .name("idx_user_steam_id")
                    .table(User::Table)
                    .col(User::SteamId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_discord_id")
                    .table(User::Table)
                    .col(User::DiscordId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum User {
    Table,
    Id,
    SteamId,
    SteamName,
    SteamAvatar,
    SteamProfileUrl,
    DiscordId,
    DiscordUsername,
    DiscordDisplayName,
    DiscordAvatar,
    DiscordEmail,
    IsFullyAuthenticated,
    LastLogin,
    CreatedAt,
}
