use crate::server::{
    config::LinkMode,
    error::{auth::AuthError, AppError},
    model::user::{DiscordProfileParam, SteamProfileParam},
    service::identity::IdentityLinker,
};
use entity::prelude::User;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory};

mod invariant;
mod link_mode;
mod resolve_steam;

const STEAM_A: &str = "76561197960287930";
const STEAM_B: &str = "76561197960287931";
const DISCORD_A: &str = "80351110224678912";
const DISCORD_B: &str = "80351110224678913";

fn steam_profile(steam_id: &str, display_name: &str) -> SteamProfileParam {
    SteamProfileParam {
        steam_id: steam_id.to_string(),
        display_name: display_name.to_string(),
        avatar_url: Some(format!("https://avatars.steamstatic.com/{}_full.jpg", steam_id)),
        profile_url: Some(format!("https://steamcommunity.com/profiles/{}/", steam_id)),
    }
}

fn discord_profile(discord_id: &str, username: &str) -> DiscordProfileParam {
    DiscordProfileParam {
        discord_id: discord_id.to_string(),
        username: username.to_string(),
        discriminator: Some("0".to_string()),
        avatar: None,
        email: Some(format!("{}@example.com", username)),
    }
}

async fn user_count(db: &DatabaseConnection) -> Result<u64, DbErr> {
    User::find().count(db).await
}

/// Asserts that exactly the identities holding both keys are fully authenticated.
async fn assert_linking_invariant(db: &DatabaseConnection) -> Result<(), DbErr> {
    for user in User::find().all(db).await? {
        assert_eq!(
            user.is_fully_authenticated,
            user.steam_id.is_some() && user.discord_id.is_some(),
            "linking flag out of sync for user {}",
            user.id
        );
    }

    Ok(())
}
