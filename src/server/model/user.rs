//! Identity domain models and provider profile parameters.
//!
//! An `Identity` is a persisted account record linked to a Steam account, a Discord
//! account, or both. Provider profiles arrive as `SteamProfileParam` and
//! `DiscordProfileParam` after the provider exchange has completed and are handed to
//! the identity linker.

use chrono::{DateTime, Utc};

use crate::model::user::UserDto;

/// Account record keyed by up to two external provider identities.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Durable identifier stored in the session.
    pub id: i32,
    /// SteamID64 of the linked Steam account.
    pub steam_id: Option<String>,
    pub steam_name: Option<String>,
    pub steam_avatar: Option<String>,
    pub steam_profile_url: Option<String>,
    /// Snowflake of the linked Discord account.
    pub discord_id: Option<String>,
    pub discord_username: Option<String>,
    /// Discriminator-qualified Discord name, e.g. `name#1234`.
    pub discord_display_name: Option<String>,
    pub discord_avatar: Option<String>,
    pub discord_email: Option<String>,
    /// True iff both provider keys are set.
    pub is_fully_authenticated: bool,
    pub last_login: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Converts the identity domain model to a DTO for API responses.
    ///
    /// # Returns
    /// - `UserDto` - The id, Steam key and name, and linking status
    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            steam_id: self.steam_id,
            steam_name: self.steam_name,
            is_fully_authenticated: self.is_fully_authenticated,
        }
    }

    /// Converts an entity model to an identity domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Identity` - The converted identity domain model
    pub fn from_entity(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            steam_id: entity.steam_id,
            steam_name: entity.steam_name,
            steam_avatar: entity.steam_avatar,
            steam_profile_url: entity.steam_profile_url,
            discord_id: entity.discord_id,
            discord_username: entity.discord_username,
            discord_display_name: entity.discord_display_name,
            discord_avatar: entity.discord_avatar,
            discord_email: entity.discord_email,
            is_fully_authenticated: entity.is_fully_authenticated,
            last_login: entity.last_login,
            created_at: entity.created_at,
        }
    }
}

/// Steam profile resolved from a verified OpenID assertion and the player summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SteamProfileParam {
    /// SteamID64 taken from the verified claimed id.
    pub steam_id: String,
    /// Persona name.
    pub display_name: String,
    /// Full size avatar URL.
    pub avatar_url: Option<String>,
    /// Community profile URL.
    pub profile_url: Option<String>,
}

/// Discord profile fetched from `users/@me` after the OAuth2 code exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscordProfileParam {
    /// Discord user snowflake.
    pub discord_id: String,
    pub username: String,
    /// Legacy four digit discriminator; `"0"` for accounts on the new username system.
    pub discriminator: Option<String>,
    /// Avatar hash.
    pub avatar: Option<String>,
    /// Verified email, present when the `email` scope was granted.
    pub email: Option<String>,
}

impl DiscordProfileParam {
    /// Discriminator-qualified display name.
    ///
    /// Accounts migrated to unique usernames report a `"0"` discriminator and are
    /// shown by username alone.
    ///
    /// # Returns
    /// - `String` - `username#1234`, or `username` when there is no real discriminator
    pub fn display_name(&self) -> String {
        match self.discriminator.as_deref() {
            Some(discriminator) if !discriminator.is_empty() && discriminator != "0" => {
                format!("{}#{}", self.username, discriminator)
            }
            _ => self.username.clone(),
        }
    }
}
