//! User factory for creating test identity entities.
//!
//! Identities start without any provider key; set `steam_id` and/or `discord_id` to
//! model Steam-only, Discord-only or linked identities. The `is_fully_authenticated`
//! flag is derived from the keys so factory rows always satisfy the linking invariant.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test identities with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::user::UserFactory;
///
/// let user = UserFactory::new(&db)
///     .steam_id("76561197960287930")
///     .steam_name("Gabe")
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    steam_id: Option<String>,
    steam_name: Option<String>,
    discord_id: Option<String>,
    discord_username: Option<String>,
    created_at: DateTime<Utc>,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - no Steam or Discord key
    /// - created_at / last_login: now
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `UserFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            steam_id: None,
            steam_name: None,
            discord_id: None,
            discord_username: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the Steam ID, defaulting the Steam display name when none was given.
    pub fn steam_id(mut self, steam_id: impl Into<String>) -> Self {
        let steam_id = steam_id.into();
        if self.steam_name.is_none() {
            self.steam_name = Some(format!("Steam {}", steam_id));
        }
        self.steam_id = Some(steam_id);
        self
    }

    /// Sets the Steam display name.
    pub fn steam_name(mut self, steam_name: impl Into<String>) -> Self {
        self.steam_name = Some(steam_name.into());
        self
    }

    /// Sets the Discord ID, defaulting the Discord username when none was given.
    pub fn discord_id(mut self, discord_id: impl Into<String>) -> Self {
        let discord_id = discord_id.into();
        if self.discord_username.is_none() {
            self.discord_username = Some(format!("discord_{}", next_id()));
        }
        self.discord_id = Some(discord_id);
        self
    }

    /// Sets the creation timestamp, used to order merge candidates.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the user entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user::Model)` - Created user entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        let is_fully_authenticated = self.steam_id.is_some() && self.discord_id.is_some();

        entity::user::ActiveModel {
            steam_id: ActiveValue::Set(self.steam_id),
            steam_name: ActiveValue::Set(self.steam_name),
            steam_avatar: ActiveValue::Set(None),
            steam_profile_url: ActiveValue::Set(None),
            discord_display_name: ActiveValue::Set(self.discord_username.clone()),
            discord_id: ActiveValue::Set(self.discord_id),
            discord_username: ActiveValue::Set(self.discord_username),
            discord_avatar: ActiveValue::Set(None),
            discord_email: ActiveValue::Set(None),
            is_fully_authenticated: ActiveValue::Set(is_fully_authenticated),
            last_login: ActiveValue::Set(self.created_at),
            created_at: ActiveValue::Set(self.created_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an identity with no provider keys.
///
/// Shorthand for `UserFactory::new(db).build().await`.
pub async fn create_user(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).build().await
}

/// Creates a Steam-only identity, i.e. a merge candidate.
///
/// # Arguments
/// - `db` - Database connection
/// - `steam_id` - Steam ID to assign
///
/// # Returns
/// - `Ok(entity::user::Model)` - Created user entity
/// - `Err(DbErr)` - Database error during insert
pub async fn create_steam_user(
    db: &DatabaseConnection,
    steam_id: impl Into<String>,
) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).steam_id(steam_id).build().await
}

/// Creates a Discord-only identity.
pub async fn create_discord_user(
    db: &DatabaseConnection,
    discord_id: impl Into<String>,
) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).discord_id(discord_id).build().await
}

/// Creates an identity with both provider keys set.
pub async fn create_linked_user(
    db: &DatabaseConnection,
    steam_id: impl Into<String>,
    discord_id: impl Into<String>,
) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db)
        .steam_id(steam_id)
        .discord_id(discord_id)
        .build()
        .await
}
