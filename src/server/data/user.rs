//! Identity data repository for database operations.
//!
//! This module provides the `UserRepository` for managing identity records in the
//! database. It handles lookups by either provider key, merge candidate selection,
//! creation from a provider profile, profile refreshes and the Discord link write in
//! both its conditional and unconditional form, converting entity models to domain
//! models at the infrastructure boundary.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::model::user::{DiscordProfileParam, Identity, SteamProfileParam};

/// Repository providing database operations for identity records.
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `UserRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an identity by its durable id.
    ///
    /// Used to resolve the principal stored in a session.
    ///
    /// # Returns
    /// - `Ok(Some(Identity))` - Identity found
    /// - `Ok(None)` - No identity with that id
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Identity>, DbErr> {
        let entity = entity::prelude::User::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Identity::from_entity))
    }

    /// Finds the identity linked to a Steam account.
    ///
    /// # Returns
    /// - `Ok(Some(Identity))` - Identity with that SteamID64
    /// - `Ok(None)` - Steam account not seen before
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_steam_id(&self, steam_id: &str) -> Result<Option<Identity>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::SteamId.eq(steam_id))
            .one(self.db)
            .await?;

        Ok(entity.map(Identity::from_entity))
    }

    /// Finds the identity linked to a Discord account.
    ///
    /// # Returns
    /// - `Ok(Some(Identity))` - Identity with that Discord snowflake
    /// - `Ok(None)` - Discord account not seen before
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_discord_id(&self, discord_id: &str) -> Result<Option<Identity>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::DiscordId.eq(discord_id))
            .one(self.db)
            .await?;

        Ok(entity.map(Identity::from_entity))
    }

    /// Selects the identity a fresh Discord login is merged into.
    ///
    /// The candidate is the most recently created identity that has a Steam account but
    /// no Discord account. Identical creation timestamps are ordered by id so exactly one
    /// candidate is returned even when several qualify.
    ///
    /// # Returns
    /// - `Ok(Some(Identity))` - Newest Steam-only identity
    /// - `Ok(None)` - Every Steam identity is already linked, or none exist
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_merge_candidate(&self) -> Result<Option<Identity>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::SteamId.is_not_null())
            .filter(entity::user::Column::DiscordId.is_null())
            .order_by_desc(entity::user::Column::CreatedAt)
            .order_by_desc(entity::user::Column::Id)
            .one(self.db)
            .await?;

        Ok(entity.map(Identity::from_entity))
    }

    /// Creates a Steam-only identity from a Steam profile.
    ///
    /// # Returns
    /// - `Ok(Identity)` - The created identity, not fully authenticated
    /// - `Err(DbErr)` - Database error, including a unique violation when the SteamID64
    ///   was inserted concurrently
    pub async fn create_from_steam(&self, profile: &SteamProfileParam) -> Result<Identity, DbErr> {
        let now = Utc::now();

        let mut model = entity::user::ActiveModel {
            steam_id: ActiveValue::Set(Some(profile.steam_id.clone())),
            is_fully_authenticated: ActiveValue::Set(false),
            last_login: ActiveValue::Set(now),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        };
        apply_steam_profile(&mut model, profile);

        let entity = model.insert(self.db).await?;

        Ok(Identity::from_entity(entity))
    }

    /// Creates a Discord-only identity from a Discord profile.
    ///
    /// # Returns
    /// - `Ok(Identity)` - The created identity, not fully authenticated
    /// - `Err(DbErr)` - Database error, including a unique violation when the Discord id
    ///   was inserted or linked concurrently
    pub async fn create_from_discord(
        &self,
        profile: &DiscordProfileParam,
    ) -> Result<Identity, DbErr> {
        let now = Utc::now();

        let mut model = entity::user::ActiveModel {
            discord_id: ActiveValue::Set(Some(profile.discord_id.clone())),
            is_fully_authenticated: ActiveValue::Set(false),
            last_login: ActiveValue::Set(now),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        };
        apply_discord_profile(&mut model, profile);

        let entity = model.insert(self.db).await?;

        Ok(Identity::from_entity(entity))
    }

    /// Refreshes the Steam profile fields of an existing identity and records the login.
    ///
    /// Leaves both provider keys and `is_fully_authenticated` untouched.
    ///
    /// # Returns
    /// - `Ok(Identity)` - The updated identity
    /// - `Err(DbErr)` - Database error, `RecordNotUpdated` if the identity vanished
    pub async fn update_steam_profile(
        &self,
        id: i32,
        profile: &SteamProfileParam,
    ) -> Result<Identity, DbErr> {
        let mut model = entity::user::ActiveModel {
            id: ActiveValue::Unchanged(id),
            last_login: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        apply_steam_profile(&mut model, profile);

        let entity = model.update(self.db).await?;

        Ok(Identity::from_entity(entity))
    }

    /// Refreshes the Discord profile fields of an identity already linked to Discord.
    ///
    /// `is_fully_authenticated` is recomputed from the stored Steam key, so a linked
    /// identity stays fully authenticated.
    ///
    /// # Returns
    /// - `Ok(Identity)` - The updated identity
    /// - `Err(DbErr)` - Database error, `RecordNotUpdated` if the identity vanished
    pub async fn update_discord_profile(
        &self,
        identity: &Identity,
        profile: &DiscordProfileParam,
    ) -> Result<Identity, DbErr> {
        let mut model = entity::user::ActiveModel {
            id: ActiveValue::Unchanged(identity.id),
            is_fully_authenticated: ActiveValue::Set(identity.steam_id.is_some()),
            last_login: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        apply_discord_profile(&mut model, profile);

        let entity = model.update(self.db).await?;

        Ok(Identity::from_entity(entity))
    }

    /// Attaches a Discord account to an identity without checking its current state.
    ///
    /// This is the unguarded merge write: whatever the identity looks like at write
    /// time, its Discord key is replaced and it is marked fully authenticated.
    ///
    /// # Returns
    /// - `Ok(Identity)` - The linked identity
    /// - `Err(DbErr)` - Database error, including a unique violation when the Discord id
    ///   already belongs to another identity
    pub async fn link_discord(
        &self,
        id: i32,
        profile: &DiscordProfileParam,
    ) -> Result<Identity, DbErr> {
        let model = link_discord_model(id, profile);

        let entity = model.update(self.db).await?;

        Ok(Identity::from_entity(entity))
    }

    /// Attaches a Discord account to an identity only if it is still a merge candidate.
    ///
    /// The update carries the candidate predicate (`steam_id IS NOT NULL AND discord_id
    /// IS NULL`) so a candidate claimed by a concurrent login between selection and write
    /// is left alone.
    ///
    /// # Returns
    /// - `Ok(Some(Identity))` - The linked identity
    /// - `Ok(None)` - The identity no longer qualifies (or no longer exists)
    /// - `Err(DbErr)` - Database error, including a unique violation when the Discord id
    ///   already belongs to another identity
    pub async fn link_discord_if_unlinked(
        &self,
        id: i32,
        profile: &DiscordProfileParam,
    ) -> Result<Option<Identity>, DbErr> {
        let model = link_discord_model(id, profile);

        let result = entity::prelude::User::update(model)
            .validate()?
            .filter(entity::user::Column::SteamId.is_not_null())
            .filter(entity::user::Column::DiscordId.is_null())
            .exec(self.db)
            .await;

        match result {
            Ok(entity) => Ok(Some(Identity::from_entity(entity))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn link_discord_model(id: i32, profile: &DiscordProfileParam) -> entity::user::ActiveModel {
    let mut model = entity::user::ActiveModel {
        id: ActiveValue::Unchanged(id),
        discord_id: ActiveValue::Set(Some(profile.discord_id.clone())),
        is_fully_authenticated: ActiveValue::Set(true),
        last_login: ActiveValue::Set(Utc::now()),
        ..Default::default()
    };
    apply_discord_profile(&mut model, profile);
    model
}

fn apply_steam_profile(model: &mut entity::user::ActiveModel, profile: &SteamProfileParam) {
    model.steam_name = ActiveValue::Set(Some(profile.display_name.clone()));
    model.steam_avatar = ActiveValue::Set(profile.avatar_url.clone());
    model.steam_profile_url = ActiveValue::Set(profile.profile_url.clone());
}

fn apply_discord_profile(model: &mut entity::user::ActiveModel, profile: &DiscordProfileParam) {
    model.discord_username = ActiveValue::Set(Some(profile.username.clone()));
    model.discord_display_name = ActiveValue::Set(Some(profile.display_name()));
    model.discord_avatar = ActiveValue::Set(profile.avatar.clone());
    model.discord_email = ActiveValue::Set(profile.email.clone());
}
