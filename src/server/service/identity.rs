//! Identity linking service.
//!
//! Resolves a completed provider authentication to exactly one identity record. A Steam
//! login creates or refreshes the identity keyed by its SteamID64. A Discord login
//! refreshes the identity already linked to that Discord account or, failing that, is
//! merged into the most recently created Steam-only identity, or finally creates a
//! Discord-only identity.
//!
//! The merge is an unauthenticated link by recency: nothing binds the Discord login to
//! the Steam session that produced the candidate.
//!
//! Two write strategies are available through `LinkMode`:
//! - `Guarded` links with a conditional update and re-runs the resolution when the
//!   candidate was claimed concurrently or a unique index was hit, up to
//!   `MAX_LINK_ATTEMPTS` times.
//! - `Unguarded` links with a plain update by id and reports any unique index conflict
//!   as `AuthError::LinkingConflict`.

use sea_orm::{DatabaseConnection, DbErr};

use crate::server::{
    config::LinkMode,
    data::{is_unique_violation, user::UserRepository},
    error::{auth::AuthError, AppError},
    model::user::{DiscordProfileParam, Identity, SteamProfileParam},
};

/// Number of resolution attempts in guarded mode before giving up with a conflict.
pub const MAX_LINK_ATTEMPTS: usize = 3;

const STEAM: &str = "Steam";
const DISCORD: &str = "Discord";

/// Outcome of a single resolution attempt.
enum Attempt {
    Resolved(Identity),
    /// Lost a race against a concurrent login; the resolution should be re-run.
    Contended,
}

pub struct IdentityLinker<'a> {
    db: &'a DatabaseConnection,
    mode: LinkMode,
}

impl<'a> IdentityLinker<'a> {
    /// Creates a new IdentityLinker instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `mode` - Write strategy used when linking into a merge candidate
    ///
    /// # Returns
    /// - `IdentityLinker` - New service instance
    pub fn new(db: &'a DatabaseConnection, mode: LinkMode) -> Self {
        Self { db, mode }
    }

    /// Resolves a verified Steam login to an identity.
    ///
    /// Refreshes the Steam profile of the identity owning the SteamID64, or creates a
    /// Steam-only identity when the account has not been seen before. The Discord link
    /// and `is_fully_authenticated` are never touched by a Steam login.
    ///
    /// # Arguments
    /// - `profile` - Steam profile of the authenticated account
    ///
    /// # Returns
    /// - `Ok(Identity)` - The created or refreshed identity
    /// - `Err(AppError::AuthErr(AuthError::LinkingConflict))` - A concurrent login for the
    ///   same Steam account could not be reconciled
    /// - `Err(AppError::DbErr)` - Database error, not retried
    pub async fn resolve_steam(&self, profile: &SteamProfileParam) -> Result<Identity, AppError> {
        for attempt in 1..=self.max_attempts() {
            match self.try_resolve_steam(profile).await? {
                Attempt::Resolved(identity) => return Ok(identity),
                Attempt::Contended => {
                    tracing::debug!(
                        "Steam login for {} raced a concurrent login (attempt {}/{})",
                        profile.steam_id,
                        attempt,
                        self.max_attempts()
                    );
                }
            }
        }

        tracing::warn!(
            "Giving up resolving Steam login for {} after {} attempts",
            profile.steam_id,
            self.max_attempts()
        );

        Err(AuthError::LinkingConflict(STEAM.to_string()).into())
    }

    /// Resolves a completed Discord login to an identity.
    ///
    /// An identity already linked to the Discord account is refreshed. Otherwise the
    /// login is merged into the newest Steam-only identity, which becomes fully
    /// authenticated. With no candidate a Discord-only identity is created.
    ///
    /// # Arguments
    /// - `profile` - Discord profile of the authenticated account
    ///
    /// # Returns
    /// - `Ok(Identity)` - The refreshed, merged or created identity
    /// - `Err(AppError::AuthErr(AuthError::LinkingConflict))` - The merge or insert kept
    ///   conflicting with concurrent logins (guarded), or hit a unique index (unguarded)
    /// - `Err(AppError::DbErr)` - Database error, not retried
    pub async fn resolve_discord(
        &self,
        profile: &DiscordProfileParam,
    ) -> Result<Identity, AppError> {
        for attempt in 1..=self.max_attempts() {
            match self.try_resolve_discord(profile).await? {
                Attempt::Resolved(identity) => return Ok(identity),
                Attempt::Contended => {
                    tracing::debug!(
                        "Discord login for {} raced a concurrent login (attempt {}/{})",
                        profile.discord_id,
                        attempt,
                        self.max_attempts()
                    );
                }
            }
        }

        tracing::warn!(
            "Giving up resolving Discord login for {} after {} attempts",
            profile.discord_id,
            self.max_attempts()
        );

        Err(AuthError::LinkingConflict(DISCORD.to_string()).into())
    }

    async fn try_resolve_steam(&self, profile: &SteamProfileParam) -> Result<Attempt, AppError> {
        let user_repo = UserRepository::new(self.db);

        if let Some(existing) = user_repo.find_by_steam_id(&profile.steam_id).await? {
            let identity = user_repo.update_steam_profile(existing.id, profile).await?;
            tracing::debug!("Refreshed Steam profile of user {}", identity.id);

            return Ok(Attempt::Resolved(identity));
        }

        let created = user_repo.create_from_steam(profile).await;
        let identity = match self.contention(created, STEAM)? {
            Some(identity) => identity,
            None => return Ok(Attempt::Contended),
        };

        tracing::info!(
            "Created user {} for Steam account {}",
            identity.id,
            profile.steam_id
        );

        Ok(Attempt::Resolved(identity))
    }

    async fn try_resolve_discord(
        &self,
        profile: &DiscordProfileParam,
    ) -> Result<Attempt, AppError> {
        let user_repo = UserRepository::new(self.db);

        if let Some(existing) = user_repo.find_by_discord_id(&profile.discord_id).await? {
            let identity = user_repo.update_discord_profile(&existing, profile).await?;
            tracing::debug!("Refreshed Discord profile of user {}", identity.id);

            return Ok(Attempt::Resolved(identity));
        }

        if let Some(candidate) = user_repo.find_merge_candidate().await? {
            let linked = match self.mode {
                LinkMode::Guarded => {
                    match user_repo
                        .link_discord_if_unlinked(candidate.id, profile)
                        .await
                    {
                        // Claimed by a concurrent login since it was selected
                        Ok(None) => return Ok(Attempt::Contended),
                        Ok(Some(identity)) => Ok(identity),
                        Err(err) => Err(err),
                    }
                }
                LinkMode::Unguarded => user_repo.link_discord(candidate.id, profile).await,
            };

            let identity = match self.contention(linked, DISCORD)? {
                Some(identity) => identity,
                None => return Ok(Attempt::Contended),
            };

            tracing::info!(
                "Linked Discord account {} to user {} with Steam account {}",
                profile.discord_id,
                identity.id,
                identity.steam_id.as_deref().unwrap_or_default()
            );

            return Ok(Attempt::Resolved(identity));
        }

        let created = user_repo.create_from_discord(profile).await;
        let identity = match self.contention(created, DISCORD)? {
            Some(identity) => identity,
            None => return Ok(Attempt::Contended),
        };

        tracing::info!(
            "Created user {} for Discord account {}",
            identity.id,
            profile.discord_id
        );

        Ok(Attempt::Resolved(identity))
    }

    /// Classifies the result of a write that may have hit a unique index.
    ///
    /// # Returns
    /// - `Ok(Some(Identity))` - The write succeeded
    /// - `Ok(None)` - Unique violation in guarded mode, the attempt should be re-run
    /// - `Err(AuthError::LinkingConflict)` - Unique violation in unguarded mode
    /// - `Err(AppError::DbErr)` - Any other database error
    fn contention(
        &self,
        result: Result<Identity, DbErr>,
        provider: &str,
    ) -> Result<Option<Identity>, AppError> {
        match result {
            Ok(identity) => Ok(Some(identity)),
            Err(err) if is_unique_violation(&err) => match self.mode {
                LinkMode::Guarded => Ok(None),
                LinkMode::Unguarded => {
                    tracing::warn!(
                        "Unique key conflict while linking {} account: {}",
                        provider,
                        err
                    );
                    Err(AuthError::LinkingConflict(provider.to_string()).into())
                }
            },
            Err(err) => Err(err.into()),
        }
    }

    fn max_attempts(&self) -> usize {
        match self.mode {
            LinkMode::Guarded => MAX_LINK_ATTEMPTS,
            LinkMode::Unguarded => 1,
        }
    }
}
