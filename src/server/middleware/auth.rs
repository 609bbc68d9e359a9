//! Session principal resolution.
//!
//! `AuthGuard` turns the durable id stored by `AuthSession` back into a full identity.
//! A request without a stored id is "not logged in"; a stored id that no longer
//! resolves is reported separately as a corrupted session and the stale session is
//! flushed so the next request starts clean.

use sea_orm::DatabaseConnection;
use tower_sessions::Session;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    middleware::session::AuthSession,
    model::user::Identity,
};

/// Requirement an endpoint places on the current identity.
pub enum Permission {
    /// The identity has a Steam account linked.
    SteamLinked,
}

pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, session: &'a Session) -> Self {
        Self { db, session }
    }

    /// Resolves the session principal and checks every permission.
    ///
    /// # Arguments
    /// - `permissions` - Requirements the identity must satisfy, empty for any login
    ///
    /// # Returns
    /// - `Ok(Identity)` - The logged in identity
    /// - `Err(AuthError::UserNotInSession)` - Not logged in
    /// - `Err(AuthError::UserNotInDatabase)` - Session refers to a deleted identity
    /// - `Err(AuthError::AccessDenied)` - A permission is not satisfied
    pub async fn require(&self, permissions: &[Permission]) -> Result<Identity, AppError> {
        let Some(identity) = self.current().await? else {
            return Err(AuthError::UserNotInSession.into());
        };

        for permission in permissions {
            match permission {
                Permission::SteamLinked => {
                    if identity.steam_id.is_none() {
                        return Err(AuthError::AccessDenied(
                            identity.id,
                            "User attempted to access Steam data without a linked Steam account"
                                .to_string(),
                        )
                        .into());
                    }
                }
            }
        }

        Ok(identity)
    }

    /// Resolves the session principal if there is one.
    ///
    /// # Returns
    /// - `Ok(Some(Identity))` - The logged in identity
    /// - `Ok(None)` - No principal in the session
    /// - `Err(AuthError::UserNotInDatabase)` - Session refers to a deleted identity; the
    ///   session has been flushed
    pub async fn current(&self) -> Result<Option<Identity>, AppError> {
        let auth_session = AuthSession::new(self.session);

        let Some(user_id) = auth_session.get_user_id().await? else {
            return Ok(None);
        };

        let Some(identity) = UserRepository::new(self.db).find_by_id(user_id).await? else {
            tracing::warn!(
                "Session refers to user {} which no longer exists, clearing session",
                user_id
            );
            auth_session.clear().await?;

            return Err(AuthError::UserNotInDatabase(user_id).into());
        };

        Ok(Some(identity))
    }
}
