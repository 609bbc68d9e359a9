//! Type-safe session management wrappers.
//!
//! This module provides type-safe interfaces for managing different aspects of user sessions,
//! organized by concern. Each struct handles a specific domain of session data, preventing
//! typos, ensuring type consistency, and centralizing session-related logic.
//!
//! # Architecture
//!
//! Session management is split into focused concerns:
//! - `AuthSession` - Authenticated principal (durable identity id)
//! - `CsrfSession` - One-time anti-forgery state for the Steam and Discord login flows
//!
//! Each struct wraps the same underlying `Session` but exposes only the methods
//! relevant to its concern, following the Interface Segregation Principle.

use tower_sessions::Session;

use crate::server::error::AppError;

const SESSION_AUTH_USER_ID: &str = "auth:user";
const SESSION_AUTH_CSRF_TOKEN: &str = "auth:csrf_token";

/// Authentication session management.
///
/// Serializes the resolved identity into the session as its durable id and reads it
/// back on later requests. Resolving the id into a full identity is the job of
/// `AuthGuard`.
pub struct AuthSession<'a> {
    /// The underlying tower-sessions Session instance.
    session: &'a Session,
}

impl<'a> AuthSession<'a> {
    /// Creates a new AuthSession wrapper.
    ///
    /// # Arguments
    /// - `session` - Reference to the tower-sessions Session to wrap
    ///
    /// # Returns
    /// A new AuthSession instance
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores the identity's durable id in the session.
    ///
    /// Called after a provider callback resolved an identity. The session id is cycled
    /// first so a session fixated before login cannot be reused.
    ///
    /// # Arguments
    /// - `user_id` - Durable id of the resolved identity
    ///
    /// # Returns
    /// - `Ok(())` - Id successfully stored
    /// - `Err(AppError::SessionErr(_))` - Failed to store in session
    pub async fn set_user_id(&self, user_id: i32) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session.insert(SESSION_AUTH_USER_ID, user_id).await?;
        Ok(())
    }

    /// Retrieves the durable identity id from the session.
    ///
    /// # Returns
    /// - `Ok(Some(user_id))` - A principal is stored
    /// - `Ok(None)` - No principal in session (not logged in)
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn get_user_id(&self) -> Result<Option<i32>, AppError> {
        let user_id = self.session.get::<i32>(SESSION_AUTH_USER_ID).await?;
        Ok(user_id)
    }

    /// Removes all data from the session and deletes it from the store.
    ///
    /// Used during logout and when the stored principal no longer resolves.
    ///
    /// # Returns
    /// - `Ok(())` - Session flushed
    /// - `Err(AppError::SessionErr(_))` - Failed to delete the session from the store
    pub async fn clear(&self) -> Result<(), AppError> {
        self.session.flush().await?;
        Ok(())
    }
}

/// CSRF protection session management.
///
/// Handles the anti-forgery state of both login flows. A token is stored when the
/// redirect to Steam or Discord is issued and consumed by the matching callback.
pub struct CsrfSession<'a> {
    /// The underlying tower-sessions Session instance.
    session: &'a Session,
}

impl<'a> CsrfSession<'a> {
    /// Creates a new CsrfSession wrapper.
    ///
    /// # Arguments
    /// - `session` - Reference to the tower-sessions Session to wrap
    ///
    /// # Returns
    /// A new CsrfSession instance
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores a CSRF token in the session.
    ///
    /// Replaces any token left over from an abandoned login.
    ///
    /// # Arguments
    /// - `token` - The CSRF token to store
    ///
    /// # Returns
    /// - `Ok(())` - Token successfully stored
    /// - `Err(AppError::SessionErr(_))` - Failed to store in session
    pub async fn set_token(&self, token: String) -> Result<(), AppError> {
        self.session.insert(SESSION_AUTH_CSRF_TOKEN, token).await?;
        Ok(())
    }

    /// Retrieves and removes the CSRF token from the session.
    ///
    /// The token is removed so each one can only be used once.
    ///
    /// # Returns
    /// - `Ok(Some(token))` - CSRF token was found and removed
    /// - `Ok(None)` - No CSRF token in session
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn take_token(&self) -> Result<Option<String>, AppError> {
        let token = self.session.remove(SESSION_AUTH_CSRF_TOKEN).await?;
        Ok(token)
    }
}
