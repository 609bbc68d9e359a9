use oauth2::{
    basic::BasicTokenType, AuthorizationCode, CsrfToken, EmptyExtraTokenFields, Scope,
    StandardTokenResponse, TokenResponse,
};
use serde::Deserialize;
use url::Url;

use crate::server::{
    error::{auth::AuthError, AppError},
    model::user::DiscordProfileParam,
    state::OAuth2Client,
};

/// Subset of the Discord user object returned by `users/@me`.
#[derive(Debug, Deserialize)]
struct DiscordUser {
    id: String,
    username: String,
    #[serde(default)]
    discriminator: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl From<DiscordUser> for DiscordProfileParam {
    fn from(user: DiscordUser) -> Self {
        Self {
            discord_id: user.id,
            username: user.username,
            discriminator: user.discriminator,
            avatar: user.avatar,
            email: user.email,
        }
    }
}

/// Service for the Discord OAuth2 authorization code flow.
pub struct DiscordAuthService<'a> {
    http_client: &'a reqwest::Client,
    oauth_client: &'a OAuth2Client,
    api_url: &'a str,
}

impl<'a> DiscordAuthService<'a> {
    /// Creates a new DiscordAuthService instance.
    ///
    /// # Arguments
    /// - `http_client` - HTTP client for the token exchange and Discord API requests
    /// - `oauth_client` - OAuth2 client configured with the Discord endpoints
    /// - `api_url` - Base URL of the Discord REST API
    ///
    /// # Returns
    /// - `DiscordAuthService` - New service instance
    pub fn new(
        http_client: &'a reqwest::Client,
        oauth_client: &'a OAuth2Client,
        api_url: &'a str,
    ) -> Self {
        Self {
            http_client,
            oauth_client,
            api_url,
        }
    }

    /// Generates a Discord OAuth2 login URL with CSRF protection.
    ///
    /// Requests the `identify` and `email` scopes.
    ///
    /// # Returns
    /// - `(Url, CsrfToken)` - The authorization URL and the state token to store in the session
    pub fn login_url(&self) -> (Url, CsrfToken) {
        self.oauth_client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("identify".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .url()
    }

    /// Completes a Discord login from the OAuth2 callback.
    ///
    /// Exchanges the authorization code for an access token and fetches the
    /// authenticated user's profile.
    ///
    /// # Arguments
    /// - `authorization_code` - Authorization code from the Discord callback
    ///
    /// # Returns
    /// - `Ok(DiscordProfileParam)` - Profile of the authenticated Discord account
    /// - `Err(AppError::AuthErr(AuthError::TokenExchange))` - Discord rejected the code
    /// - `Err(AppError::ReqwestErr)` - Failed to fetch the user from the Discord API
    pub async fn callback(
        &self,
        authorization_code: String,
    ) -> Result<DiscordProfileParam, AppError> {
        let token = self
            .oauth_client
            .exchange_code(AuthorizationCode::new(authorization_code))
            .request_async(self.http_client)
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        let user = self.fetch_discord_user(&token).await?;

        Ok(user.into())
    }

    /// Retrieves the Discord user owning the access token.
    async fn fetch_discord_user(
        &self,
        token: &StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    ) -> Result<DiscordUser, AppError> {
        let access_token = token.access_token().secret();

        let user = self
            .http_client
            .get(format!("{}/users/@me", self.api_url))
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<DiscordUser>()
            .await?;

        Ok(user)
    }
}
