//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction, replacing
//! any module-level globals.
//!
//! The state includes:
//! - Database connection pool for data persistence
//! - HTTP client for Steam and Discord API requests
//! - OAuth2 client for Discord authentication
//! - Steam OpenID settings
//! - The identity link mode
//! - Application URL for redirects

use oauth2::basic::{BasicErrorResponseType, BasicTokenType};
use oauth2::{
    Client, EmptyExtraTokenFields, EndpointNotSet, EndpointSet, RevocationErrorResponseType,
    StandardErrorResponse, StandardRevocableToken, StandardTokenIntrospectionResponse,
    StandardTokenResponse,
};
use sea_orm::DatabaseConnection;

use crate::server::config::{Config, LinkMode};

/// Type alias for the OAuth2 client configured for Discord authentication.
pub(crate) type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Steam OpenID and Web API settings.
#[derive(Clone)]
pub struct SteamSettings {
    /// Steam Web API key used for player summaries.
    pub api_key: String,
    /// Steam OpenID provider endpoint.
    pub openid_url: String,
    /// Base URL of the Steam Web API.
    pub api_url: String,
    /// OpenID realm, the application base URL.
    pub realm: String,
    /// Callback URL Steam returns to after login.
    pub return_url: String,
}

impl SteamSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.steam_api_key.clone(),
            openid_url: config.steam_openid_url.clone(),
            api_url: config.steam_api_url.clone(),
            realm: config.app_url.clone(),
            return_url: config.steam_return_url(),
        }
    }
}

/// Application state containing shared resources and dependencies.
///
/// All fields use cheap-to-clone types:
/// - `DatabaseConnection` is a connection pool (clones share the pool)
/// - `reqwest::Client` uses an `Arc` internally
/// - `OAuth2Client` is designed to be cloned
/// - `SteamSettings` and `String` are cloned when needed
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool shared across all requests.
    pub db: DatabaseConnection,

    /// HTTP client for Steam and Discord API requests.
    ///
    /// Configured without redirects to prevent SSRF vulnerabilities.
    pub http_client: reqwest::Client,

    /// OAuth2 client for the Discord authentication flow.
    pub oauth_client: OAuth2Client,

    /// Steam OpenID and Web API settings.
    pub steam: SteamSettings,

    /// Base URL of the Discord REST API.
    pub discord_api_url: String,

    /// Whether merges into Steam-only identities use a guarded conditional write.
    pub link_mode: LinkMode,

    /// Application base URL that logins and logouts redirect to.
    pub app_url: String,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// Called once during server startup after all dependencies have been initialized.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `http_client` - HTTP client for external API requests
    /// - `oauth_client` - OAuth2 client for Discord authentication
    /// - `config` - Application configuration for Steam, Discord and link settings
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(
        db: DatabaseConnection,
        http_client: reqwest::Client,
        oauth_client: OAuth2Client,
        config: &Config,
    ) -> Self {
        Self {
            db,
            http_client,
            oauth_client,
            steam: SteamSettings::from_config(config),
            discord_api_url: config.discord_api_url.clone(),
            link_mode: config.link_mode,
            app_url: config.app_url.clone(),
        }
    }
}
