use std::{net::SocketAddr, str::FromStr};

use crate::server::error::{config::ConfigError, AppError};

const DISCORD_AUTH_URL: &str = "https://discord.com/oauth2/authorize";
const DISCORD_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const DISCORD_API_URL: &str = "https://discord.com/api";

const STEAM_OPENID_URL: &str = "https://steamcommunity.com/openid/login";
const STEAM_API_URL: &str = "https://api.steampowered.com";

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

/// How the identity linker guards the merge of a Discord login into a Steam-only identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMode {
    /// Merge writes are conditional on the candidate still being unlinked; conflicts
    /// reselect a candidate and retry.
    #[default]
    Guarded,
    /// Read-then-write with no predicate on the merge write; conflicts surface as errors.
    Unguarded,
}

impl FromStr for LinkMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "guarded" => Ok(Self::Guarded),
            "unguarded" => Ok(Self::Unguarded),
            _ => Err(ConfigError::InvalidEnvVar {
                name: "IDENTITY_LINK_MODE".to_string(),
                value: value.to_string(),
            }),
        }
    }
}

pub struct Config {
    pub database_url: String,
    pub server_addr: SocketAddr,
    pub app_url: String,

    pub discord_client_id: String,
    pub discord_client_secret: String,
    pub discord_redirect_url: String,

    pub discord_auth_url: String,
    pub discord_token_url: String,
    pub discord_api_url: String,

    pub steam_api_key: String,
    pub steam_openid_url: String,
    pub steam_api_url: String,

    pub link_mode: LinkMode,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let server_addr = optional_env("SERVER_ADDR")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr = server_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: "SERVER_ADDR".to_string(),
                value: server_addr.clone(),
            })?;

        let link_mode = match optional_env("IDENTITY_LINK_MODE") {
            Some(value) => value.parse::<LinkMode>()?,
            None => LinkMode::default(),
        };

        Ok(Self {
            database_url: required_env("DATABASE_URL")?,
            server_addr,
            app_url: required_env("APP_URL")?.trim_end_matches('/').to_string(),
            discord_client_id: required_env("DISCORD_CLIENT_ID")?,
            discord_client_secret: required_env("DISCORD_CLIENT_SECRET")?,
            discord_redirect_url: required_env("DISCORD_REDIRECT_URL")?,
            discord_auth_url: DISCORD_AUTH_URL.to_string(),
            discord_token_url: DISCORD_TOKEN_URL.to_string(),
            discord_api_url: DISCORD_API_URL.to_string(),
            steam_api_key: required_env("STEAM_API_KEY")?,
            steam_openid_url: STEAM_OPENID_URL.to_string(),
            steam_api_url: STEAM_API_URL.to_string(),
            link_mode,
        })
    }

    /// URL Steam redirects back to after the OpenID login.
    pub fn steam_return_url(&self) -> String {
        format!("{}/api/auth/steam/callback", self.app_url)
    }

    /// Session cookies are only marked `Secure` when the app is served over https.
    pub fn secure_cookies(&self) -> bool {
        self.app_url.starts_with("https://")
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
