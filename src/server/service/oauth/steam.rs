//! Steam OpenID 2.0 login.
//!
//! Steam only supports OpenID 2.0 with identifier select. The login redirect asks Steam
//! to authenticate the user and return to our callback; the callback carries a positive
//! assertion whose `openid.claimed_id` ends in the SteamID64. The assertion is verified
//! directly with Steam (`check_authentication`) before it is trusted, then the player
//! summary is fetched from the Steam Web API for the profile fields.
//!
//! OpenID has no state parameter, so the anti-forgery token is carried as a query
//! parameter of `openid.return_to` and comes back on the callback URL.

use std::collections::HashMap;

use serde::Deserialize;
use url::Url;

use crate::server::{
    error::{auth::AuthError, AppError},
    model::user::SteamProfileParam,
    state::SteamSettings,
};

const OPENID_NS: &str = "http://specs.openid.net/auth/2.0";
const OPENID_IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";
const STEAM_CLAIMED_ID_PREFIX: &str = "https://steamcommunity.com/openid/id/";

/// Query parameter carrying the anti-forgery token on the return URL.
pub const STATE_PARAM: &str = "state";

#[derive(Debug, Deserialize)]
struct PlayerSummariesResponse {
    response: PlayerSummaries,
}

#[derive(Debug, Deserialize)]
struct PlayerSummaries {
    #[serde(default)]
    players: Vec<PlayerSummary>,
}

#[derive(Debug, Deserialize)]
struct PlayerSummary {
    steamid: String,
    personaname: String,
    #[serde(default)]
    profileurl: Option<String>,
    #[serde(default)]
    avatarfull: Option<String>,
}

impl From<PlayerSummary> for SteamProfileParam {
    fn from(player: PlayerSummary) -> Self {
        Self {
            steam_id: player.steamid,
            display_name: player.personaname,
            avatar_url: player.avatarfull,
            profile_url: player.profileurl,
        }
    }
}

/// Service for the Steam OpenID login flow.
pub struct SteamAuthService<'a> {
    http_client: &'a reqwest::Client,
    settings: &'a SteamSettings,
}

impl<'a> SteamAuthService<'a> {
    /// Creates a new SteamAuthService instance.
    ///
    /// # Arguments
    /// - `http_client` - HTTP client for assertion verification and the Steam Web API
    /// - `settings` - Steam endpoints, API key, realm and return URL
    ///
    /// # Returns
    /// - `SteamAuthService` - New service instance
    pub fn new(http_client: &'a reqwest::Client, settings: &'a SteamSettings) -> Self {
        Self {
            http_client,
            settings,
        }
    }

    /// Builds the Steam OpenID login URL.
    ///
    /// # Arguments
    /// - `state` - Anti-forgery token appended to the return URL
    ///
    /// # Returns
    /// - `Ok(Url)` - The `checkid_setup` redirect to Steam
    /// - `Err(AppError::InternalError)` - The configured endpoints are not valid URLs
    pub fn login_url(&self, state: &str) -> Result<Url, AppError> {
        let return_to = return_to_url(&self.settings.return_url, state)
            .map_err(|e| AppError::InternalError(format!("Invalid Steam return URL: {}", e)))?;

        let mut url = Url::parse(&self.settings.openid_url)
            .map_err(|e| AppError::InternalError(format!("Invalid Steam OpenID URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("openid.ns", OPENID_NS)
            .append_pair("openid.mode", "checkid_setup")
            .append_pair("openid.return_to", return_to.as_str())
            .append_pair("openid.realm", &self.settings.realm)
            .append_pair("openid.identity", OPENID_IDENTIFIER_SELECT)
            .append_pair("openid.claimed_id", OPENID_IDENTIFIER_SELECT);

        Ok(url)
    }

    /// Completes a Steam login from the OpenID callback parameters.
    ///
    /// Validates the shape of the assertion, has Steam verify it, then fetches the
    /// player summary of the asserted account.
    ///
    /// # Arguments
    /// - `params` - All query parameters of the callback request
    ///
    /// # Returns
    /// - `Ok(SteamProfileParam)` - Profile of the verified Steam account
    /// - `Err(AppError::AuthErr(AuthError::SteamAssertionInvalid))` - Malformed assertion or
    ///   rejected by Steam
    /// - `Err(AppError::AuthErr(AuthError::SteamProfileMissing))` - No summary for the account
    /// - `Err(AppError::ReqwestErr)` - Steam could not be reached
    pub async fn callback(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<SteamProfileParam, AppError> {
        let steam_id = validate_assertion(params, &self.settings.return_url)?;

        self.verify_assertion(params).await?;

        self.fetch_player_summary(&steam_id).await
    }

    /// Re-posts the assertion to Steam with `check_authentication`.
    async fn verify_assertion(&self, params: &HashMap<String, String>) -> Result<(), AppError> {
        let mut form: Vec<(&str, &str)> = params
            .iter()
            .filter(|(key, _)| key.starts_with("openid.") && key.as_str() != "openid.mode")
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        form.push(("openid.mode", "check_authentication"));

        let body = self
            .http_client
            .post(&self.settings.openid_url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if !is_valid_assertion(&body) {
            return Err(AuthError::SteamAssertionInvalid(
                "Steam did not confirm the assertion".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Fetches the player summary for a SteamID64.
    async fn fetch_player_summary(&self, steam_id: &str) -> Result<SteamProfileParam, AppError> {
        let summaries = self
            .http_client
            .get(format!(
                "{}/ISteamUser/GetPlayerSummaries/v0002/",
                self.settings.api_url
            ))
            .query(&[("key", self.settings.api_key.as_str()), ("steamids", steam_id)])
            .send()
            .await?
            .error_for_status()?
            .json::<PlayerSummariesResponse>()
            .await?;

        summaries
            .response
            .players
            .into_iter()
            .find(|player| player.steamid == steam_id)
            .map(SteamProfileParam::from)
            .ok_or_else(|| AuthError::SteamProfileMissing(steam_id.to_string()).into())
    }
}

/// Appends the anti-forgery token to the callback URL.
fn return_to_url(return_url: &str, state: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(return_url)?;
    url.query_pairs_mut().append_pair(STATE_PARAM, state);
    Ok(url)
}

/// Checks a positive assertion before it is sent to Steam for verification.
///
/// # Returns
/// - `Ok(String)` - The asserted SteamID64
/// - `Err(AuthError::SteamAssertionInvalid)` - Wrong mode, foreign return URL or claimed id
fn validate_assertion(
    params: &HashMap<String, String>,
    expected_return_url: &str,
) -> Result<String, AuthError> {
    let param = |name: &str| params.get(name).map(String::as_str).unwrap_or_default();

    if param("openid.mode") != "id_res" {
        return Err(AuthError::SteamAssertionInvalid(format!(
            "unexpected openid.mode '{}'",
            param("openid.mode")
        )));
    }

    if !is_expected_return_to(param("openid.return_to"), expected_return_url) {
        return Err(AuthError::SteamAssertionInvalid(format!(
            "unexpected openid.return_to '{}'",
            param("openid.return_to")
        )));
    }

    claimed_steam_id(param("openid.claimed_id")).ok_or_else(|| {
        AuthError::SteamAssertionInvalid(format!(
            "unexpected openid.claimed_id '{}'",
            param("openid.claimed_id")
        ))
    })
}

/// Whether the asserted return URL is our callback, ignoring its query string.
fn is_expected_return_to(return_to: &str, expected_return_url: &str) -> bool {
    let (Ok(actual), Ok(expected)) = (Url::parse(return_to), Url::parse(expected_return_url))
    else {
        return false;
    };

    actual.origin() == expected.origin() && actual.path() == expected.path()
}

/// Extracts the SteamID64 from a Steam claimed id.
fn claimed_steam_id(claimed_id: &str) -> Option<String> {
    let steam_id = claimed_id.strip_prefix(STEAM_CLAIMED_ID_PREFIX)?;

    if steam_id.len() == 17 && steam_id.bytes().all(|b| b.is_ascii_digit()) {
        Some(steam_id.to_string())
    } else {
        None
    }
}

/// Parses the key-value form response of `check_authentication`.
fn is_valid_assertion(body: &str) -> bool {
    body.lines()
        .filter_map(|line| line.split_once(':'))
        .any(|(key, value)| key.trim() == "is_valid" && value.trim() == "true")
}
