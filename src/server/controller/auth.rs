use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use oauth2::CsrfToken;
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    model::{api::ErrorDto, user::UserDto},
    server::{
        error::{auth::AuthError, AppError},
        middleware::{
            auth::AuthGuard,
            session::{AuthSession, CsrfSession},
        },
        service::{
            identity::IdentityLinker,
            oauth::{steam::STATE_PARAM, DiscordAuthService, SteamAuthService},
        },
        state::AppState,
    },
};

/// Tag for grouping auth endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

/// Query parameters for the Discord OAuth callback endpoint.
#[derive(Deserialize)]
pub struct CallbackParams {
    /// CSRF state token to be validated against the session value.
    pub state: String,
    /// Authorization code from Discord for token exchange.
    pub code: String,
}

/// Start a Steam login.
///
/// Stores a fresh anti-forgery token in the session and redirects to Steam's OpenID
/// login page.
#[utoipa::path(
    get,
    path = "/api/auth/steam/login",
    tag = AUTH_TAG,
    responses(
        (status = 307, description = "Redirect to Steam OpenID login"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn steam_login(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let csrf_token = CsrfToken::new_random();
    CsrfSession::new(&session)
        .set_token(csrf_token.secret().clone())
        .await?;

    let url = SteamAuthService::new(&state.http_client, &state.steam)
        .login_url(csrf_token.secret())?;

    Ok(Redirect::temporary(url.as_str()))
}

/// Complete a Steam login.
///
/// Verifies the OpenID assertion with Steam, resolves the Steam account to an identity
/// and stores it as the session principal.
///
/// # Returns
/// - `307 Temporary Redirect` - Logged in, redirect to the application
/// - `400 Bad Request` - CSRF mismatch or invalid assertion
/// - `409 Conflict` - Concurrent login could not be reconciled
/// - `502 Bad Gateway` - Steam returned no profile
/// - `500 Internal Server Error` - Database or Steam request failure
#[utoipa::path(
    get,
    path = "/api/auth/steam/callback",
    tag = AUTH_TAG,
    responses(
        (status = 307, description = "Logged in, redirect to the application"),
        (status = 400, description = "CSRF mismatch or invalid Steam assertion", body = ErrorDto),
        (status = 409, description = "Concurrent login conflict", body = ErrorDto),
        (status = 502, description = "Steam returned no profile", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn steam_callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let csrf_state = params.get(STATE_PARAM).map(String::as_str).unwrap_or_default();
    validate_csrf(&session, csrf_state).await?;

    let profile = SteamAuthService::new(&state.http_client, &state.steam)
        .callback(&params)
        .await?;

    let identity = IdentityLinker::new(&state.db, state.link_mode)
        .resolve_steam(&profile)
        .await?;

    AuthSession::new(&session).set_user_id(identity.id).await?;

    tracing::info!(
        "User {} logged in with Steam account {}",
        identity.id,
        profile.steam_id
    );

    Ok(Redirect::temporary(&state.app_url))
}

/// Start a Discord login.
#[utoipa::path(
    get,
    path = "/api/auth/discord/login",
    tag = AUTH_TAG,
    responses(
        (status = 307, description = "Redirect to Discord OAuth2 authorization"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn discord_login(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let auth_service =
        DiscordAuthService::new(&state.http_client, &state.oauth_client, &state.discord_api_url);

    let (url, csrf_token) = auth_service.login_url();

    CsrfSession::new(&session)
        .set_token(csrf_token.secret().clone())
        .await?;

    Ok(Redirect::temporary(url.as_str()))
}

/// Complete a Discord login.
///
/// Exchanges the authorization code, resolves the Discord account to an identity
/// (merging it into a pending Steam identity when one exists) and stores it as the
/// session principal.
#[utoipa::path(
    get,
    path = "/api/auth/discord/callback",
    tag = AUTH_TAG,
    params(
        ("state" = String, Query, description = "CSRF state issued by the login endpoint"),
        ("code" = String, Query, description = "Discord authorization code")
    ),
    responses(
        (status = 307, description = "Logged in, redirect to the application"),
        (status = 400, description = "CSRF mismatch or rejected authorization code", body = ErrorDto),
        (status = 409, description = "Concurrent login conflict", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn discord_callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, AppError> {
    validate_csrf(&session, &params.state).await?;

    let profile =
        DiscordAuthService::new(&state.http_client, &state.oauth_client, &state.discord_api_url)
            .callback(params.code)
            .await?;

    let identity = IdentityLinker::new(&state.db, state.link_mode)
        .resolve_discord(&profile)
        .await?;

    AuthSession::new(&session).set_user_id(identity.id).await?;

    tracing::info!(
        "User {} logged in with Discord account {}",
        identity.id,
        profile.discord_id
    );

    Ok(Redirect::temporary(&state.app_url))
}

/// Log out and redirect to the application.
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 307, description = "Session cleared, redirect to the application"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    AuthSession::new(&session).clear().await?;

    Ok(Redirect::temporary(&state.app_url))
}

/// Get the currently authenticated identity.
///
/// # Returns
/// - `200 OK` - `{id, steamId, steamName, isFullyAuthenticated}`
/// - `401 Unauthorized` - Not logged in, or the session refers to a deleted identity
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current identity", body = UserDto),
        (status = 401, description = "Not logged in or session expired", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let identity = AuthGuard::new(&state.db, &session).require(&[]).await?;

    Ok((StatusCode::OK, Json(identity.into_dto())))
}

async fn validate_csrf(session: &Session, csrf_state: &str) -> Result<(), AppError> {
    let stored_state = CsrfSession::new(session).take_token().await?;

    match stored_state {
        Some(state) if !csrf_state.is_empty() && state == csrf_state => Ok(()),
        _ => Err(AuthError::CsrfValidationFailed.into()),
    }
}
