use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// CSRF state validation failed during a provider callback.
    ///
    /// The state token in the callback URL does not match the token stored in the
    /// session, indicating a potential CSRF attack or an invalid callback request.
    /// Results in a 400 Bad Request response.
    #[error("Failed to login user due to CSRF state mismatch")]
    CsrfValidationFailed,

    /// No identity is stored in the session.
    ///
    /// The request is simply not logged in. Results in a 401 Unauthorized response.
    #[error("No user is logged in for this session")]
    UserNotInSession,

    /// The session refers to an identity that no longer exists.
    ///
    /// Distinct from `UserNotInSession`: the session was established but can no
    /// longer be resolved. Results in a 401 Unauthorized response with its own message.
    #[error("Session refers to user {0} which no longer exists")]
    UserNotInDatabase(i32),

    /// The identity lacks something the endpoint requires.
    ///
    /// Results in a 403 Forbidden response.
    #[error("Access denied for user {0}: {1}")]
    AccessDenied(i32, String),

    /// Two authentications raced for the same provider id or merge candidate and the
    /// conflict could not be resolved.
    ///
    /// Results in a 409 Conflict response asking the user to retry.
    #[error("Failed to link {0} account due to a concurrent login")]
    LinkingConflict(String),

    /// The Steam OpenID assertion was malformed or rejected by Steam.
    ///
    /// Results in a 400 Bad Request response.
    #[error("Steam OpenID assertion rejected: {0}")]
    SteamAssertionInvalid(String),

    /// Steam returned no player summary for a verified Steam ID.
    #[error("Steam returned no profile for Steam ID {0}")]
    SteamProfileMissing(String),

    /// Exchanging the Discord authorization code for a token failed.
    ///
    /// Results in a 400 Bad Request response.
    #[error("Failed to exchange Discord authorization code: {0}")]
    TokenExchange(String),
}

/// Converts authentication errors into HTTP responses.
///
/// - `UserNotInSession` → 401 Unauthorized with "Not logged in"
/// - `UserNotInDatabase` → 401 Unauthorized with "Your session has expired"
/// - `AccessDenied` → 403 Forbidden
/// - `LinkingConflict` → 409 Conflict
/// - CSRF, Steam assertion and token exchange failures → 400 Bad Request
/// - `SteamProfileMissing` → 502 Bad Gateway
///
/// All errors are logged at debug level for diagnostics while keeping client-facing messages
/// generic to avoid information leakage.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::UserNotInSession => (StatusCode::UNAUTHORIZED, "Not logged in"),
            Self::UserNotInDatabase(_) => (
                StatusCode::UNAUTHORIZED,
                "Your session has expired, please log in again.",
            ),
            Self::AccessDenied(_, _) => (
                StatusCode::FORBIDDEN,
                "You do not have access to this resource.",
            ),
            Self::LinkingConflict(_) => (
                StatusCode::CONFLICT,
                "Your account could not be linked because of a concurrent login, please try again.",
            ),
            Self::SteamProfileMissing(_) => (
                StatusCode::BAD_GATEWAY,
                "Steam did not return your profile, please try again.",
            ),
            Self::CsrfValidationFailed
            | Self::SteamAssertionInvalid(_)
            | Self::TokenExchange(_) => (
                StatusCode::BAD_REQUEST,
                "There was an issue logging you in, please try again.",
            ),
        };

        (
            status,
            Json(ErrorDto {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
