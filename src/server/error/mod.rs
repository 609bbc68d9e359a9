//! Errors raised while serving a request or starting the server.
//!
//! `AppError` is what every handler, service and startup step returns. Login and
//! linking outcomes the client should act on live in `AuthError` and keep their own
//! status codes; everything else is an infrastructure failure reported as a bare 500.

pub mod auth;
pub mod config;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{auth::AuthError, config::ConfigError},
};

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed environment at startup.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Login, CSRF, linking or access failure with a client-facing status.
    #[error(transparent)]
    AuthErr(#[from] AuthError),

    /// Identity or purchase store failure. The linker never retries these.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    #[error(transparent)]
    SessionErr(#[from] tower_sessions::session::Error),

    /// Steam Web API, OpenID verification or Discord REST call failed in transport.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// Invariant broken inside the server, such as a provider URL that no longer parses.
    #[error("{0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::AuthErr(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Logs the wrapped error and answers 500 with a fixed body.
///
/// Database, session and provider transport details stay in the log.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self.0);

        let body = ErrorDto {
            error: "Internal server error".to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
