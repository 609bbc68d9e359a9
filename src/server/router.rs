use axum::{routing::get, Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{
    model::{api::ErrorDto, api::HealthDto, purchase::PurchaseDto, user::UserDto},
    server::{
        controller::{
            auth::{
                self, discord_callback, discord_login, get_user, logout, steam_callback,
                steam_login,
            },
            health::{self, health},
            purchase::{self, get_purchases},
        },
        state::AppState,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "serverhub", description = "Game server community backend"),
    paths(
        auth::steam_login,
        auth::steam_callback,
        auth::discord_login,
        auth::discord_callback,
        auth::logout,
        auth::get_user,
        purchase::get_purchases,
        health::health,
    ),
    components(schemas(ErrorDto, HealthDto, PurchaseDto, UserDto)),
    tags(
        (name = "auth", description = "Steam and Discord login"),
        (name = "purchase", description = "Purchase history"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/steam/login", get(steam_login))
        .route("/api/auth/steam/callback", get(steam_callback))
        .route("/api/auth/discord/login", get(discord_login))
        .route("/api/auth/discord/callback", get(discord_callback))
        .route("/api/auth/logout", get(logout))
        .route("/api/auth/user", get(get_user))
        .route("/api/purchases", get(get_purchases))
        .route("/api/health", get(health))
        .route(
            "/api/docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(TraceLayer::new_for_http())
}
