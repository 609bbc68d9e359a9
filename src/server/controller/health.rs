use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{model::api::HealthDto, server::state::AppState};

pub static HEALTH_TAG: &str = "health";

/// Report whether the database is reachable.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Database reachable", body = HealthDto),
        (status = 503, description = "Database unreachable", body = HealthDto)
    ),
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthDto {
                status: "ok".to_string(),
            }),
        ),
        Err(err) => {
            tracing::warn!("Health check failed to reach the database: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthDto {
                    status: "unavailable".to_string(),
                }),
            )
        }
    }
}
