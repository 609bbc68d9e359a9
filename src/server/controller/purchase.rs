use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{api::ErrorDto, purchase::PurchaseDto},
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::purchase::PurchaseService,
        state::AppState,
    },
};

/// Tag for grouping purchase endpoints in OpenAPI documentation
pub static PURCHASE_TAG: &str = "purchase";

/// List the purchases of the current identity, newest first.
///
/// Requires a linked Steam account. A failed lookup yields an empty list.
#[utoipa::path(
    get,
    path = "/api/purchases",
    tag = PURCHASE_TAG,
    responses(
        (status = 200, description = "Purchases of the current identity", body = Vec<PurchaseDto>),
        (status = 401, description = "Not logged in or session expired", body = ErrorDto),
        (status = 403, description = "No Steam account linked", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_purchases(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let identity = AuthGuard::new(&state.db, &session)
        .require(&[Permission::SteamLinked])
        .await?;

    let purchases: Vec<PurchaseDto> = PurchaseService::new(&state.db)
        .list_for_user(identity.id)
        .await
        .into_iter()
        .map(|purchase| purchase.into_dto())
        .collect();

    Ok((StatusCode::OK, Json(purchases)))
}
