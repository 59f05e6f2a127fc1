use crate::{
    dtos::user::UserResponse,
    error::ApiError,
    state::AppState,
    utils::access::current_user,
};
use axum::{Extension, Json, extract::State};
use database::services::notification::NotificationService;
use tower_oauth2_resource_server::claims::DefaultClaims;

/// Returns the account linked to the bearer token
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Successfully authenticated", body = UserResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "No account is linked to the token's subject")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = current_user(&state, &claims).await?;
    let unread = NotificationService::unread_count(&state.db, user.id).await?;

    Ok(Json(UserResponse::new(user, unread)))
}
