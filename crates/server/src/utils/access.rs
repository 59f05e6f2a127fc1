use crate::{error::ApiError, state::AppState};
use axum::Extension;
use database::{entities::users, services::user::UserService};
use tower_oauth2_resource_server::claims::DefaultClaims;
use uuid::Uuid;

/// Resolves the account behind the bearer token's `sub` claim
pub async fn current_user(
    state: &AppState,
    claims: &Extension<DefaultClaims>,
) -> Result<users::Model, ApiError> {
    let sub = claims.sub.as_ref().ok_or(ApiError::MissingIdentity)?;

    UserService::find_by_subject(&state.db, sub)
        .await?
        .ok_or(ApiError::UnknownUser)
}

pub fn require_staff(user: &users::Model) -> Result<(), ApiError> {
    if user.is_staff {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Staff access required"))
    }
}

pub fn require_teaching_staff(user: &users::Model) -> Result<(), ApiError> {
    if user.is_teaching_staff() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Instructor or staff access required"))
    }
}

/// Student whose records a request may read
///
/// Staff may name anyone; everyone else only sees their own records.
pub fn student_scope(user: &users::Model, requested: Option<Uuid>) -> Result<Uuid, ApiError> {
    match requested {
        Some(student_id) if student_id != user.id => {
            require_staff(user)?;
            Ok(student_id)
        }
        _ => Ok(user.id),
    }
}

/// Owners act on their own enrollments, staff on any
pub fn require_owner_or_staff(user: &users::Model, owner_id: Uuid) -> Result<(), ApiError> {
    if user.id == owner_id || user.is_staff {
        Ok(())
    } else {
        Err(ApiError::Forbidden("You can only change your own enrollments"))
    }
}
