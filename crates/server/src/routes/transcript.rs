use crate::{
    dtos::transcript::{GpaSummaryResponse, TranscriptQueryParams, TranscriptResponse},
    error::ApiError,
    state::AppState,
    utils::access::{current_user, student_scope},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use database::services::transcript::TranscriptService;
use tower_oauth2_resource_server::claims::DefaultClaims;

/// List transcripts
///
/// Students get their own. Staff get everyone's unless they name a student.
#[utoipa::path(
    get,
    path = "/transcripts",
    params(TranscriptQueryParams),
    responses(
        (status = 200, description = "Transcripts, newest first", body = Vec<TranscriptResponse>),
        (status = 403, description = "Students cannot read other students' transcripts")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Transcripts"
)]
pub async fn list_transcripts(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Query(params): Query<TranscriptQueryParams>,
) -> Result<Json<Vec<TranscriptResponse>>, ApiError> {
    let user = current_user(&state, &claims).await?;
    let student_id = match params.student_id {
        None if user.is_staff => None,
        requested => Some(student_scope(&user, requested)?),
    };

    let transcripts = TranscriptService::list(&state.db, student_id).await?;
    Ok(Json(
        transcripts
            .into_iter()
            .map(TranscriptResponse::from)
            .collect(),
    ))
}

/// Credit-weighted GPA over completed units
#[utoipa::path(
    get,
    path = "/transcripts/summary",
    params(TranscriptQueryParams),
    responses(
        (status = 200, description = "GPA summary", body = GpaSummaryResponse),
        (status = 403, description = "Students cannot read other students' transcripts")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Transcripts"
)]
pub async fn transcript_summary(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Query(params): Query<TranscriptQueryParams>,
) -> Result<Json<GpaSummaryResponse>, ApiError> {
    let user = current_user(&state, &claims).await?;
    let student_id = student_scope(&user, params.student_id)?;

    let summary = TranscriptService::summary(&state.db, student_id).await?;
    Ok(Json(GpaSummaryResponse::new(student_id, summary)))
}
