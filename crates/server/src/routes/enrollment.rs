use crate::{
    dtos::enrollment::{
        ApproveEnrollmentRequest, CreateEnrollmentRequest, EnrollmentQueryParams,
        EnrollmentResponse, RecordResultRequest, SetStatusRequest, StudentDashboardResponse,
        TeachingSummaryResponse, parse_status,
    },
    error::ApiError,
    state::AppState,
    utils::access::{
        current_user, require_owner_or_staff, require_staff, require_teaching_staff,
        student_scope,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use database::services::{
    dashboard::DashboardService,
    enrollment::{EnrollmentFilter, EnrollmentService, ResultEntry},
};
use sea_orm::DatabaseConnection;
use tower_oauth2_resource_server::claims::DefaultClaims;
use uuid::Uuid;

async fn respond(db: &DatabaseConnection, id: Uuid) -> Result<Json<EnrollmentResponse>, ApiError> {
    let context = EnrollmentService::load_context(db, id).await?;
    Ok(Json(context.into()))
}

/// List enrollments
///
/// Students only ever see their own. Staff see everything unless they filter by student.
#[utoipa::path(
    get,
    path = "/enrollments",
    params(EnrollmentQueryParams),
    responses(
        (status = 200, description = "Matching enrollments", body = Vec<EnrollmentResponse>),
        (status = 400, description = "Unknown status filter", body = crate::error::ErrorResponse),
        (status = 403, description = "Students cannot list other students' enrollments")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn list_enrollments(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Query(params): Query<EnrollmentQueryParams>,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    let user = current_user(&state, &claims).await?;

    let student_id = match params.student_id {
        None if user.is_staff => None,
        requested => Some(student_scope(&user, requested)?),
    };
    let status = params.status.as_deref().map(parse_status).transpose()?;

    let filter = EnrollmentFilter {
        student_id,
        offering_id: params.offering_id,
        status,
    };
    let enrollments = EnrollmentService::list(&state.db, filter).await?;

    Ok(Json(enrollments.into_iter().map(Into::into).collect()))
}

/// Request enrollment in an offering
///
/// The enrollment starts as `PENDING` and staff are notified.
#[utoipa::path(
    post,
    path = "/enrollments",
    request_body = CreateEnrollmentRequest,
    responses(
        (status = 201, description = "Enrollment created", body = EnrollmentResponse),
        (status = 400, description = "Eligibility check failed", body = crate::error::ErrorResponse),
        (status = 403, description = "Only staff may enroll another student"),
        (status = 404, description = "Offering or student not found"),
        (status = 409, description = "Already enrolled in this offering", body = crate::error::ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn create_enrollment(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Json(request): Json<CreateEnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    let user = current_user(&state, &claims).await?;
    let student_id = student_scope(&user, request.student_id)?;

    let enrollment = EnrollmentService::enroll(
        &state.db,
        student_id,
        request.offering_id,
        Some(user.id),
        Utc::now(),
    )
    .await?;

    let response = respond(&state.db, enrollment.id).await?;
    Ok((StatusCode::CREATED, response))
}

/// Withdraw from an enrollment
#[utoipa::path(
    post,
    path = "/enrollments/{id}/withdraw",
    params(
        ("id" = Uuid, Path, description = "Enrollment ID")
    ),
    responses(
        (status = 200, description = "Enrollment withdrawn", body = EnrollmentResponse),
        (status = 400, description = "Enrollment cannot be withdrawn from its current status", body = crate::error::ErrorResponse),
        (status = 403, description = "Not your enrollment"),
        (status = 404, description = "Enrollment not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn withdraw_enrollment(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let user = current_user(&state, &claims).await?;
    let enrollment = EnrollmentService::get(&state.db, id).await?;
    require_owner_or_staff(&user, enrollment.student_id)?;

    EnrollmentService::withdraw(&state.db, id, Some(user.id), Utc::now()).await?;
    respond(&state.db, id).await
}

/// Approve a pending enrollment
#[utoipa::path(
    post,
    path = "/enrollments/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Enrollment ID")
    ),
    request_body = ApproveEnrollmentRequest,
    responses(
        (status = 200, description = "Enrollment approved", body = EnrollmentResponse),
        (status = 400, description = "Enrollment is not pending", body = crate::error::ErrorResponse),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Enrollment not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn approve_enrollment(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<ApproveEnrollmentRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let user = current_user(&state, &claims).await?;
    require_staff(&user)?;

    EnrollmentService::approve(&state.db, id, user.id, request.notes, Utc::now()).await?;
    respond(&state.db, id).await
}

/// Record a final result for an enrollment
#[utoipa::path(
    post,
    path = "/enrollments/{id}/result",
    params(
        ("id" = Uuid, Path, description = "Enrollment ID")
    ),
    request_body = RecordResultRequest,
    responses(
        (status = 200, description = "Result recorded", body = EnrollmentResponse),
        (status = 400, description = "Invalid outcome or transition", body = crate::error::ErrorResponse),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Enrollment not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn record_result(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordResultRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let user = current_user(&state, &claims).await?;
    require_staff(&user)?;

    let entry = ResultEntry {
        outcome: parse_status(&request.outcome)?,
        grade: request.grade,
        marks: request.marks,
        completion_date: request.completion_date,
    };
    EnrollmentService::record_result(&state.db, id, entry, Some(user.id), Utc::now()).await?;
    respond(&state.db, id).await
}

/// Overwrite an enrollment's status without transition checks
#[utoipa::path(
    put,
    path = "/enrollments/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Enrollment ID")
    ),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = EnrollmentResponse),
        (status = 400, description = "Unknown status", body = crate::error::ErrorResponse),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Enrollment not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn set_status(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let user = current_user(&state, &claims).await?;
    require_staff(&user)?;

    let status = parse_status(&request.status)?;
    EnrollmentService::set_status(&state.db, id, status, Some(user.id), Utc::now()).await?;
    respond(&state.db, id).await
}

/// The caller's study dashboard
#[utoipa::path(
    get,
    path = "/enrollments/dashboard",
    responses(
        (status = 200, description = "Past, current and available units", body = StudentDashboardResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn student_dashboard(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
) -> Result<Json<StudentDashboardResponse>, ApiError> {
    let user = current_user(&state, &claims).await?;
    let dashboard = DashboardService::student_dashboard(&state.db, user.id, Utc::now()).await?;

    Ok(Json(dashboard.into()))
}

/// Enrollment summary for the offerings of units the caller convenes
#[utoipa::path(
    get,
    path = "/enrollments/teaching",
    responses(
        (status = 200, description = "Per-offering enrollment summary", body = TeachingSummaryResponse),
        (status = 403, description = "Instructor or staff access required")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn teaching_summary(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
) -> Result<Json<TeachingSummaryResponse>, ApiError> {
    let user = current_user(&state, &claims).await?;
    require_teaching_staff(&user)?;

    let summary = DashboardService::teaching_summary(&state.db, user.id).await?;
    Ok(Json(summary.into()))
}
