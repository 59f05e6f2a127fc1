use crate::{
    dtos::course::{
        AddCourseUnitRequest, CourseDetailResponse, CourseQueryParams, CourseResponse,
        CourseUnitResponse, CreateCourseRequest, SetStudentCourseRequest, StudentCourseResponse,
    },
    error::ApiError,
    state::AppState,
    utils::access::{current_user, require_staff, student_scope},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::course::{CourseService, NewCourse};
use tower_oauth2_resource_server::claims::DefaultClaims;
use uuid::Uuid;

/// List courses
#[utoipa::path(
    get,
    path = "/courses",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "Courses ordered by code", body = Vec<CourseResponse>),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = CourseService::list_courses(&state.db, params.active_only).await?;
    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// Create a course
#[utoipa::path(
    post,
    path = "/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 403, description = "Staff access required"),
        (status = 409, description = "Course code already taken", body = crate::error::ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    let user = current_user(&state, &claims).await?;
    require_staff(&user)?;

    let course = CourseService::create_course(
        &state.db,
        NewCourse {
            code: request.code,
            name: request.name,
            description: request.description,
            duration_years: request.duration_years,
            credit_points: request.credit_points,
            department: request.department,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(course.into())))
}

/// Get a course with the units it lists
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseDetailResponse),
        (status = 404, description = "Course not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let course = CourseService::get_course(&state.db, id).await?;
    let units = CourseService::units_of(&state.db, id).await?;

    Ok(Json(CourseDetailResponse {
        course: course.into(),
        units: units.into_iter().map(Into::into).collect(),
    }))
}

/// List a unit on a course, or change whether it is an elective
#[utoipa::path(
    post,
    path = "/courses/{id}/units",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = AddCourseUnitRequest,
    responses(
        (status = 200, description = "Unit listed on the course", body = CourseUnitResponse),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Course or unit not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn add_course_unit(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddCourseUnitRequest>,
) -> Result<Json<CourseUnitResponse>, ApiError> {
    let user = current_user(&state, &claims).await?;
    require_staff(&user)?;

    let listed =
        CourseService::add_unit(&state.db, id, request.unit_id, request.is_elective).await?;
    Ok(Json(listed.into()))
}

/// Get the course a student is admitted to
#[utoipa::path(
    get,
    path = "/students/{id}/course",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "The student's course, or null", body = Option<CourseResponse>),
        (status = 403, description = "Students can only see their own course")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn student_course(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<CourseResponse>>, ApiError> {
    let user = current_user(&state, &claims).await?;
    let student_id = student_scope(&user, Some(id))?;

    let course = CourseService::course_of(&state.db, student_id).await?;
    Ok(Json(course.map(Into::into)))
}

/// Admit a student to a course
#[utoipa::path(
    put,
    path = "/students/{id}/course",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    request_body = SetStudentCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = StudentCourseResponse),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Student or course not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn set_student_course(
    State(state): State<AppState>,
    claims: Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetStudentCourseRequest>,
) -> Result<Json<StudentCourseResponse>, ApiError> {
    let user = current_user(&state, &claims).await?;
    require_staff(&user)?;

    let profile = CourseService::set_student_course(&state.db, id, request.course_id).await?;
    Ok(Json(profile.into()))
}
