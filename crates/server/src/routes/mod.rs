pub mod auth;
pub mod catalog;
pub mod course;
pub mod enrollment;
pub mod health;
pub mod notification;
pub mod root;
pub mod transcript;

use crate::state::AppState;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Routes reachable without a bearer token
pub fn public_router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(root::root))
        .routes(routes!(health::health))
}

/// Routes that sit behind the OAuth2 layer
pub fn protected_router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::me))
        .routes(routes!(catalog::list_units))
        .routes(routes!(catalog::list_offerings))
        .routes(routes!(catalog::get_offering))
        .routes(routes!(catalog::list_intakes))
        .routes(routes!(course::list_courses, course::create_course))
        .routes(routes!(course::get_course))
        .routes(routes!(course::add_course_unit))
        .routes(routes!(course::student_course, course::set_student_course))
        .routes(routes!(
            enrollment::list_enrollments,
            enrollment::create_enrollment
        ))
        .routes(routes!(enrollment::withdraw_enrollment))
        .routes(routes!(enrollment::approve_enrollment))
        .routes(routes!(enrollment::record_result))
        .routes(routes!(enrollment::set_status))
        .routes(routes!(enrollment::student_dashboard))
        .routes(routes!(enrollment::teaching_summary))
        .routes(routes!(transcript::list_transcripts))
        .routes(routes!(transcript::transcript_summary))
        .routes(routes!(notification::list_notifications))
        .routes(routes!(notification::mark_notification_read))
}
