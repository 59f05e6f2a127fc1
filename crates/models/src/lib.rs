pub mod course_scope;
pub mod eligibility;
pub mod enrollment_status;
pub mod error;
pub mod grade;
pub mod lifecycle;
pub mod notification;
pub mod offering;
pub mod requisite;
pub mod semester;
