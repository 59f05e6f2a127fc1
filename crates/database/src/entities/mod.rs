pub mod course_units;
pub mod courses;
pub mod enrollment_approvals;
pub mod enrollments;
pub mod intakes;
pub mod notifications;
pub mod semester_offerings;
pub mod student_profiles;
pub mod transcripts;
pub mod unit_anti_requisites;
pub mod unit_prerequisites;
pub mod units;
pub mod users;
