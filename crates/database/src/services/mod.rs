pub mod catalog;
pub mod course;
pub mod dashboard;
pub mod enrollment;
pub mod notification;
pub mod transcript;
pub mod user;
