pub mod catalog;
pub mod course;
pub mod enrollment;
pub mod notification;
pub mod transcript;
pub mod user;
