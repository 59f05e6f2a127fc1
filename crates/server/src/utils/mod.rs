pub mod access;
pub mod shutdown;
