//! Page objects for the forge screens involved in creating a repository.

pub mod create_repository;
pub mod repository;
pub mod start;
