//! Error types for the repository crate.
//! Consolidates and re-exports error types related to storage operations.
mod repository;

pub use repository::RepositoryError;
