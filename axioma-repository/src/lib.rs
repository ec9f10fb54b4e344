//! # AXIOMA Repository
//! This crate provides traits and implementations for reading the reserve and
//! indicator datasets and for maintaining users and their favorites. It includes
//! definitions for errors, interfaces, and concrete implementations for PostgreSQL.
pub mod errors;
pub mod interfaces;
pub mod postgres;

pub use errors::RepositoryError;
pub use interfaces::{DetailQuery, IndicatorQuery, IndicatorRepository, ReserveRepository, UserRepository};
pub use postgres::{
    connect, run_migrations, PoolSettings, PostgresIndicatorRepository, PostgresReserveRepository,
    PostgresUserRepository,
};
pub use sqlx::PgPool;
