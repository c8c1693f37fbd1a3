//! PostgreSQL persistence adapters using Diesel.
//!
//! Repository implementations translate between Diesel rows and domain types
//! and nothing more. Rows (`models.rs`) and table definitions (`schema.rs`)
//! stay private to this module; connections come from a `bb8` pool through
//! `diesel-async`, and every database error is mapped to a port error.
//!
//! # Example
//!
//! ```ignore
//! use ecoband::outbound::persistence::{DbPool, DieselMetricRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/ecoband")).await?;
//! let repo = DieselMetricRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_metric_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_metric_repository::DieselMetricRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
