//! In-process adapters used when no database is configured.

mod metric_repository;

pub use metric_repository::InMemoryMetricRepository;
