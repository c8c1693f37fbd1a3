//! Diesel row structs for the `metrics` table.
//!
//! Rows stay internal to the persistence adapter; conversion to domain types
//! happens in the repository.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::metrics;

/// Row struct for reading from the metrics table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = metrics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MetricRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub temperature: f64,
    pub humidity: f64,
    pub air_quality: String,
    pub recorded_at: DateTime<Utc>,
}

/// Insertable struct for new metric records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = metrics)]
pub(crate) struct NewMetricRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub temperature: f64,
    pub humidity: f64,
    pub air_quality: &'a str,
    pub recorded_at: DateTime<Utc>,
}
