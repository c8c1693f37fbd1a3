//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Append-only metric snapshots, one row per recorded reading.
    metrics (id) {
        /// Primary key: UUID v4 assigned by the service.
        id -> Uuid,
        /// Owning user; there is no users table, the id comes from the token.
        user_id -> Uuid,
        temperature -> Float8,
        humidity -> Float8,
        /// One of `Good`, `Moderate`, `Poor` (enforced by a CHECK constraint).
        air_quality -> Text,
        recorded_at -> Timestamptz,
    }
}
