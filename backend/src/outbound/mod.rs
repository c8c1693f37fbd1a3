//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL metric store using Diesel.
//! - **memory**: in-process metric store for database-less runs and tests.
//! - **thingspeak**: reqwest client for the band's vendor channel.
//! - **token**: HS256 bearer token verification and issuance.
//!
//! Adapters translate between domain types and infrastructure
//! representations and carry no business logic.

pub mod memory;
pub mod persistence;
pub mod thingspeak;
pub mod token;
