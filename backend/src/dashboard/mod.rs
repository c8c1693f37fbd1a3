//! Terminal dashboard client.
//!
//! Polls the backend on a fixed interval, renders the live reading and green
//! score plus the caller's stored history, and can save each new vendor entry
//! as a metric.

pub mod client;
pub mod live;
pub mod poller;
pub mod view;

pub use client::{BackendClient, ClientError, DEFAULT_CLIENT_TIMEOUT, DashboardBackend};
pub use live::{LiveRefresh, RefreshError};
pub use poller::{POLL_INTERVAL, Poller, Refresh};
pub use view::DashboardView;
