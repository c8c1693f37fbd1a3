//! Correlation identifier for one API request.
//!
//! The `Trace` middleware installs a fresh [`TraceId`] in Tokio task-local
//! storage before a handler runs. Services and the error type read it back
//! with [`TraceId::current`]. Task locals do not follow `tokio::spawn`, so
//! background work such as the buzzer reset goes through
//! [`TraceId::spawn_in_scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task::JoinHandle;
use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// UUID v4 identifying a single request in logs, headers and error bodies.
///
/// # Examples
/// ```
/// use ecoband::TraceId;
///
/// async fn record() {
///     let trace_id = TraceId::current().map(|id| id.to_string());
///     tracing::info!(?trace_id, "metric recorded");
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    ///
    /// # Examples
    /// ```
    /// use ecoband::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let trace_id: TraceId = "6f1c0b8e-3f5e-4a52-9d0e-0c1b2a3d4e5f"
    ///     .parse()
    ///     .expect("valid UUID");
    /// let seen = TraceId::scope(trace_id, async { TraceId::current() }).await;
    /// assert_eq!(seen, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<F>(trace_id: Self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }

    /// Spawn `fut` on the runtime, carrying the current identifier with it.
    pub fn spawn_in_scope<F>(fut: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        match Self::current() {
            Some(trace_id) => tokio::spawn(CURRENT.scope(trace_id, fut)),
            None => tokio::spawn(fut),
        }
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
