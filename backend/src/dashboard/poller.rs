//! Fixed-interval refresh loop with an explicit idle/running state.
//!
//! `start` runs one cycle immediately and then one per interval. `stop`
//! signals the loop without cancelling a cycle already in flight; that cycle
//! completes and applies its result before the loop exits.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

/// Delay between refresh cycles.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Shortest accepted interval; shorter requests are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One fetch-and-render cycle.
#[async_trait]
pub trait Refresh: Send + Sync {
    /// Run a cycle. An error leaves whatever the cycle feeds untouched.
    async fn refresh(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

enum PollerState {
    Idle,
    Running {
        stop: oneshot::Sender<()>,
        task: JoinHandle<()>,
    },
}

/// Drives a [`Refresh`] on a fixed interval.
pub struct Poller<R> {
    refresh: Arc<R>,
    interval: Duration,
    state: PollerState,
}

impl<R> Poller<R>
where
    R: Refresh + 'static,
{
    pub fn new(refresh: Arc<R>) -> Self {
        Self::with_interval(refresh, POLL_INTERVAL)
    }

    /// Poll every `interval`, raised to [`MIN_POLL_INTERVAL`] when shorter.
    pub fn with_interval(refresh: Arc<R>, interval: Duration) -> Self {
        if interval < MIN_POLL_INTERVAL {
            warn!(
                requested_ms = interval.as_millis(),
                min_ms = MIN_POLL_INTERVAL.as_millis(),
                "poll interval too short; using minimum"
            );
        }
        Self {
            refresh,
            interval: interval.max(MIN_POLL_INTERVAL),
            state: PollerState::Idle,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PollerState::Running { .. })
    }

    /// Begin polling. Returns `false` when already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        let (stop, stopped) = oneshot::channel();
        let task = tokio::spawn(run_loop(Arc::clone(&self.refresh), self.interval, stopped));
        self.state = PollerState::Running { stop, task };
        true
    }

    /// Signal the loop to exit. Returns `false` when already idle.
    pub fn stop(&mut self) -> bool {
        self.take_running().is_some()
    }

    /// Stop and wait for an in-flight cycle to finish.
    pub async fn stop_and_wait(&mut self) -> bool {
        let Some(task) = self.take_running() else {
            return false;
        };
        if let Err(err) = task.await {
            warn!(error = %err, "poller task ended abnormally");
        }
        true
    }

    fn take_running(&mut self) -> Option<JoinHandle<()>> {
        match std::mem::replace(&mut self.state, PollerState::Idle) {
            PollerState::Idle => None,
            PollerState::Running { stop, task } => {
                // The loop may already have exited; nothing to signal then.
                let _ = stop.send(());
                Some(task)
            }
        }
    }
}

async fn run_loop<R>(refresh: Arc<R>, interval: Duration, mut stopped: oneshot::Receiver<()>)
where
    R: Refresh + ?Sized,
{
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = &mut stopped => break,
            _ = ticker.tick() => {
                match refresh.refresh().await {
                    Ok(()) => debug!("refresh cycle completed"),
                    Err(err) => warn!(error = %err, "refresh cycle failed"),
                }
            }
        }
    }
    debug!("poller stopped");
}
