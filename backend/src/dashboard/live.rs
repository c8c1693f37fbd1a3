//! The dashboard's refresh cycle.
//!
//! Each cycle fetches the latest vendor reading through the backend and the
//! caller's stored history, then publishes a new [`DashboardView`]. With
//! recording enabled, every vendor entry is saved as a metric at most once,
//! keyed by its entry id.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::client::{ClientError, DashboardBackend};
use super::poller::Refresh;
use super::view::DashboardView;
use crate::domain::{AirQuality, MetricReading, TelemetryReading};

/// Failures of a single refresh cycle.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Backend(#[from] ClientError),
    #[error("recorded entry set lock poisoned")]
    RecordedPoisoned,
}

/// Refresh cycle publishing into a watch channel.
pub struct LiveRefresh<B> {
    backend: Arc<B>,
    record: bool,
    recorded: Mutex<HashSet<u64>>,
    view: watch::Sender<DashboardView>,
}

impl<B> LiveRefresh<B>
where
    B: DashboardBackend,
{
    pub fn new(backend: Arc<B>, record: bool) -> Self {
        let (view, _) = watch::channel(DashboardView::default());
        Self {
            backend,
            record,
            recorded: Mutex::new(HashSet::new()),
            view,
        }
    }

    /// Receive every published view.
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.view.subscribe()
    }

    pub fn current(&self) -> DashboardView {
        self.view.borrow().clone()
    }

    fn recorded(&self) -> Result<MutexGuard<'_, HashSet<u64>>, RefreshError> {
        self.recorded.lock().map_err(|_| {
            warn!("recorded entry set lock poisoned; recording halted");
            RefreshError::RecordedPoisoned
        })
    }

    async fn record_if_new(&self, reading: &TelemetryReading) -> Result<(), RefreshError> {
        let Some(entry_id) = reading.entry_id else {
            return Ok(());
        };
        if self.recorded()?.contains(&entry_id) {
            return Ok(());
        }
        let Some(metric_reading) = metric_reading_from(reading) else {
            debug!(entry_id, "entry lacks sensor values; not recorded");
            self.recorded()?.insert(entry_id);
            return Ok(());
        };
        let metric = self.backend.record_metric(metric_reading).await?;
        self.recorded()?.insert(entry_id);
        info!(entry_id, metric_id = %metric.id(), "vendor entry recorded");
        Ok(())
    }
}

/// Convert a vendor reading into a storable metric, classifying the raw
/// air-quality index.
fn metric_reading_from(reading: &TelemetryReading) -> Option<MetricReading> {
    let air_quality = AirQuality::classify(reading.air_quality?);
    MetricReading::new(reading.temperature?, reading.humidity?, air_quality).ok()
}

#[async_trait]
impl<B> Refresh for LiveRefresh<B>
where
    B: DashboardBackend + 'static,
{
    async fn refresh(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let snapshot = self.backend.latest_telemetry().await?;
        if self.record {
            self.record_if_new(&snapshot.reading).await?;
        }
        let history = self.backend.metric_history().await?;
        self.view.send_replace(DashboardView {
            live: Some(snapshot),
            history,
        });
        Ok(())
    }
}
