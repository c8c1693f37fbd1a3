//! Reqwest-backed ThingSpeak telemetry adapter.
//!
//! Owns transport details only: URL construction with the channel's API
//! keys, an explicit request timeout, HTTP status mapping and JSON decoding
//! into domain readings. Keys never leave this adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::dto::{EMPTY_CHANNEL_BODY, FeedDto, FeedEntryDto};
use crate::domain::ports::{TelemetrySource, TelemetrySourceError};
use crate::domain::{BuzzerState, FeedWindow, TelemetryReading};

/// Public ThingSpeak API root.
pub const DEFAULT_THINGSPEAK_BASE_URL: &str = "https://api.thingspeak.com";
/// Default per-request timeout for vendor calls.
pub const DEFAULT_THINGSPEAK_TIMEOUT: Duration = Duration::from_secs(10);

/// Reply from `update` when the vendor refuses to store the entry.
const UPDATE_REFUSED_BODY: &str = "0";

/// Channel coordinates and credentials.
#[derive(Debug, Clone)]
pub struct ThingSpeakChannel {
    pub base_url: Url,
    pub channel_id: String,
    pub read_key: Option<String>,
    pub write_key: Option<String>,
}

/// ThingSpeak source adapter.
pub struct ThingSpeakHttpSource {
    client: Client,
    channel: ThingSpeakChannel,
}

impl ThingSpeakHttpSource {
    /// Build an adapter using a reqwest client with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(channel: ThingSpeakChannel, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, channel })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, TelemetrySourceError> {
        let mut url = self.channel.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TelemetrySourceError::not_configured("base URL cannot hold a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn feed_endpoint(&self, leaf: &str) -> Result<Url, TelemetrySourceError> {
        let channel_id = self.channel.channel_id.as_str();
        let mut url = self.endpoint(&["channels", channel_id, "feeds", leaf])?;
        if let Some(key) = &self.channel.read_key {
            url.query_pairs_mut().append_pair("api_key", key);
        }
        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<String, TelemetrySourceError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        ensure_success(status)?;
        Ok(body)
    }
}

#[async_trait]
impl TelemetrySource for ThingSpeakHttpSource {
    async fn latest_reading(&self) -> Result<Option<TelemetryReading>, TelemetrySourceError> {
        let body = self.get_text(self.feed_endpoint("last.json")?).await?;
        parse_last_entry(&body)
    }

    async fn feed(
        &self,
        window: FeedWindow,
    ) -> Result<Vec<TelemetryReading>, TelemetrySourceError> {
        let mut url = self.feed_endpoint("feeds.json")?;
        url.query_pairs_mut()
            .append_pair("days", &window.days().to_string());
        let body = self.get_text(url).await?;
        parse_feed(&body)
    }

    async fn set_buzzer(&self, state: BuzzerState) -> Result<u64, TelemetrySourceError> {
        let write_key = self
            .channel
            .write_key
            .as_deref()
            .ok_or_else(|| TelemetrySourceError::not_configured("no write key configured"))?;
        let mut url = self.endpoint(&["update"])?;
        url.query_pairs_mut()
            .append_pair("api_key", write_key)
            .append_pair("field4", state.as_field());

        let body = self.get_text(url).await?;
        let entry_id = parse_update_reply(&body)?;
        debug!(entry_id, buzzer = %state, "telemetry channel updated");
        Ok(entry_id)
    }
}

fn parse_last_entry(body: &str) -> Result<Option<TelemetryReading>, TelemetrySourceError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == EMPTY_CHANNEL_BODY {
        return Ok(None);
    }
    let entry: FeedEntryDto = serde_json::from_str(trimmed).map_err(|error| {
        TelemetrySourceError::decode(format!("invalid last-entry payload: {error}"))
    })?;
    Ok(Some(entry.into_domain()))
}

fn parse_feed(body: &str) -> Result<Vec<TelemetryReading>, TelemetrySourceError> {
    let trimmed = body.trim();
    if trimmed == EMPTY_CHANNEL_BODY {
        return Ok(Vec::new());
    }
    let feed: FeedDto = serde_json::from_str(trimmed)
        .map_err(|error| TelemetrySourceError::decode(format!("invalid feed payload: {error}")))?;
    Ok(feed.into_domain())
}

fn parse_update_reply(body: &str) -> Result<u64, TelemetrySourceError> {
    let trimmed = body.trim();
    if trimmed == UPDATE_REFUSED_BODY {
        return Err(TelemetrySourceError::rejected(
            "vendor refused the update, likely inside the 15 second rate limit",
        ));
    }
    trimmed.parse::<u64>().map_err(|_| {
        TelemetrySourceError::decode(format!("unexpected update reply: {trimmed:?}"))
    })
}

fn ensure_success(status: StatusCode) -> Result<(), TelemetrySourceError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(TelemetrySourceError::status(status.as_u16()))
    }
}

fn map_transport_error(error: reqwest::Error) -> TelemetrySourceError {
    if error.is_timeout() {
        TelemetrySourceError::transport(format!("request timed out: {error}"))
    } else {
        TelemetrySourceError::transport(error.to_string())
    }
}
