//! Reqwest client for the backend API, used by the terminal dashboard.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::ports::BuzzerActivation;
use crate::domain::{AirQuality, Metric, MetricReading, TelemetrySnapshot};

/// Default per-request timeout for backend calls.
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("backend base URL cannot hold a path")]
    InvalidBaseUrl,
    #[error("backend request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("backend answered {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("backend payload undecodable: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Backend operations the dashboard depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardBackend: Send + Sync {
    async fn latest_telemetry(&self) -> Result<TelemetrySnapshot, ClientError>;

    async fn metric_history(&self) -> Result<Vec<Metric>, ClientError>;

    async fn record_metric(&self, reading: MetricReading) -> Result<Metric, ClientError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordMetricBody {
    temperature: f64,
    humidity: f64,
    air_quality: AirQuality,
}

impl From<MetricReading> for RecordMetricBody {
    fn from(reading: MetricReading) -> Self {
        Self {
            temperature: reading.temperature(),
            humidity: reading.humidity(),
            air_quality: reading.air_quality(),
        }
    }
}

/// Bearer-authenticated HTTP client for one backend.
pub struct BackendClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl BackendClient {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, token: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl)?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("Bearer {}", self.token))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self
            .authorised(request)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<crate::domain::Error>()
                .await
                .map(|err| err.message().to_owned())
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Status { status, message });
        }
        response.json::<T>().await.map_err(ClientError::Decode)
    }

    /// Sound the band's buzzer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails or is refused.
    pub async fn find_band(&self) -> Result<BuzzerActivation, ClientError> {
        let url = self.endpoint(&["telemetry", "buzzer"])?;
        self.send_json(self.client.post(url)).await
    }
}

#[async_trait]
impl DashboardBackend for BackendClient {
    async fn latest_telemetry(&self) -> Result<TelemetrySnapshot, ClientError> {
        let url = self.endpoint(&["telemetry", "latest"])?;
        self.send_json(self.client.get(url)).await
    }

    async fn metric_history(&self) -> Result<Vec<Metric>, ClientError> {
        let url = self.endpoint(&["metrics", "history"])?;
        self.send_json(self.client.get(url)).await
    }

    async fn record_metric(&self, reading: MetricReading) -> Result<Metric, ClientError> {
        let url = self.endpoint(&["metrics"])?;
        let body = RecordMetricBody::from(reading);
        self.send_json(self.client.post(url).json(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(
            Url::parse(base).expect("base url"),
            "token".to_owned(),
            DEFAULT_CLIENT_TIMEOUT,
        )
        .expect("client")
    }

    #[rstest]
    #[case("http://localhost:3000", &["metrics", "history"], "http://localhost:3000/api/metrics/history")]
    #[case("http://localhost:3000/", &["telemetry", "latest"], "http://localhost:3000/api/telemetry/latest")]
    #[case("https://eco.example/backend/", &["metrics"], "https://eco.example/backend/api/metrics")]
    fn endpoint_appends_api_prefix(
        #[case] base: &str,
        #[case] segments: &[&str],
        #[case] expected: &str,
    ) {
        let url = client(base).endpoint(segments).expect("endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn record_body_uses_wire_names() {
        let reading = MetricReading::new(21.0, 44.0, AirQuality::Moderate).expect("reading");
        let json = serde_json::to_value(RecordMetricBody::from(reading)).expect("json");
        assert_eq!(
            json,
            serde_json::json!({ "temperature": 21.0, "humidity": 44.0, "airQuality": "Moderate" })
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let client = BackendClient::new(
            Url::parse("http://127.0.0.1:9").expect("base url"),
            "token".to_owned(),
            Duration::from_millis(200),
        )
        .expect("client");

        let err = client.latest_telemetry().await.expect_err("no backend");
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
