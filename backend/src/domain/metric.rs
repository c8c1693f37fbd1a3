//! Metric snapshots recorded against a user.
//!
//! A [`Metric`] is append-only: once created it is never updated or deleted.
//! Readings carry no range validation; physically implausible values (for
//! example negative humidity) are stored as submitted. Only non-finite
//! numbers are refused because they cannot round-trip through JSON.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Maximum number of metrics returned by a history query.
pub const METRIC_HISTORY_LIMIT: usize = 10;

/// Upper bound (inclusive) of the raw air-quality index classed as good.
const GOOD_AIR_QUALITY_MAX: f64 = 50.0;
/// Upper bound (inclusive) of the raw air-quality index classed as moderate.
const MODERATE_AIR_QUALITY_MAX: f64 = 100.0;

/// Categorical air-quality rating stored with each metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirQuality {
    Good,
    Moderate,
    Poor,
}

impl AirQuality {
    /// Stable string form used in JSON and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
        }
    }

    /// Classify a raw air-quality index using AQI breakpoints.
    ///
    /// # Examples
    /// ```
    /// use ecoband::domain::AirQuality;
    ///
    /// assert_eq!(AirQuality::classify(12.0), AirQuality::Good);
    /// assert_eq!(AirQuality::classify(75.0), AirQuality::Moderate);
    /// assert_eq!(AirQuality::classify(180.0), AirQuality::Poor);
    /// ```
    pub fn classify(raw_index: f64) -> Self {
        if !raw_index.is_finite() {
            return Self::Poor;
        }
        if raw_index <= GOOD_AIR_QUALITY_MAX {
            Self::Good
        } else if raw_index <= MODERATE_AIR_QUALITY_MAX {
            Self::Moderate
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for AirQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown air-quality label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("air quality must be one of Good, Moderate, Poor; got '{0}'")]
pub struct ParseAirQualityError(String);

impl FromStr for AirQuality {
    type Err = ParseAirQualityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Good" => Ok(Self::Good),
            "Moderate" => Ok(Self::Moderate),
            "Poor" => Ok(Self::Poor),
            other => Err(ParseAirQualityError(other.to_owned())),
        }
    }
}

/// Validation errors raised when building metric readings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricValidationError {
    /// A numeric field was NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
}

/// The caller-supplied part of a metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricReading {
    temperature: f64,
    humidity: f64,
    air_quality: AirQuality,
}

impl MetricReading {
    /// Validate and construct a reading.
    pub fn new(
        temperature: f64,
        humidity: f64,
        air_quality: AirQuality,
    ) -> Result<Self, MetricValidationError> {
        ensure_finite(temperature, "temperature")?;
        ensure_finite(humidity, "humidity")?;
        Ok(Self {
            temperature,
            humidity,
            air_quality,
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    pub fn air_quality(&self) -> AirQuality {
        self.air_quality
    }
}

fn ensure_finite(value: f64, field: &'static str) -> Result<(), MetricValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MetricValidationError::NonFinite { field })
    }
}

/// One persisted sensor snapshot owned by exactly one user.
///
/// Serialises as
/// `{"id","userId","temperature","humidity","airQuality","timestamp"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MetricDto", into = "MetricDto")]
pub struct Metric {
    id: Uuid,
    user_id: UserId,
    reading: MetricReading,
    timestamp: DateTime<Utc>,
}

/// Fractional-second digits kept on metric timestamps; PostgreSQL
/// `timestamptz` stores microseconds.
const TIMESTAMP_SUBSEC_DIGITS: u16 = 6;

impl Metric {
    /// Create a new metric with a fresh identifier.
    ///
    /// The timestamp is truncated to microseconds so the record returned to
    /// the caller matches what every store reads back.
    pub fn record(user_id: UserId, reading: MetricReading, timestamp: DateTime<Utc>) -> Self {
        Self::from_parts(
            Uuid::new_v4(),
            user_id,
            reading,
            timestamp.trunc_subsecs(TIMESTAMP_SUBSEC_DIGITS),
        )
    }

    /// Rebuild a metric from stored parts.
    pub fn from_parts(
        id: Uuid,
        user_id: UserId,
        reading: MetricReading,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            reading,
            timestamp,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn reading(&self) -> &MetricReading {
        &self.reading
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Ordering key used by every read path: newest first, id breaks ties.
    pub fn recency_key(&self) -> (DateTime<Utc>, Uuid) {
        (self.timestamp, self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricDto {
    id: Uuid,
    user_id: UserId,
    temperature: f64,
    humidity: f64,
    air_quality: AirQuality,
    timestamp: DateTime<Utc>,
}

impl From<Metric> for MetricDto {
    fn from(value: Metric) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            temperature: value.reading.temperature,
            humidity: value.reading.humidity,
            air_quality: value.reading.air_quality,
            timestamp: value.timestamp,
        }
    }
}

impl TryFrom<MetricDto> for Metric {
    type Error = MetricValidationError;

    fn try_from(value: MetricDto) -> Result<Self, Self::Error> {
        let reading = MetricReading::new(value.temperature, value.humidity, value.air_quality)?;
        Ok(Self::from_parts(
            value.id,
            value.user_id,
            reading,
            value.timestamp,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(f64::NAN, 50.0, "temperature")]
    #[case(21.0, f64::INFINITY, "humidity")]
    fn reading_rejects_non_finite_values(
        #[case] temperature: f64,
        #[case] humidity: f64,
        #[case] field: &'static str,
    ) {
        let result = MetricReading::new(temperature, humidity, AirQuality::Good);
        assert_eq!(result, Err(MetricValidationError::NonFinite { field }));
    }

    #[rstest]
    fn reading_accepts_implausible_values() {
        let reading = MetricReading::new(-273.0, -5.0, AirQuality::Poor).expect("accepted as-is");
        assert_eq!(reading.humidity(), -5.0);
    }

    #[rstest]
    #[case("Good", Some(AirQuality::Good))]
    #[case("Moderate", Some(AirQuality::Moderate))]
    #[case("Poor", Some(AirQuality::Poor))]
    #[case("good", None)]
    #[case("Excellent", None)]
    fn air_quality_parses_exact_labels(#[case] raw: &str, #[case] expected: Option<AirQuality>) {
        assert_eq!(raw.parse::<AirQuality>().ok(), expected);
    }

    #[rstest]
    #[case(0.0, AirQuality::Good)]
    #[case(50.0, AirQuality::Good)]
    #[case(50.5, AirQuality::Moderate)]
    #[case(100.0, AirQuality::Moderate)]
    #[case(100.1, AirQuality::Poor)]
    #[case(f64::NAN, AirQuality::Poor)]
    fn classify_uses_aqi_breakpoints(#[case] raw: f64, #[case] expected: AirQuality) {
        assert_eq!(AirQuality::classify(raw), expected);
    }

    #[rstest]
    fn metric_serialises_camel_case() {
        let user_id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("user id");
        let timestamp = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("timestamp");
        let reading = MetricReading::new(22.5, 48.0, AirQuality::Moderate).expect("reading");
        let metric = Metric::from_parts(Uuid::nil(), user_id, reading, timestamp);

        let value = serde_json::to_value(&metric).expect("serialise");
        assert_eq!(
            value,
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "userId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "temperature": 22.5,
                "humidity": 48.0,
                "airQuality": "Moderate",
                "timestamp": "2026-03-01T12:00:00Z",
            })
        );

        let decoded: Metric = serde_json::from_value(value).expect("deserialise");
        assert_eq!(decoded, metric);
    }
}
