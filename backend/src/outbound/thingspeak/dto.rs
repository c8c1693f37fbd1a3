//! DTOs for decoding ThingSpeak channel feeds.
//!
//! ThingSpeak publishes every field as a string (occasionally a bare number
//! on older channels). The adapter decodes into these DTOs and converts to
//! domain readings in one pass.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{BuzzerState, TelemetryReading, parse_sensor_field};

/// Body returned by `feeds/last.json` on a channel with no entries.
pub(super) const EMPTY_CHANNEL_BODY: &str = "-1";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum FieldDto {
    Text(String),
    Number(serde_json::Number),
}

impl FieldDto {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct FeedEntryDto {
    pub(super) created_at: Option<DateTime<Utc>>,
    pub(super) entry_id: Option<u64>,
    /// Raw air-quality index.
    pub(super) field1: Option<FieldDto>,
    /// Temperature in °C.
    pub(super) field2: Option<FieldDto>,
    /// Relative humidity in %.
    pub(super) field3: Option<FieldDto>,
    /// Buzzer flag, `"1"` when sounding.
    pub(super) field4: Option<FieldDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FeedDto {
    #[serde(default)]
    pub(super) feeds: Vec<FeedEntryDto>,
}

impl FeedEntryDto {
    pub(super) fn into_domain(self) -> TelemetryReading {
        let air_quality = self.field1.map(FieldDto::into_text);
        let temperature = self.field2.map(FieldDto::into_text);
        let humidity = self.field3.map(FieldDto::into_text);
        let buzzer = self.field4.map(FieldDto::into_text);
        TelemetryReading {
            entry_id: self.entry_id,
            recorded_at: self.created_at,
            air_quality: parse_sensor_field(air_quality.as_deref()),
            temperature: parse_sensor_field(temperature.as_deref()),
            humidity: parse_sensor_field(humidity.as_deref()),
            buzzer: BuzzerState::from_field(buzzer.as_deref()),
        }
    }
}

impl FeedDto {
    pub(super) fn into_domain(self) -> Vec<TelemetryReading> {
        self.feeds.into_iter().map(FeedEntryDto::into_domain).collect()
    }
}
