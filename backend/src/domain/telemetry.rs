//! Live telemetry read from the band's vendor channel.
//!
//! The vendor publishes every field as an optional string. Readings keep each
//! sensor value as `Option<f64>` so that absent or non-numeric fields surface
//! as `null` to clients, while the green score treats them as zero.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GreenScore, ScoreInputs};

/// Default look-back window for feed history, in days.
pub const DEFAULT_FEED_DAYS: u32 = 7;
/// Largest look-back window accepted for feed history, in days.
pub const MAX_FEED_DAYS: u32 = 31;

/// Buzzer state as encoded in the vendor's `field4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuzzerState {
    On,
    #[default]
    Off,
}

impl BuzzerState {
    /// Decode the vendor field; only the exact value `"1"` means on.
    pub fn from_field(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("1") => Self::On,
            _ => Self::Off,
        }
    }

    /// Vendor field value written by an update.
    pub fn as_field(self) -> &'static str {
        match self {
            Self::On => "1",
            Self::Off => "0",
        }
    }
}

impl fmt::Display for BuzzerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::On => "on",
            Self::Off => "off",
        })
    }
}

/// Parse a vendor sensor field into a finite number.
///
/// Leading whitespace is skipped and the longest decimal prefix is read, so
/// a unit suffix such as `"23.4C"` still yields `23.4`. Fields without a
/// leading number, and non-finite values, are `None`.
///
/// # Examples
/// ```
/// use ecoband::domain::parse_sensor_field;
///
/// assert_eq!(parse_sensor_field(Some(" 41.5 ")), Some(41.5));
/// assert_eq!(parse_sensor_field(Some("23.4C")), Some(23.4));
/// assert_eq!(parse_sensor_field(Some("n/a")), None);
/// assert_eq!(parse_sensor_field(None), None);
/// ```
pub fn parse_sensor_field(raw: Option<&str>) -> Option<f64> {
    raw.map(|value| numeric_prefix(value.trim_start()))
        .filter(|prefix| !prefix.is_empty())
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Longest prefix of `input` shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(input: &str) -> &str {
    let bytes = input.as_bytes();
    let digits_from = |mut at: usize| {
        while bytes.get(at).is_some_and(u8::is_ascii_digit) {
            at += 1;
        }
        at
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return "";
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    &input[..end]
}

/// One vendor feed entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryReading {
    /// Vendor's monotonically increasing entry number.
    pub entry_id: Option<u64>,
    pub recorded_at: Option<DateTime<Utc>>,
    pub air_quality: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub buzzer: BuzzerState,
}

impl TelemetryReading {
    /// Score inputs with missing values coerced to zero.
    pub fn score_inputs(&self) -> ScoreInputs {
        ScoreInputs {
            air_quality: self.air_quality.unwrap_or_default(),
            temperature: self.temperature.unwrap_or_default(),
            humidity: self.humidity.unwrap_or_default(),
        }
    }

    pub fn green_score(&self) -> GreenScore {
        GreenScore::compute(self.score_inputs())
    }
}

/// A reading paired with its derived green score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    #[serde(flatten)]
    pub reading: TelemetryReading,
    pub green_score: GreenScore,
}

impl From<TelemetryReading> for TelemetrySnapshot {
    fn from(reading: TelemetryReading) -> Self {
        let green_score = reading.green_score();
        Self {
            reading,
            green_score,
        }
    }
}

/// Validation errors for [`FeedWindow`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedWindowError {
    #[error("days must be between 1 and {max}, got {days}", max = MAX_FEED_DAYS)]
    OutOfRange { days: u32 },
}

/// Number of days of feed history to fetch, in `1..=31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedWindow(u32);

impl FeedWindow {
    pub fn new(days: u32) -> Result<Self, FeedWindowError> {
        if (1..=MAX_FEED_DAYS).contains(&days) {
            Ok(Self(days))
        } else {
            Err(FeedWindowError::OutOfRange { days })
        }
    }

    pub fn days(self) -> u32 {
        self.0
    }
}

impl Default for FeedWindow {
    fn default() -> Self {
        Self(DEFAULT_FEED_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Some("1"), BuzzerState::On)]
    #[case(Some(" 1 "), BuzzerState::On)]
    #[case(Some("0"), BuzzerState::Off)]
    #[case(Some("yes"), BuzzerState::Off)]
    #[case(None, BuzzerState::Off)]
    fn buzzer_field_only_recognises_one(#[case] raw: Option<&str>, #[case] expected: BuzzerState) {
        assert_eq!(BuzzerState::from_field(raw), expected);
    }

    #[rstest]
    #[case(Some("12"), Some(12.0))]
    #[case(Some("-3.5"), Some(-3.5))]
    #[case(Some("23.4C"), Some(23.4))]
    #[case(Some("  55 %"), Some(55.0))]
    #[case(Some(".5"), Some(0.5))]
    #[case(Some("7."), Some(7.0))]
    #[case(Some("1e2ppm"), Some(100.0))]
    #[case(Some("4e"), Some(4.0))]
    #[case(Some("12.3.4"), Some(12.3))]
    #[case(Some(""), None)]
    #[case(Some("-"), None)]
    #[case(Some("."), None)]
    #[case(Some("C23"), None)]
    #[case(Some("NaN"), None)]
    #[case(Some("inf"), None)]
    #[case(Some("1e999"), None)]
    fn sensor_fields_parse_their_numeric_prefix(
        #[case] raw: Option<&str>,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(parse_sensor_field(raw), expected);
    }

    #[rstest]
    fn missing_fields_score_as_zero() {
        let reading = TelemetryReading {
            air_quality: None,
            temperature: Some(22.0),
            humidity: Some(50.0),
            ..TelemetryReading::default()
        };
        assert_eq!(reading.green_score().value(), 60);
    }

    #[rstest]
    fn snapshot_flattens_reading() {
        let snapshot = TelemetrySnapshot::from(TelemetryReading {
            entry_id: Some(42),
            recorded_at: None,
            air_quality: Some(0.0),
            temperature: Some(22.0),
            humidity: Some(50.0),
            buzzer: BuzzerState::On,
        });

        let value = serde_json::to_value(&snapshot).expect("serialise");
        assert_eq!(
            value,
            json!({
                "entryId": 42,
                "recordedAt": null,
                "airQuality": 0.0,
                "temperature": 22.0,
                "humidity": 50.0,
                "buzzer": "on",
                "greenScore": 100,
            })
        );
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(31, true)]
    #[case(32, false)]
    fn feed_window_bounds(#[case] days: u32, #[case] valid: bool) {
        assert_eq!(FeedWindow::new(days).is_ok(), valid);
    }

    #[rstest]
    fn feed_window_defaults_to_a_week() {
        assert_eq!(FeedWindow::default().days(), DEFAULT_FEED_DAYS);
    }
}
