//! Text rendering of the dashboard.

use std::fmt;

use crate::domain::{Metric, TelemetrySnapshot};

const MISSING: &str = "--";

/// What the dashboard currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub live: Option<TelemetrySnapshot>,
    /// Stored metrics, newest first.
    pub history: Vec<Metric>,
}

fn value_or_missing(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| MISSING.to_owned(), |v| format!("{v}{unit}"))
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.live {
            Some(snapshot) => {
                let reading = &snapshot.reading;
                writeln!(f, "Green score   {}", snapshot.green_score)?;
                writeln!(f, "Air quality   {}", value_or_missing(reading.air_quality, ""))?;
                writeln!(f, "Temperature   {}", value_or_missing(reading.temperature, " °C"))?;
                writeln!(f, "Humidity      {}", value_or_missing(reading.humidity, " %"))?;
                writeln!(f, "Buzzer        {}", reading.buzzer.to_string().to_uppercase())?;
            }
            None => writeln!(f, "Waiting for the first reading...")?,
        }

        if self.history.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "Recent metrics")?;
        for metric in &self.history {
            let reading = metric.reading();
            writeln!(
                f,
                "  {}  {:>6.1} °C  {:>5.1} %  {}",
                metric.timestamp().format("%Y-%m-%d %H:%M:%S"),
                reading.temperature(),
                reading.humidity(),
                reading.air_quality()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AirQuality, BuzzerState, MetricReading, TelemetryReading, UserId};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn empty_view_waits_for_reading() {
        let rendered = DashboardView::default().to_string();
        assert_eq!(rendered, "Waiting for the first reading...\n");
    }

    #[test]
    fn missing_fields_render_as_placeholder() {
        let view = DashboardView {
            live: Some(TelemetrySnapshot::from(TelemetryReading {
                air_quality: Some(12.0),
                buzzer: BuzzerState::On,
                ..TelemetryReading::default()
            })),
            history: Vec::new(),
        };
        let rendered = view.to_string();
        assert!(rendered.contains("Air quality   12\n"));
        assert!(rendered.contains("Temperature   --\n"));
        assert!(rendered.contains("Buzzer        ON\n"));
    }

    #[test]
    fn history_rows_follow_live_block() {
        let timestamp = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
            .single()
            .expect("timestamp");
        let reading = MetricReading::new(22.25, 48.0, AirQuality::Good).expect("reading");
        let view = DashboardView {
            live: None,
            history: vec![Metric::from_parts(
                Uuid::new_v4(),
                UserId::random(),
                reading,
                timestamp,
            )],
        };
        let rendered = view.to_string();
        assert!(rendered.contains("Recent metrics\n"));
        assert!(rendered.contains("2026-03-01 09:30:00"));
        assert!(rendered.contains("Good"));
    }
}
