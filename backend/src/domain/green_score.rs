//! Green score: a 0–100 composite of air quality, temperature and humidity.
//!
//! Each input contributes a sub-score in `[0, 100]` (air quality can exceed
//! 100 for negative raw indices); the weighted sum is rounded half-to-even and
//! clamped to `[0, 100]`. Non-finite inputs are treated as zero, matching the
//! parse-failure-as-zero policy applied to raw vendor fields.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

const AIR_QUALITY_WEIGHT: f64 = 0.4;
const TEMPERATURE_WEIGHT: f64 = 0.3;
const HUMIDITY_WEIGHT: f64 = 0.3;

const COMFORT_TEMPERATURE: RangeInclusive<f64> = 20.0..=25.0;
const COMFORT_HUMIDITY: RangeInclusive<f64> = 40.0..=60.0;
const TEMPERATURE_PENALTY_PER_UNIT: f64 = 5.0;
const HUMIDITY_PENALTY_PER_UNIT: f64 = 2.5;

const MAX_SCORE: f64 = 100.0;

/// Raw sensor values feeding the score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreInputs {
    pub air_quality: f64,
    pub temperature: f64,
    pub humidity: f64,
}

/// Bounded composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GreenScore(u8);

impl GreenScore {
    /// Compute the score for the given inputs.
    ///
    /// # Examples
    /// ```
    /// use ecoband::domain::{GreenScore, ScoreInputs};
    ///
    /// let ideal = ScoreInputs { air_quality: 0.0, temperature: 22.0, humidity: 50.0 };
    /// assert_eq!(GreenScore::compute(ideal).value(), 100);
    ///
    /// let smoky = ScoreInputs { air_quality: 100.0, ..ideal };
    /// assert_eq!(GreenScore::compute(smoky).value(), 60);
    /// ```
    pub fn compute(inputs: ScoreInputs) -> Self {
        let air_quality = air_quality_score(zero_if_non_finite(inputs.air_quality));
        let temperature = comfort_band_score(
            zero_if_non_finite(inputs.temperature),
            &COMFORT_TEMPERATURE,
            TEMPERATURE_PENALTY_PER_UNIT,
        );
        let humidity = comfort_band_score(
            zero_if_non_finite(inputs.humidity),
            &COMFORT_HUMIDITY,
            HUMIDITY_PENALTY_PER_UNIT,
        );

        let weighted = air_quality * AIR_QUALITY_WEIGHT
            + temperature * TEMPERATURE_WEIGHT
            + humidity * HUMIDITY_WEIGHT;
        let bounded = weighted.round_ties_even().clamp(0.0, MAX_SCORE);
        // `bounded` is an integral value in [0, 100].
        Self(bounded as u8)
    }

    /// The score as an integer in `[0, 100]`.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for GreenScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn zero_if_non_finite(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn air_quality_score(raw: f64) -> f64 {
    (MAX_SCORE - raw).max(0.0)
}

fn comfort_band_score(raw: f64, band: &RangeInclusive<f64>, penalty_per_unit: f64) -> f64 {
    let distance = if raw < *band.start() {
        band.start() - raw
    } else if raw > *band.end() {
        raw - band.end()
    } else {
        0.0
    };
    (MAX_SCORE - distance * penalty_per_unit).max(0.0)
}
