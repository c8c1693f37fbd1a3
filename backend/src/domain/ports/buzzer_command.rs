//! Driving port for the "find my band" buzzer.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{BuzzerState, Error};

/// Outcome of a buzzer activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuzzerActivation {
    pub buzzer: BuzzerState,
    /// Delay before the buzzer is switched off again.
    pub resets_after_seconds: u64,
}

impl BuzzerActivation {
    pub fn on_for(reset_after: Duration) -> Self {
        Self {
            buzzer: BuzzerState::On,
            resets_after_seconds: reset_after.as_secs(),
        }
    }
}

/// Domain use-case port that sounds the band's buzzer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BuzzerCommand: Send + Sync {
    /// Switch the buzzer on and schedule it to switch off again.
    async fn find_band(&self) -> Result<BuzzerActivation, Error>;
}
