//! Server settings loaded via OrthoConfig.
//!
//! Every field can come from a CLI flag or an `ECOBAND_`-prefixed
//! environment variable. Absent values fall back to the defaults below.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::DEFAULT_BUZZER_RESET;
use crate::outbound::thingspeak::{
    DEFAULT_THINGSPEAK_BASE_URL, DEFAULT_THINGSPEAK_TIMEOUT, ThingSpeakChannel,
};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid host '{value}': {source}")]
    InvalidHost {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid ThingSpeak base URL '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Configuration for the HTTP server and its adapters.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ECOBAND")]
pub struct ServerSettings {
    /// Interface to bind; defaults to all interfaces.
    pub host: Option<String>,
    /// Port to bind; defaults to 3000.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without it metrics live in process memory.
    pub database_url: Option<String>,
    /// ThingSpeak channel holding the band's feed.
    pub thingspeak_channel_id: Option<String>,
    pub thingspeak_read_key: Option<String>,
    /// Required for the buzzer; without it the route answers 503.
    pub thingspeak_write_key: Option<String>,
    pub thingspeak_base_url: Option<String>,
    pub thingspeak_timeout_secs: Option<u64>,
    /// Delay before the buzzer is switched off again.
    pub buzzer_reset_secs: Option<u64>,
}

impl ServerSettings {
    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidHost`] when `host` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.parse().map_err(|source| SettingsError::InvalidHost {
            value: host.to_owned(),
            source,
        })?;
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    pub fn thingspeak_timeout(&self) -> Duration {
        self.thingspeak_timeout_secs
            .map_or(DEFAULT_THINGSPEAK_TIMEOUT, Duration::from_secs)
    }

    pub fn buzzer_reset(&self) -> Duration {
        self.buzzer_reset_secs
            .map_or(DEFAULT_BUZZER_RESET, Duration::from_secs)
    }

    /// Channel coordinates, or `None` when no channel id is configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] for an unparsable base URL.
    pub fn thingspeak_channel(&self) -> Result<Option<ThingSpeakChannel>, SettingsError> {
        let Some(channel_id) = non_empty(self.thingspeak_channel_id.as_deref()) else {
            return Ok(None);
        };
        let raw_url = self
            .thingspeak_base_url
            .as_deref()
            .unwrap_or(DEFAULT_THINGSPEAK_BASE_URL);
        let base_url = Url::parse(raw_url).map_err(|source| SettingsError::InvalidBaseUrl {
            value: raw_url.to_owned(),
            source,
        })?;
        Ok(Some(ThingSpeakChannel {
            base_url,
            channel_id: channel_id.to_owned(),
            read_key: non_empty(self.thingspeak_read_key.as_deref()).map(str::to_owned),
            write_key: non_empty(self.thingspeak_write_key.as_deref()).map(str::to_owned),
        }))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
