//! ThingSpeak outbound adapter.
//!
//! A thin HTTP implementation of the `TelemetrySource` port for the band's
//! ThingSpeak channel. Field mapping: `field1` air quality, `field2`
//! temperature, `field3` humidity, `field4` buzzer.

mod dto;
mod http_source;

pub use http_source::{
    DEFAULT_THINGSPEAK_BASE_URL, DEFAULT_THINGSPEAK_TIMEOUT, ThingSpeakChannel,
    ThingSpeakHttpSource,
};
