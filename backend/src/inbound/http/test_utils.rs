//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockable::DefaultClock;

use crate::domain::ports::FixtureTelemetrySource;
use crate::domain::{MetricsService, TelemetryService, UserId};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryMetricRepository;
use crate::outbound::token::JwtAccessTokens;

/// Secret shared by [`fixture_state`] and [`mint_token`].
pub const TEST_SECRET: &[u8] = b"ecoband-test-secret-0123456789abcdef";

/// A different secret, for tokens the fixture state must refuse.
pub const OTHER_SECRET: &[u8] = b"some-other-secret-0123456789abcdefgh";

pub fn test_tokens() -> JwtAccessTokens {
    JwtAccessTokens::new(TEST_SECRET)
}

/// State backed by an in-memory metric store and an empty vendor channel.
pub fn fixture_state() -> HttpState {
    HttpState::new(
        Arc::new(MetricsService::new(
            Arc::new(InMemoryMetricRepository::new()),
            Arc::new(DefaultClock),
        )),
        Arc::new(TelemetryService::new(Arc::new(FixtureTelemetrySource))),
        Arc::new(test_tokens()),
    )
}

pub fn mint_token(user_id: &UserId) -> String {
    test_tokens().issue(user_id).expect("token minted")
}

/// Token whose `exp` lies an hour in the past.
pub fn mint_expired_token(user_id: &UserId) -> String {
    test_tokens()
        .issue_at(
            user_id,
            Utc::now() - Duration::hours(2),
            Some(Duration::hours(1)),
        )
        .expect("token minted")
}

/// Format an `Authorization` header value.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
