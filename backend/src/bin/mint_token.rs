//! Mint a bearer token for local testing.
//!
//! Uses the same `JWT_SECRET` resolution as the server, so a token minted
//! here is accepted by a server started in the same environment.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use chrono::{Duration, Utc};
use clap::Parser;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;

use ecoband::domain::UserId;
use ecoband::inbound::http::auth_config::{BuildMode, auth_settings_from_env};
use ecoband::outbound::token::DEFAULT_TOKEN_TTL_HOURS;

/// `mint-token` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mint-token",
    about = "Mint an HS256 bearer token for the Ecoband API",
    version
)]
struct CliArgs {
    /// Subject identity. A random UUID is used when omitted.
    #[arg(long = "user-id", value_name = "id")]
    user_id: Option<String>,
    /// Token lifetime in hours; `0` mints a token without expiry.
    #[arg(long = "ttl-hours", value_name = "hours", default_value_t = DEFAULT_TOKEN_TTL_HOURS.unsigned_abs())]
    ttl_hours: u64,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();

    let user_id = match args.user_id.as_deref() {
        Some(raw) => UserId::new(raw).wrap_err("invalid --user-id")?,
        None => UserId::random(),
    };
    let ttl = token_ttl(args.ttl_hours)?;

    let auth = auth_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid token configuration")?;
    let token = auth
        .tokens
        .issue_at(&user_id, Utc::now(), ttl)
        .wrap_err("failed to mint token")?;

    eprintln!("userId={user_id} secret={}", auth.fingerprint);
    println!("{token}");
    Ok(())
}

fn token_ttl(hours: u64) -> Result<Option<Duration>> {
    if hours == 0 {
        return Ok(None);
    }
    let hours = i64::try_from(hours).wrap_err("--ttl-hours out of range")?;
    Duration::try_hours(hours)
        .map(Some)
        .ok_or_else(|| color_eyre::eyre::eyre!("--ttl-hours out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn zero_ttl_omits_expiry() {
        assert_eq!(token_ttl(0).expect("ttl"), None);
    }

    #[rstest]
    #[case(1)]
    #[case(24)]
    fn positive_ttl_is_hours(#[case] hours: u64) {
        let expected = Duration::hours(i64::try_from(hours).expect("small"));
        assert_eq!(token_ttl(hours).expect("ttl"), Some(expected));
    }

    #[test]
    fn huge_ttl_is_rejected() {
        assert!(token_ttl(u64::MAX).is_err());
    }

    #[test]
    fn parses_flags() {
        let args = CliArgs::try_parse_from(["mint-token", "--user-id", "device-7", "--ttl-hours", "0"])
            .expect("valid flags");
        assert_eq!(args.user_id.as_deref(), Some("device-7"));
        assert_eq!(args.ttl_hours, 0);
    }
}
