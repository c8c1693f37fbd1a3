//! Bearer token secret configuration.
//!
//! The HS256 secret is read from `JWT_SECRET`. Debug builds fall back to a
//! fixed development secret so local runs need no setup; release builds
//! refuse to start without a secret of at least [`JWT_SECRET_MIN_LEN`] bytes.

use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

use crate::outbound::token::JwtAccessTokens;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
/// Shortest secret accepted in release builds.
pub const JWT_SECRET_MIN_LEN: usize = 32;
const DEV_JWT_SECRET: &str = "ecoband-development-secret-do-not-deploy";
/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing or short secret with a warning.
    Debug,
    /// Release builds require an explicit, long enough secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ecoband::inbound::http::auth_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Token verifier plus the fingerprint of the secret it was built from.
pub struct AuthSettings {
    pub tokens: JwtAccessTokens,
    /// Truncated SHA-256 of the secret, safe to log.
    pub fingerprint: String,
}

/// Errors raised while validating the token secret.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AuthConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("{name} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        name: &'static str,
        length: usize,
        min_len: usize,
    },
}

/// Build token settings from the environment and build mode.
///
/// # Examples
///
/// ```rust
/// use ecoband::inbound::http::auth_config::{BuildMode, auth_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string()
///     .returning(|_| Some("0123456789abcdef0123456789abcdef".to_owned()));
///
/// let settings = auth_settings_from_env(&env, BuildMode::Release).expect("valid secret");
/// assert_eq!(settings.fingerprint.len(), 16);
/// ```
pub fn auth_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<AuthSettings, AuthConfigError> {
    let mut secret = match env.string(JWT_SECRET_ENV) {
        Some(value) if !value.is_empty() => value.into_bytes(),
        _ if mode.is_debug() => {
            warn!("JWT_SECRET not set; using development secret (dev only)");
            DEV_JWT_SECRET.as_bytes().to_vec()
        }
        _ => {
            return Err(AuthConfigError::MissingEnv {
                name: JWT_SECRET_ENV,
            });
        }
    };

    let length = secret.len();
    if length < JWT_SECRET_MIN_LEN {
        if mode.is_debug() {
            warn!(length, min_len = JWT_SECRET_MIN_LEN, "JWT_SECRET is short");
        } else {
            secret.zeroize();
            return Err(AuthConfigError::SecretTooShort {
                name: JWT_SECRET_ENV,
                length,
                min_len: JWT_SECRET_MIN_LEN,
            });
        }
    }

    let settings = AuthSettings {
        tokens: JwtAccessTokens::new(&secret),
        fingerprint: secret_fingerprint(&secret),
    };
    secret.zeroize();
    Ok(settings)
}

/// Truncated SHA-256 fingerprint of a secret as 16 lowercase hex characters.
#[must_use]
pub fn secret_fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
