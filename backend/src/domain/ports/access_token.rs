//! Driven port for bearer token verification.
//!
//! Inbound adapters hand the raw token to an [`AccessTokenVerifier`] and only
//! ever see the verified [`UserId`]. Signing schemes and secrets stay in the
//! outbound adapter.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Port verifying bearer tokens and extracting the caller identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessTokenVerifier: Send + Sync {
    /// Verify `token` and return the user it was issued for.
    ///
    /// Every failure is reported as an `unauthorized` error.
    async fn verify(&self, token: &str) -> Result<UserId, Error>;
}
