//! HS256 JWT implementation of [`AccessTokenVerifier`].
//!
//! Tokens carry `{userId, iat, exp}` claims. `exp` is validated when present;
//! tokens without it are accepted so long-lived device tokens keep working.
//! Issuance exists for the `mint-token` developer tool and for tests.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::AccessTokenVerifier;
use crate::domain::{Error, UserId};

/// Lifetime in hours of tokens minted by [`JwtAccessTokens::issue`].
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Errors raised while signing a token.
#[derive(Debug, thiserror::Error)]
#[error("failed to sign access token: {0}")]
pub struct TokenIssueError(#[from] jsonwebtoken::errors::Error);

/// Signs and verifies HS256 bearer tokens with one shared secret.
pub struct JwtAccessTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtAccessTokens {
    /// Derive signing and verification keys from `secret`.
    ///
    /// The caller keeps ownership of the secret bytes and may zeroise them
    /// once this returns.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Mint a token for `user_id` valid for [`DEFAULT_TOKEN_TTL_HOURS`].
    pub fn issue(&self, user_id: &UserId) -> Result<String, TokenIssueError> {
        self.issue_at(
            user_id,
            Utc::now(),
            Some(Duration::hours(DEFAULT_TOKEN_TTL_HOURS)),
        )
    }

    /// Mint a token issued at `issued_at`; `ttl` of `None` omits `exp`.
    pub fn issue_at(
        &self,
        user_id: &UserId,
        issued_at: DateTime<Utc>,
        ttl: Option<Duration>,
    ) -> Result<String, TokenIssueError> {
        let claims = Claims {
            user_id: user_id.to_string(),
            iat: Some(issued_at.timestamp()),
            exp: ttl.map(|ttl| (issued_at + ttl).timestamp()),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    fn decode_user(&self, token: &str) -> Result<UserId, Error> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| Error::unauthorized(format!("invalid bearer token: {err}")))?;
        UserId::new(&data.claims.user_id)
            .map_err(|err| Error::unauthorized(format!("invalid userId claim: {err}")))
    }
}

#[async_trait]
impl AccessTokenVerifier for JwtAccessTokens {
    async fn verify(&self, token: &str) -> Result<UserId, Error> {
        self.decode_user(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"test-secret-that-is-at-least-32-bytes!";

    #[fixture]
    fn tokens() -> JwtAccessTokens {
        JwtAccessTokens::new(SECRET)
    }

    #[rstest]
    #[tokio::test]
    async fn issued_tokens_verify(tokens: JwtAccessTokens) {
        let user_id = UserId::random();
        let token = tokens.issue(&user_id).expect("token");
        assert_eq!(tokens.verify(&token).await.expect("verified"), user_id);
    }

    #[rstest]
    #[tokio::test]
    async fn tokens_without_expiry_are_accepted(tokens: JwtAccessTokens) {
        let user_id = UserId::random();
        let token = tokens.issue_at(&user_id, Utc::now(), None).expect("token");
        assert_eq!(tokens.verify(&token).await.expect("verified"), user_id);
    }

    #[rstest]
    #[tokio::test]
    async fn expired_tokens_are_unauthorised(tokens: JwtAccessTokens) {
        let issued_at = Utc::now() - Duration::hours(2);
        let token = tokens
            .issue_at(&UserId::random(), issued_at, Some(Duration::hours(1)))
            .expect("token");
        let error = tokens.verify(&token).await.expect_err("expired");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn foreign_signatures_are_unauthorised(tokens: JwtAccessTokens) {
        let forger = JwtAccessTokens::new(b"another-secret-entirely-32-bytes-long");
        let token = forger.issue(&UserId::random()).expect("token");
        let error = tokens.verify(&token).await.expect_err("bad signature");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn non_uuid_user_claims_are_unauthorised(tokens: JwtAccessTokens) {
        let claims = Claims {
            user_id: "64f1c0ffee".to_owned(),
            iat: None,
            exp: None,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &tokens.encoding)
            .expect("token");
        let error = tokens.verify(&token).await.expect_err("bad claim");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
