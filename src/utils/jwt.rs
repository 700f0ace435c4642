use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::services::ports::TokenIssuer;

/// Access token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub iss: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn new(
        account_id: i32,
        issuer: &str,
        now: Timestamp,
        expiration_hours: i64,
    ) -> AppResult<Self> {
        let exp = expiration_hours
            .checked_mul(3600)
            .map(SignedDuration::from_secs)
            .and_then(|lifetime| now.checked_add(lifetime).ok())
            .ok_or_else(|| AppError::Internal {
                source: anyhow::anyhow!(
                    "Token expiration of {} hours is out of range",
                    expiration_hours
                ),
            })?;

        Ok(Self {
            sub: account_id.to_string(),
            iss: issuer.to_string(),
            iat: now.as_second(),
            exp: exp.as_second(),
        })
    }
}

/// HS256 access token issuer
#[derive(Clone)]
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    issuer: String,
    expiration_hours: i64,
}

impl JwtIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            expiration_hours: config.access_token_expiration,
        }
    }

    /// Encodes a token for `account_id` issued at `now`
    pub fn issue_at(&self, account_id: i32, now: Timestamp) -> AppResult<String> {
        let claims = Claims::new(account_id, &self.issuer, now, self.expiration_hours)?;

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AppError::Internal {
                source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
            }
        })
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, account_id: i32) -> AppResult<String> {
        self.issue_at(account_id, Timestamp::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn config() -> JwtConfig {
        JwtConfig {
            secret: SECRET.to_string(),
            access_token_expiration: 2,
            issuer: "account-rs-test".to_string(),
        }
    }

    fn decode_with(token: &str, secret: &str, issuer: &str) -> jsonwebtoken::errors::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map(|data| data.claims)
    }

    #[test]
    fn test_issue_signs_account_claims() {
        let token = JwtIssuer::new(&config()).issue(42).unwrap();

        let claims = decode_with(&token, SECRET, "account-rs-test").unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, "account-rs-test");
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
    }

    #[test]
    fn test_token_is_bound_to_secret_and_issuer() {
        let token = JwtIssuer::new(&config()).issue(1).unwrap();

        assert!(decode_with(&token, "ffffffffffffffffffffffffffffffff", "account-rs-test").is_err());
        assert!(decode_with(&token, SECRET, "someone-else").is_err());
    }

    #[test]
    fn test_expired_token_fails_validation() {
        let long_ago = Timestamp::from_second(1_000_000_000).unwrap();
        let token = JwtIssuer::new(&config()).issue_at(1, long_ago).unwrap();

        assert!(decode_with(&token, SECRET, "account-rs-test").is_err());
    }

    #[test]
    fn test_oversized_expiration_is_an_error() {
        let issuer = JwtIssuer::new(&JwtConfig {
            access_token_expiration: i64::MAX,
            ..config()
        });
        assert!(matches!(
            issuer.issue_at(1, Timestamp::UNIX_EPOCH),
            Err(AppError::Internal { .. })
        ));

        let far = Claims::new(1, "account-rs-test", Timestamp::MAX, 1);
        assert!(matches!(far, Err(AppError::Internal { .. })));
    }
}
