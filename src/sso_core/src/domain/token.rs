use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);
pub const TOKEN_ISSUER: &str = "sso";

/// Credential pair handed out on every successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Server-side state behind an opaque refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn new(user_id: UserId, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
        Self {
            user_id,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Claims carried by a signed access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub user_id: String,
    pub iss: String,
    pub iat: u64,
    pub exp: u64,
}
