use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use sso_core::{ACCESS_TOKEN_TTL, AccessTokenClaims, TOKEN_ISSUER, TokenError, TokenSigner, UserId};

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub issuer: String,
    pub access_token_ttl: Duration,
}

impl JwtConfig {
    pub fn new(secret: Secret<String>) -> Self {
        Self {
            secret,
            issuer: TOKEN_ISSUER.to_owned(),
            access_token_ttl: ACCESS_TOKEN_TTL,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

/// HS256 access tokens. Verification needs only the shared secret.
#[derive(Clone)]
pub struct JwtTokenSigner {
    config: JwtConfig,
}

impl JwtTokenSigner {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation
    }
}

impl TokenSigner for JwtTokenSigner {
    fn sign(&self, user_id: UserId) -> Result<String, TokenError> {
        let iat = u64::try_from(Utc::now().timestamp())
            .map_err(|_| TokenError::UnexpectedError("Clock is before the epoch".to_owned()))?;

        let claims = AccessTokenClaims {
            user_id: user_id.to_string(),
            iss: self.config.issuer.clone(),
            iat,
            exp: iat + self.config.access_token_ttl.as_secs(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.as_bytes()),
        )
        .map_err(|e| TokenError::UnexpectedError(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.as_bytes()),
            &self.validation(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            TokenError::InvalidToken
        })
    }
}
