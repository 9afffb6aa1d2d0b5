use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;
use sso_core::{ACCESS_TOKEN_TTL, TOKEN_ISSUER, USER_EXCHANGE};

use super::constants::{env, prod};
use crate::oauth::GoogleOAuthConfig;
use crate::token::jwt_token_signer::JwtConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct SsoSettings {
    pub http_address: String,
    pub postgres: PostgresSettings,
    pub redis: RedisSettings,
    pub rabbitmq: RabbitMqSettings,
    pub jwt: JwtSettings,
    pub oauth: OAuthSettings,
    /// Comma separated list of origins allowed by CORS.
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    pub host_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RabbitMqSettings {
    pub url: Secret<String>,
    pub exchange: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: Secret<String>,
    pub issuer: String,
    pub access_token_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl SsoSettings {
    /// Loads `.env`, then layers defaults, the optional `config/sso.json`
    /// file and `SSO__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::build(Environment::with_prefix(env::ENV_PREFIX))
    }

    fn build(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("http_address", prod::APP_ADDRESS)?
            .set_default(
                "postgres.max_connections",
                i64::from(prod::POSTGRES_MAX_CONNECTIONS),
            )?
            .set_default("redis.host_name", prod::REDIS_HOST_NAME)?
            .set_default("rabbitmq.url", prod::RABBITMQ_URL)?
            .set_default("rabbitmq.exchange", USER_EXCHANGE)?
            .set_default("jwt.issuer", TOKEN_ISSUER)?
            .set_default(
                "jwt.access_token_ttl_seconds",
                ACCESS_TOKEN_TTL.as_secs() as i64,
            )?
            .set_default("oauth.client_id", "")?
            .set_default("oauth.client_secret", "")?
            .set_default("oauth.redirect_url", prod::google::REDIRECT_URL)?
            .set_default("oauth.auth_url", prod::google::AUTH_URL)?
            .set_default("oauth.token_url", prod::google::TOKEN_URL)?
            .set_default("oauth.userinfo_url", prod::google::USERINFO_URL)?
            .set_default("allowed_origins", prod::ALLOWED_ORIGINS)?
            .add_source(File::with_name(env::CONFIG_FILE).required(false))
            .add_source(
                environment
                    .separator(env::ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect()
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt.secret.clone(),
            issuer: self.jwt.issuer.clone(),
            access_token_ttl: Duration::from_secs(self.jwt.access_token_ttl_seconds),
        }
    }

    pub fn google_oauth_config(&self) -> GoogleOAuthConfig {
        GoogleOAuthConfig {
            client_id: self.oauth.client_id.clone(),
            client_secret: self.oauth.client_secret.clone(),
            redirect_url: self.oauth.redirect_url.clone(),
            auth_url: self.oauth.auth_url.clone(),
            token_url: self.oauth.token_url.clone(),
            userinfo_url: self.oauth.userinfo_url.clone(),
        }
    }
}
