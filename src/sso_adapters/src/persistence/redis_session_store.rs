use std::time::Duration;

use redis::{AsyncCommands, aio::MultiplexedConnection};
use sso_core::{REFRESH_TOKEN_TTL, RefreshTokenRecord, SessionStore, SessionStoreError, UserId};

use crate::token::generate_refresh_token;

#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl: Duration,
}

impl RedisSessionStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            ttl: REFRESH_TOKEN_TTL,
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    #[tracing::instrument(name = "Storing refresh token in Redis", skip_all)]
    async fn create(&self, user_id: UserId) -> Result<String, SessionStoreError> {
        let token = generate_refresh_token();
        let record = serde_json::to_string(&RefreshTokenRecord::new(user_id, self.ttl))
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(get_key(&token), record, self.ttl.as_secs())
            .await
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))?;

        Ok(token)
    }

    #[tracing::instrument(name = "Resolving refresh token in Redis", skip_all)]
    async fn user_id(&self, token: &str) -> Result<UserId, SessionStoreError> {
        let mut conn = self.conn.clone();
        let record: Option<String> = conn
            .get(get_key(token))
            .await
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))?;

        let Some(record) = record else {
            return Err(SessionStoreError::InvalidToken);
        };

        let record: RefreshTokenRecord = serde_json::from_str(&record)
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))?;

        // Redis expiry has second granularity, the record is authoritative.
        if record.is_expired() {
            return Err(SessionStoreError::InvalidToken);
        }
        Ok(record.user_id)
    }

    #[tracing::instrument(name = "Revoking refresh token in Redis", skip_all)]
    async fn revoke(&self, token: &str) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(get_key(token))
            .await
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))
    }
}

const REFRESH_TOKEN_KEY_PREFIX: &str = "refresh_token:";

fn get_key(token: &str) -> String {
    format!("{}{}", REFRESH_TOKEN_KEY_PREFIX, token)
}
