use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use sso_core::{REFRESH_TOKEN_TTL, RefreshTokenRecord, SessionStore, SessionStoreError, UserId};
use tokio::sync::RwLock;

use crate::token::generate_refresh_token;

/// In-memory refresh token store. Expired records are treated as absent; they
/// are removed when looked up and swept on every insert.
#[derive(Clone)]
pub struct HashMapSessionStore {
    tokens: Arc<RwLock<HashMap<String, RefreshTokenRecord>>>,
    ttl: Duration,
}

impl Default for HashMapSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HashMapSessionStore {
    pub fn new() -> Self {
        Self::with_ttl(REFRESH_TOKEN_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for HashMapSessionStore {
    async fn create(&self, user_id: UserId) -> Result<String, SessionStoreError> {
        let token = generate_refresh_token();
        let record = RefreshTokenRecord::new(user_id, self.ttl);

        let mut tokens = self.tokens.write().await;
        tokens.retain(|_, existing| !existing.is_expired());
        tokens.insert(token.clone(), record);
        Ok(token)
    }

    async fn user_id(&self, token: &str) -> Result<UserId, SessionStoreError> {
        let record = self
            .tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(SessionStoreError::InvalidToken)?;

        if record.is_expired() {
            self.tokens.write().await.remove(token);
            return Err(SessionStoreError::InvalidToken);
        }
        Ok(record.user_id)
    }

    async fn revoke(&self, token: &str) -> Result<(), SessionStoreError> {
        self.tokens.write().await.remove(token);
        Ok(())
    }
}
