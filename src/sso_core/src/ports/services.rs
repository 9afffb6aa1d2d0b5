use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    events::{UserLoggedIn, UserRegistered},
    token::AccessTokenClaims,
    user::UserId,
};

#[derive(Debug, Error)]
pub enum EventPublisherError {
    #[error("Failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to publish event: {0}")]
    PublishFailed(String),
}

/// Port for emitting identity lifecycle events to the broker.
///
/// Publishing does not retry; a failure is returned to the caller.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_registered(&self, event: UserRegistered) -> Result<(), EventPublisherError>;
    async fn publish_logged_in(&self, event: UserLoggedIn) -> Result<(), EventPublisherError>;
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

/// Stateless creation and verification of short-lived access tokens.
pub trait TokenSigner: Send + Sync {
    fn sign(&self, user_id: UserId) -> Result<String, TokenError>;
    fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenError>;
}
