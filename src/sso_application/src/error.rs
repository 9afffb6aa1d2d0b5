use std::fmt::Display;

use sso_core::{
    EventPublisherError, IdentityStoreError, SessionStoreError, TokenError, UserError,
};
use thiserror::Error;

/// Outward-facing failure kinds of the identity service.
///
/// Unknown emails, missing credentials accounts and wrong passwords all
/// collapse into `InvalidCredentials`; unknown, expired and revoked refresh
/// tokens collapse into `InvalidToken`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Already exists")]
    AlreadyExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] UserError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn internal(context: &str, error: impl Display) -> Self {
        AuthError::Internal(format!("{context}: {error}"))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::Internal(_))
    }
}

impl PartialEq for AuthError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AlreadyExists, Self::AlreadyExists) => true,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::InvalidToken, Self::InvalidToken) => true,
            (Self::InvalidArgument(a), Self::InvalidArgument(b)) => a == b,
            (Self::Internal(_), Self::Internal(_)) => true,
            _ => false,
        }
    }
}

impl From<IdentityStoreError> for AuthError {
    fn from(error: IdentityStoreError) -> Self {
        match error {
            IdentityStoreError::AlreadyExists => AuthError::AlreadyExists,
            other => AuthError::internal("identity store", other),
        }
    }
}

impl From<SessionStoreError> for AuthError {
    fn from(error: SessionStoreError) -> Self {
        match error {
            SessionStoreError::InvalidToken => AuthError::InvalidToken,
            other => AuthError::internal("session store", other),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::InvalidToken => AuthError::InvalidToken,
            other => AuthError::internal("token signer", other),
        }
    }
}

impl From<EventPublisherError> for AuthError {
    fn from(error: EventPublisherError) -> Self {
        AuthError::internal("event publisher", error)
    }
}
