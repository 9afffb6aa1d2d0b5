use async_trait::async_trait;
use secrecy::Secret;
use thiserror::Error;

use crate::domain::{
    account::{Account, AccountProvider},
    email::Email,
    user::{User, UserId},
};

// IdentityStore port traits and errors
#[derive(Debug, Error)]
pub enum IdentityStoreError {
    #[error("User not found")]
    UserNotFound,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Already exists")]
    AlreadyExists,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for IdentityStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserNotFound, Self::UserNotFound) => true,
            (Self::AccountNotFound, Self::AccountNotFound) => true,
            (Self::AlreadyExists, Self::AlreadyExists) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// Durable storage of users and their linked accounts.
///
/// The read methods run outside any transaction. Multi-step writes go through
/// [`IdentityStore::begin`] and the returned [`IdentityTransaction`].
#[async_trait]
pub trait IdentityStore: Send + Sync {
    type Transaction: IdentityTransaction;

    async fn begin(&self) -> Result<Self::Transaction, IdentityStoreError>;
    async fn get_by_email(&self, email: &Email) -> Result<User, IdentityStoreError>;
    async fn get_by_id(&self, user_id: UserId) -> Result<User, IdentityStoreError>;
    async fn account_by_id(
        &self,
        user_id: UserId,
        provider: AccountProvider,
    ) -> Result<Account, IdentityStoreError>;
}

/// Explicit transaction handle over an [`IdentityStore`].
///
/// Reads observe earlier writes made through the same handle. Dropping the
/// handle without calling [`IdentityTransaction::commit`] discards every write.
#[async_trait]
pub trait IdentityTransaction: Send {
    async fn get_by_email(&mut self, email: &Email) -> Result<User, IdentityStoreError>;

    /// Inserts a new user. There is no upsert: an existing email is
    /// reported as [`IdentityStoreError::AlreadyExists`].
    async fn create(&mut self, email: &Email) -> Result<User, IdentityStoreError>;

    async fn get_by_id(&mut self, user_id: UserId) -> Result<User, IdentityStoreError>;

    /// Links a provider to a user. A duplicate `(user_id, provider)` pair is
    /// reported as [`IdentityStoreError::AlreadyExists`], never overwritten.
    async fn add_account(
        &mut self,
        user_id: UserId,
        provider: AccountProvider,
        password_hash: Option<Secret<String>>,
    ) -> Result<Account, IdentityStoreError>;

    async fn account_by_id(
        &mut self,
        user_id: UserId,
        provider: AccountProvider,
    ) -> Result<Account, IdentityStoreError>;

    async fn commit(self) -> Result<(), IdentityStoreError>;
    async fn rollback(self) -> Result<(), IdentityStoreError>;
}

// SessionStore port trait and errors
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for SessionStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::InvalidToken, Self::InvalidToken)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Volatile storage of refresh tokens with store-enforced expiry.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Issues a fresh opaque token bound to `user_id`.
    async fn create(&self, user_id: UserId) -> Result<String, SessionStoreError>;

    /// Resolves a token. Unknown, expired and revoked tokens all yield
    /// [`SessionStoreError::InvalidToken`].
    async fn user_id(&self, token: &str) -> Result<UserId, SessionStoreError>;

    /// Revokes a token. Revoking an unknown token is not an error.
    async fn revoke(&self, token: &str) -> Result<(), SessionStoreError>;
}
