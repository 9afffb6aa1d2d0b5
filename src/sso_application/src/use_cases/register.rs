use secrecy::Secret;
use sso_core::{
    AccountProvider, Email, EventPublisher, IdentityStore, IdentityStoreError,
    IdentityTransaction, Password, UserId, UserRegistered,
};

use super::linking::ensure_user;
use crate::error::AuthError;
use crate::password::compute_password_hash;
use crate::transaction::TransactionCoordinator;

/// Register use case - creates a credentials account, and the user behind it
/// if the email has never been seen
pub struct RegisterUseCase<'a, S, P>
where
    S: IdentityStore,
    P: EventPublisher,
{
    transactions: &'a TransactionCoordinator<S>,
    publisher: &'a P,
}

impl<'a, S, P> RegisterUseCase<'a, S, P>
where
    S: IdentityStore,
    P: EventPublisher,
{
    pub fn new(transactions: &'a TransactionCoordinator<S>, publisher: &'a P) -> Self {
        Self {
            transactions,
            publisher,
        }
    }

    /// Execute the register use case
    ///
    /// The password is hashed before the transaction opens. Everything after
    /// that, including the Registered event, commits or rolls back as one.
    #[tracing::instrument(name = "RegisterUseCase::execute", skip(self, password))]
    pub async fn execute(&self, email: Email, password: Password) -> Result<UserId, AuthError> {
        let password_hash = compute_password_hash(password)
            .await
            .map_err(|e| AuthError::internal("failed to hash password", e))?;

        let user_id = self
            .transactions
            .run(|mut tx| async move {
                let outcome = self.register_in(&mut tx, &email, password_hash).await;
                (tx, outcome)
            })
            .await?;

        tracing::info!(%user_id, "User registered");
        Ok(user_id)
    }

    async fn register_in(
        &self,
        tx: &mut S::Transaction,
        email: &Email,
        password_hash: Secret<String>,
    ) -> Result<UserId, AuthError> {
        let (user, created) = ensure_user(tx, email).await?;

        match tx
            .account_by_id(user.id(), AccountProvider::Credentials)
            .await
        {
            Ok(_) => return Err(AuthError::AlreadyExists),
            Err(IdentityStoreError::AccountNotFound) => {}
            Err(e) => return Err(e.into()),
        }

        tx.add_account(user.id(), AccountProvider::Credentials, Some(password_hash))
            .await?;

        if created {
            self.publisher
                .publish_registered(UserRegistered::new(user.id(), user.email().as_str()))
                .await
                .map_err(|e| AuthError::internal("failed to publish registration event", e))?;
        }

        Ok(user.id())
    }
}
