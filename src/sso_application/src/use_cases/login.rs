use secrecy::Secret;
use sso_core::{
    AccountProvider, Email, EventPublisher, IdentityStore, IdentityStoreError, SessionStore,
    TokenSigner, Tokens, UserLoggedIn,
};

use super::session::issue_tokens;
use crate::error::AuthError;
use crate::password::{PasswordHashError, verify_password_hash};

/// Login use case - password authentication against the credentials account
pub struct LoginUseCase<'a, S, R, P, J>
where
    S: IdentityStore,
    R: SessionStore,
    P: EventPublisher,
    J: TokenSigner,
{
    store: &'a S,
    sessions: &'a R,
    publisher: &'a P,
    signer: &'a J,
}

impl<'a, S, R, P, J> LoginUseCase<'a, S, R, P, J>
where
    S: IdentityStore,
    R: SessionStore,
    P: EventPublisher,
    J: TokenSigner,
{
    pub fn new(store: &'a S, sessions: &'a R, publisher: &'a P, signer: &'a J) -> Self {
        Self {
            store,
            sessions,
            publisher,
            signer,
        }
    }

    /// Execute the login use case
    ///
    /// Unknown email, missing credentials account and wrong password all fail
    /// with the same `InvalidCredentials`. The password is only compared
    /// against the stored hash, never validated on its own.
    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        email: Email,
        password: Secret<String>,
        ip: &str,
    ) -> Result<Tokens, AuthError> {
        let user = self
            .store
            .get_by_email(&email)
            .await
            .map_err(not_found_is_invalid_credentials)?;
        let account = self
            .store
            .account_by_id(user.id(), AccountProvider::Credentials)
            .await
            .map_err(not_found_is_invalid_credentials)?;

        // OAuth-only accounts carry no hash and cannot log in with a password.
        let password_hash = account
            .password_hash()
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;
        verify_password_hash(password_hash, password)
            .await
            .map_err(|e| match e {
                PasswordHashError::Mismatch => AuthError::InvalidCredentials,
                other => AuthError::internal("failed to verify password", other),
            })?;

        let tokens = issue_tokens(self.sessions, self.signer, user.id()).await?;

        // Best effort: a broker outage must not lock users out.
        let event = UserLoggedIn::now(user.id(), ip, AccountProvider::Credentials);
        if let Err(e) = self.publisher.publish_logged_in(event).await {
            tracing::warn!(user_id = %user.id(), error = %e, "Failed to publish login event");
        }

        tracing::info!(user_id = %user.id(), "User logged in");
        Ok(tokens)
    }
}

fn not_found_is_invalid_credentials(error: IdentityStoreError) -> AuthError {
    match error {
        IdentityStoreError::UserNotFound | IdentityStoreError::AccountNotFound => {
            AuthError::InvalidCredentials
        }
        other => AuthError::internal("failed to look up credentials", other),
    }
}
