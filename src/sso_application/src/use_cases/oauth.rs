use sso_core::{
    AccountProvider, Email, EventPublisher, IdentityStore, OAuthUserInfo,
    SessionStore, TokenSigner, Tokens, User, UserLoggedIn, UserRegistered,
};

use super::linking::{ensure_account, ensure_user};
use super::session::{discard_refresh_token, issue_tokens};
use crate::error::AuthError;
use crate::transaction::TransactionCoordinator;

/// OAuth use case - resolves a provider-verified profile to a user, linking a
/// new provider account on first use
pub struct OAuthUseCase<'a, S, R, P, J>
where
    S: IdentityStore,
    R: SessionStore,
    P: EventPublisher,
    J: TokenSigner,
{
    transactions: &'a TransactionCoordinator<S>,
    sessions: &'a R,
    publisher: &'a P,
    signer: &'a J,
}

impl<'a, S, R, P, J> OAuthUseCase<'a, S, R, P, J>
where
    S: IdentityStore,
    R: SessionStore,
    P: EventPublisher,
    J: TokenSigner,
{
    pub fn new(
        transactions: &'a TransactionCoordinator<S>,
        sessions: &'a R,
        publisher: &'a P,
        signer: &'a J,
    ) -> Self {
        Self {
            transactions,
            sessions,
            publisher,
            signer,
        }
    }

    /// Execute the OAuth use case
    ///
    /// Linking runs in one transaction. Tokens are issued and the LoggedIn
    /// event published only after it commits.
    #[tracing::instrument(name = "OAuthUseCase::execute", skip(self, user_info))]
    pub async fn execute(
        &self,
        user_info: OAuthUserInfo,
        provider: AccountProvider,
        ip: &str,
    ) -> Result<Tokens, AuthError> {
        if !provider.is_oauth() {
            return Err(AuthError::InvalidCredentials);
        }
        let email =
            Email::try_from(user_info.email.as_str()).map_err(|_| AuthError::InvalidCredentials)?;

        let user = match self.link(&email, &user_info, provider).await {
            // A concurrent first login for the same email won the insert. Its
            // rows are committed now, so a second pass finds them.
            Err(AuthError::AlreadyExists) => {
                tracing::debug!("Lost a linking race, retrying as existing user");
                self.link(&email, &user_info, provider)
                    .await
                    .map_err(|e| match e {
                        AuthError::AlreadyExists => {
                            AuthError::internal("account linking", "lost the insert race twice")
                        }
                        other => other,
                    })?
            }
            other => other?,
        };

        let tokens = issue_tokens(self.sessions, self.signer, user.id()).await?;

        let event = UserLoggedIn::now(user.id(), ip, provider);
        if let Err(e) = self.publisher.publish_logged_in(event).await {
            discard_refresh_token(self.sessions, &tokens.refresh_token).await;
            return Err(AuthError::internal("failed to publish login event", e));
        }

        tracing::info!(user_id = %user.id(), %provider, "User logged in via OAuth");
        Ok(tokens)
    }

    async fn link(
        &self,
        email: &Email,
        user_info: &OAuthUserInfo,
        provider: AccountProvider,
    ) -> Result<User, AuthError> {
        self.transactions
            .run(|mut tx| async move {
                let outcome = self.link_in(&mut tx, email, user_info, provider).await;
                (tx, outcome)
            })
            .await
    }

    async fn link_in(
        &self,
        tx: &mut S::Transaction,
        email: &Email,
        user_info: &OAuthUserInfo,
        provider: AccountProvider,
    ) -> Result<User, AuthError> {
        let (user, created) = ensure_user(tx, email).await?;
        let account = ensure_account(tx, &user, provider).await?;

        if account.user_id() != user.id() {
            tracing::warn!(user_id = %user.id(), %provider, "Linked account belongs to another user");
            return Err(AuthError::InvalidCredentials);
        }

        if created {
            let event = UserRegistered::new(user.id(), user.email().as_str())
                .with_profile(&user_info.name, &user_info.picture);
            self.publisher
                .publish_registered(event)
                .await
                .map_err(|e| AuthError::internal("failed to publish registration event", e))?;
        }

        Ok(user)
    }
}
