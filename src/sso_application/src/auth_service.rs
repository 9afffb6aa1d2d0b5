use async_trait::async_trait;
use secrecy::Secret;
use sso_core::{
    AccessTokenClaims, AccountProvider, Email, EventPublisher, IdentityStore, OAuthUserInfo,
    Password, SessionStore, TokenSigner, Tokens, UserId,
};

use crate::error::AuthError;
use crate::transaction::TransactionCoordinator;
use crate::use_cases::{
    LoginUseCase, LogoutUseCase, OAuthUseCase, RefreshUseCase, RegisterUseCase,
};

/// The identity operations a transport adapter drives.
///
/// Routes are generic over this trait so they can be exercised against any
/// wiring of stores, signer and publisher.
#[async_trait]
pub trait AuthOperations: Clone + Send + Sync + 'static {
    async fn register(&self, email: Email, password: Password) -> Result<UserId, AuthError>;

    /// The password is checked against the stored hash only, so a malformed
    /// candidate is `InvalidCredentials` rather than `InvalidArgument`.
    async fn login(
        &self,
        email: Email,
        password: Secret<String>,
        ip: &str,
    ) -> Result<Tokens, AuthError>;

    async fn oauth(
        &self,
        user_info: OAuthUserInfo,
        provider: AccountProvider,
        ip: &str,
    ) -> Result<Tokens, AuthError>;

    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError>;

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Stateless check of an access token, no store lookup.
    fn verify_access_token(&self, access_token: &str) -> Result<AccessTokenClaims, AuthError>;
}

/// Orchestrates registration, login, OAuth linking and session handling over
/// the identity store, session store, event publisher and token signer.
#[derive(Clone)]
pub struct AuthService<S, R, P, J> {
    transactions: TransactionCoordinator<S>,
    sessions: R,
    publisher: P,
    signer: J,
}

impl<S, R, P, J> AuthService<S, R, P, J>
where
    S: IdentityStore,
    R: SessionStore,
    P: EventPublisher,
    J: TokenSigner,
{
    pub fn new(store: S, sessions: R, publisher: P, signer: J) -> Self {
        Self {
            transactions: TransactionCoordinator::new(store),
            sessions,
            publisher,
            signer,
        }
    }
}

#[async_trait]
impl<S, R, P, J> AuthOperations for AuthService<S, R, P, J>
where
    S: IdentityStore + Clone + 'static,
    R: SessionStore + Clone + 'static,
    P: EventPublisher + Clone + 'static,
    J: TokenSigner + Clone + 'static,
{
    async fn register(&self, email: Email, password: Password) -> Result<UserId, AuthError> {
        RegisterUseCase::new(&self.transactions, &self.publisher)
            .execute(email, password)
            .await
    }

    async fn login(
        &self,
        email: Email,
        password: Secret<String>,
        ip: &str,
    ) -> Result<Tokens, AuthError> {
        LoginUseCase::new(
            self.transactions.store(),
            &self.sessions,
            &self.publisher,
            &self.signer,
        )
        .execute(email, password, ip)
        .await
    }

    async fn oauth(
        &self,
        user_info: OAuthUserInfo,
        provider: AccountProvider,
        ip: &str,
    ) -> Result<Tokens, AuthError> {
        OAuthUseCase::new(
            &self.transactions,
            &self.sessions,
            &self.publisher,
            &self.signer,
        )
        .execute(user_info, provider, ip)
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        RefreshUseCase::new(&self.sessions, &self.signer)
            .execute(refresh_token)
            .await
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        LogoutUseCase::new(&self.sessions).execute(refresh_token).await
    }

    fn verify_access_token(&self, access_token: &str) -> Result<AccessTokenClaims, AuthError> {
        Ok(self.signer.verify(access_token)?)
    }
}
