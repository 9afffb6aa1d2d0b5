use sso_core::{SessionStore, TokenSigner};

use crate::error::AuthError;

/// Refresh use case - signs a new access token for a live refresh token
///
/// The refresh token is not rotated. It stays valid until its TTL runs out or
/// it is revoked through logout.
pub struct RefreshUseCase<'a, R, J>
where
    R: SessionStore,
    J: TokenSigner,
{
    sessions: &'a R,
    signer: &'a J,
}

impl<'a, R, J> RefreshUseCase<'a, R, J>
where
    R: SessionStore,
    J: TokenSigner,
{
    pub fn new(sessions: &'a R, signer: &'a J) -> Self {
        Self { sessions, signer }
    }

    #[tracing::instrument(name = "RefreshUseCase::execute", skip_all)]
    pub async fn execute(&self, refresh_token: &str) -> Result<String, AuthError> {
        let user_id = self.sessions.user_id(refresh_token).await?;
        let access_token = self
            .signer
            .sign(user_id)
            .map_err(|e| AuthError::internal("failed to sign access token", e))?;
        Ok(access_token)
    }
}
