use sso_core::SessionStore;

use crate::error::AuthError;

/// Logout use case - revokes a refresh token
pub struct LogoutUseCase<'a, R>
where
    R: SessionStore,
{
    sessions: &'a R,
}

impl<'a, R> LogoutUseCase<'a, R>
where
    R: SessionStore,
{
    pub fn new(sessions: &'a R) -> Self {
        Self { sessions }
    }

    /// Revoking an unknown or already revoked token succeeds. Only a failure
    /// to reach the session store is reported.
    #[tracing::instrument(name = "LogoutUseCase::execute", skip_all)]
    pub async fn execute(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.sessions
            .revoke(refresh_token)
            .await
            .map_err(|e| AuthError::internal("failed to revoke refresh token", e))
    }
}
