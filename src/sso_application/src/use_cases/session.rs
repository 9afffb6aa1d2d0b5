use sso_core::{SessionStore, TokenSigner, Tokens, UserId};

use crate::error::AuthError;

/// Issues a refresh token and a matching access token for `user_id`.
pub(crate) async fn issue_tokens<R, J>(
    sessions: &R,
    signer: &J,
    user_id: UserId,
) -> Result<Tokens, AuthError>
where
    R: SessionStore,
    J: TokenSigner,
{
    let refresh_token = sessions
        .create(user_id)
        .await
        .map_err(|e| AuthError::internal("failed to create refresh token", e))?;
    let access_token = signer
        .sign(user_id)
        .map_err(|e| AuthError::internal("failed to sign access token", e))?;

    Ok(Tokens {
        access_token,
        refresh_token,
    })
}

/// Best-effort revocation of a refresh token that must not outlive a failed
/// login.
pub(crate) async fn discard_refresh_token<R>(sessions: &R, refresh_token: &str)
where
    R: SessionStore,
{
    if let Err(e) = sessions.revoke(refresh_token).await {
        tracing::warn!(error = %e, "Failed to revoke refresh token of a failed login");
    }
}
