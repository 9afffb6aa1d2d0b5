use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{self, PasswordHasher, SaltString, rand_core},
};
use secrecy::{ExposeSecret, Secret};
use sso_core::Password;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password does not match")]
    Mismatch,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordHashError> {
    let params = Params::new(15000, 2, 1, None)
        .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with a fresh salt on the blocking pool.
#[tracing::instrument(name = "Computing password hash", skip_all)]
pub async fn compute_password_hash(password: Password) -> Result<Secret<String>, PasswordHashError> {
    let current_span: tracing::Span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        current_span.in_scope(move || {
            let salt: SaltString = SaltString::generate(rand_core::OsRng);
            hasher()?
                .hash_password(password.as_ref().expose_secret().as_bytes(), &salt)
                .map(|h| Secret::from(h.to_string()))
                .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))
        })
    })
    .await
    .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))?
}

/// Verifies a candidate against a stored PHC hash string.
///
/// The candidate is not length-checked: any input that fails to match is a
/// plain `Mismatch`.
#[tracing::instrument(name = "Verify password hash", skip_all)]
pub async fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Secret<String>,
) -> Result<(), PasswordHashError> {
    let current_span: tracing::Span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| {
            let expected_password_hash: PasswordHash<'_> =
                PasswordHash::new(expected_password_hash.expose_secret())
                    .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))?;

            hasher()?
                .verify_password(
                    password_candidate.expose_secret().as_bytes(),
                    &expected_password_hash,
                )
                .map_err(|e| match e {
                    password_hash::Error::Password => PasswordHashError::Mismatch,
                    other => PasswordHashError::UnexpectedError(other.to_string()),
                })
        })
    })
    .await
    .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))?
}
