use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;
use sso_application::AuthOperations;
use sso_core::Email;

use super::error::AuthApiError;
use crate::http::{AppState, ClientIp};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Login", skip_all, fields(ip = %ip))]
pub async fn login<A>(
    State(state): State<AppState<A>>,
    ClientIp(ip): ClientIp,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    A: AuthOperations,
{
    // Only the email is validated; the password is judged by the stored hash.
    let email = Email::try_from(request.email)?;

    let tokens = state.auth.login(email, request.password, &ip).await?;

    Ok((StatusCode::OK, Json(tokens)))
}
