use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use sso_application::AuthOperations;
use sso_core::{Email, Password};

use super::error::AuthApiError;
use crate::http::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
}

#[derive(Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: String,
}

#[tracing::instrument(name = "Register", skip_all)]
pub async fn register<A>(
    State(state): State<AppState<A>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    A: AuthOperations,
{
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    let user_id = state.auth.register(email, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user_id.to_string(),
        }),
    ))
}
