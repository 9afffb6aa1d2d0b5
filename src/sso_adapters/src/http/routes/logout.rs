use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use sso_application::AuthOperations;

use super::error::AuthApiError;
use crate::http::AppState;

#[derive(Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize)]
pub struct LogoutResponse {
    pub ok: bool,
}

#[tracing::instrument(name = "Logout", skip_all)]
pub async fn logout<A>(
    State(state): State<AppState<A>>,
    Json(request): Json<LogoutRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    A: AuthOperations,
{
    state.auth.logout(&request.refresh_token).await?;

    Ok((StatusCode::OK, Json(LogoutResponse { ok: true })))
}
