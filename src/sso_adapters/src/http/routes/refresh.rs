use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use sso_application::AuthOperations;

use super::error::AuthApiError;
use crate::http::AppState;

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[tracing::instrument(name = "Refresh", skip_all)]
pub async fn refresh<A>(
    State(state): State<AppState<A>>,
    Json(request): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    A: AuthOperations,
{
    let access_token = state.auth.refresh(&request.refresh_token).await?;

    Ok((StatusCode::OK, Json(RefreshResponse { access_token })))
}
