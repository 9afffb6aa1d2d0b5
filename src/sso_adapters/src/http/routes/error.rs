use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sso_application::AuthError;
use sso_core::UserError;
use thiserror::Error;

use crate::oauth::OAuthClientError;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AuthApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            AuthApiError::UserAlreadyExists => (StatusCode::CONFLICT, self.to_string()),

            AuthApiError::InvalidCredentials | AuthApiError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }

            AuthApiError::UnexpectedError(ref detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_owned(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status_code, body).into_response()
    }
}

impl From<UserError> for AuthApiError {
    fn from(error: UserError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<AuthError> for AuthApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::AlreadyExists => AuthApiError::UserAlreadyExists,
            AuthError::InvalidCredentials => AuthApiError::InvalidCredentials,
            AuthError::InvalidToken => AuthApiError::InvalidToken,
            AuthError::InvalidArgument(e) => e.into(),
            AuthError::Internal(detail) => AuthApiError::UnexpectedError(detail),
        }
    }
}

impl From<OAuthClientError> for AuthApiError {
    fn from(error: OAuthClientError) -> Self {
        match error {
            OAuthClientError::Rejected(detail) => {
                tracing::warn!(%detail, "Identity provider rejected the authorization code");
                AuthApiError::InvalidCredentials
            }
            OAuthClientError::UnexpectedError(detail) => AuthApiError::UnexpectedError(detail),
        }
    }
}
