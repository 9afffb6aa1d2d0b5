use rand::Rng;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use sso_core::OAuthUserInfo;
use thiserror::Error;

const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/userinfo.email",
];
const STATE_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum OAuthClientError {
    #[error("Identity provider rejected the request: {0}")]
    Rejected(String),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

#[derive(Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

/// OAuth 2.0 authorization-code client for Google sign-in.
#[derive(Clone)]
pub struct GoogleOAuthClient {
    http_client: Client,
    config: GoogleOAuthConfig,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl GoogleOAuthClient {
    pub fn new(config: GoogleOAuthConfig, http_client: Client) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Where to send the browser to start the consent flow.
    pub fn authorization_url(&self, state: &str) -> Result<Url, OAuthClientError> {
        let scope = SCOPES.join(" ");
        Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
                ("state", state),
            ],
        )
        .map_err(|e| OAuthClientError::UnexpectedError(e.to_string()))
    }

    /// Exchanges an authorization code and fetches the profile it grants.
    #[tracing::instrument(name = "Authenticating with Google", skip_all)]
    pub async fn authenticate(&self, code: &str) -> Result<OAuthUserInfo, OAuthClientError> {
        let access_token = self.exchange_code(code).await?;
        self.user_info(&access_token).await
    }

    async fn exchange_code(&self, code: &str) -> Result<Secret<String>, OAuthClientError> {
        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.expose_secret().as_str()),
            ])
            .send()
            .await
            .map_err(|e| OAuthClientError::UnexpectedError(e.to_string()))?;

        let response = check_status(response)?;
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| OAuthClientError::UnexpectedError(e.to_string()))?;

        Ok(Secret::from(token.access_token))
    }

    async fn user_info(
        &self,
        access_token: &Secret<String>,
    ) -> Result<OAuthUserInfo, OAuthClientError> {
        let response = self
            .http_client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token.expose_secret())
            .send()
            .await
            .map_err(|e| OAuthClientError::UnexpectedError(e.to_string()))?;

        check_status(response)?
            .json()
            .await
            .map_err(|e| OAuthClientError::UnexpectedError(e.to_string()))
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, OAuthClientError> {
    let status = response.status();
    if status.is_client_error() {
        return Err(OAuthClientError::Rejected(status.to_string()));
    }
    response
        .error_for_status()
        .map_err(|e| OAuthClientError::UnexpectedError(e.to_string()))
}

/// Random value tying an authorization redirect to its callback.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}
