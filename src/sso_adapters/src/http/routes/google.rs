use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;
use sso_application::AuthOperations;
use sso_core::AccountProvider;

use super::error::AuthApiError;
use crate::config::OAUTH_STATE_COOKIE;
use crate::http::{AppState, ClientIp};
use crate::oauth::generate_state;

#[derive(Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: String,
    pub state: String,
}

/// Starts the consent flow: remembers a random state in a cookie and
/// redirects to Google.
#[tracing::instrument(name = "Google login", skip_all)]
pub async fn google_login<A>(
    State(state): State<AppState<A>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthApiError>
where
    A: AuthOperations,
{
    let oauth_state = generate_state();
    let url = state.google.authorization_url(&oauth_state)?;

    let cookie = Cookie::build((OAUTH_STATE_COOKIE, oauth_state))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Redirect::temporary(url.as_str())))
}

#[tracing::instrument(name = "Google callback", skip_all, fields(ip = %ip))]
pub async fn google_callback<A>(
    State(state): State<AppState<A>>,
    ClientIp(ip): ClientIp,
    jar: CookieJar,
    Query(query): Query<GoogleCallbackQuery>,
) -> Result<impl IntoResponse, AuthApiError>
where
    A: AuthOperations,
{
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_owned());
    if expected_state.as_deref() != Some(query.state.as_str()) {
        return Err(AuthApiError::InvalidInput(
            "OAuth state mismatch".to_owned(),
        ));
    }

    let user_info = state.google.authenticate(&query.code).await?;
    let tokens = state
        .auth
        .oauth(user_info, AccountProvider::Google, &ip)
        .await?;

    let jar = jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path("/"));
    Ok((StatusCode::OK, jar, Json(tokens)))
}
