use reqwest::header::{LOCATION, SET_COOKIE};
use sso_adapters::config::OAUTH_STATE_COOKIE;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{method, path},
};

use crate::helpers::{PASSWORD, TestApp, error_message, random_email};

/// Value of the `oauth_state` cookie set by the login redirect.
fn state_cookie(response: &reqwest::Response) -> String {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == OAUTH_STATE_COOKIE)
        .map(|(_, value)| value.to_owned())
        .expect("oauth_state cookie should be set")
}

#[tokio::test]
async fn login_redirects_to_google_with_a_state_cookie() {
    let app = TestApp::new().await;

    let response = app.get_google_login().await;

    assert_eq!(response.status().as_u16(), 307);
    let state = state_cookie(&response);
    let location = response.headers()[LOCATION].to_str().unwrap().to_owned();
    assert!(location.starts_with(&format!("{}/o/oauth2/auth", app.google_server.uri())));
    assert!(location.contains(&format!("state={state}")));
}

#[tokio::test]
async fn callback_returns_tokens_and_registers_the_user_once() {
    let app = TestApp::new().await;
    let email = random_email();
    app.mock_google_user(&email, "Alice").await;

    let state = state_cookie(&app.get_google_login().await);
    let first = app.get_google_callback("code-1", &state, Some(&state)).await;
    assert_eq!(first.status().as_u16(), 200);
    let first: serde_json::Value = first.json().await.unwrap();

    let state = state_cookie(&app.get_google_login().await);
    let second = app.get_google_callback("code-2", &state, Some(&state)).await;
    assert_eq!(second.status().as_u16(), 200);
    let second: serde_json::Value = second.json().await.unwrap();

    assert_ne!(first["refresh_token"], second["refresh_token"]);
    let first_claims = app.verify(first["access_token"].as_str().unwrap());
    let second_claims = app.verify(second["access_token"].as_str().unwrap());
    assert_eq!(first_claims.user_id, second_claims.user_id);

    let registered = app.publisher.registered().await;
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].name.as_deref(), Some("Alice"));

    let logged_in = app.publisher.logged_in().await;
    assert_eq!(logged_in.len(), 2);
    assert!(logged_in.iter().all(|event| event.method == "google"));
}

#[tokio::test]
async fn callback_links_google_to_an_existing_credentials_user() {
    let app = TestApp::new().await;
    let email = app.register_random_user().await;
    let user_id = app.publisher.registered().await[0].id.clone();
    app.mock_google_user(&email, "Alice").await;

    let state = state_cookie(&app.get_google_login().await);
    let response = app.get_google_callback("code", &state, Some(&state)).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(app.verify(body["access_token"].as_str().unwrap()).user_id, user_id);
    assert_eq!(app.publisher.registered().await.len(), 1);

    // The password login keeps working after linking.
    let (access_token, _) = app.login(&email).await;
    assert_eq!(app.verify(&access_token).user_id, user_id);
}

#[tokio::test]
async fn register_after_google_adds_a_password_without_a_new_event() {
    let app = TestApp::new().await;
    let email = random_email();
    app.mock_google_user(&email, "Bob").await;

    let state = state_cookie(&app.get_google_login().await);
    let response = app.get_google_callback("code", &state, Some(&state)).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .post_register(&serde_json::json!({ "email": email, "password": PASSWORD }))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(app.publisher.registered().await.len(), 1);
}

#[tokio::test]
async fn callback_with_mismatched_state_returns_400() {
    let app = TestApp::new().await;

    let missing_cookie = app.get_google_callback("code", "state", None).await;
    assert_eq!(missing_cookie.status().as_u16(), 400);

    let wrong_cookie = app
        .get_google_callback("code", "state", Some("other-state"))
        .await;
    assert_eq!(wrong_cookie.status().as_u16(), 400);
    assert_eq!(
        error_message(wrong_cookie).await,
        "Invalid input: OAuth state mismatch"
    );
}

#[tokio::test]
async fn callback_with_rejected_code_returns_401() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&app.google_server)
        .await;

    let state = state_cookie(&app.get_google_login().await);
    let response = app.get_google_callback("bad-code", &state, Some(&state)).await;

    assert_eq!(response.status().as_u16(), 401);
    assert!(app.publisher.registered().await.is_empty());
}
