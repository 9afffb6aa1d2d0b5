use crate::helpers::TestApp;

#[tokio::test]
async fn should_return_200_ok_and_revoke_the_token() {
    let app = TestApp::new().await;
    let email = app.register_random_user().await;
    let (_, refresh_token) = app.login(&email).await;

    let response = app.post_logout(&refresh_token).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);

    assert_eq!(app.post_refresh(&refresh_token).await.status().as_u16(), 401);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let app = TestApp::new().await;
    let email = app.register_random_user().await;
    let (_, refresh_token) = app.login(&email).await;

    assert_eq!(app.post_logout(&refresh_token).await.status().as_u16(), 200);
    assert_eq!(app.post_logout(&refresh_token).await.status().as_u16(), 200);
    assert_eq!(app.post_logout("never-issued").await.status().as_u16(), 200);
}
