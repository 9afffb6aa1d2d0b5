use fake::{Fake, faker::internet::en::SafeEmail};
use reqwest::{Client, Response, redirect::Policy};
use secrecy::Secret;
use serde_json::{Value, json};
use sso_adapters::{
    config::{OAUTH_STATE_COOKIE, test},
    events::RecordingEventPublisher,
    oauth::{GoogleOAuthClient, GoogleOAuthConfig},
    persistence::{HashMapIdentityStore, HashMapSessionStore},
    token::{JwtTokenSigner, jwt_token_signer::JwtConfig},
};
use sso_application::AuthService;
use sso_core::{AccessTokenClaims, TokenSigner};
use sso_service::SsoService;
use tokio::net::TcpListener;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub address: String,
    pub http_client: Client,
    pub publisher: RecordingEventPublisher,
    pub google_server: MockServer,
    signer: JwtTokenSigner,
}

impl TestApp {
    /// Serves the real router on an ephemeral port, backed by in-memory stores
    /// and a wiremock stand-in for Google.
    pub async fn new() -> Self {
        let google_server = MockServer::start().await;
        let publisher = RecordingEventPublisher::new();
        let signer = JwtTokenSigner::new(JwtConfig::new(Secret::from(
            test::JWT_SECRET.to_owned(),
        )));

        let auth = AuthService::new(
            HashMapIdentityStore::new(),
            HashMapSessionStore::new(),
            publisher.clone(),
            signer.clone(),
        );
        let google = GoogleOAuthClient::new(
            GoogleOAuthConfig {
                client_id: "client-id".to_owned(),
                client_secret: Secret::from("client-secret".to_owned()),
                redirect_url: "http://localhost/auth/google/callback".to_owned(),
                auth_url: format!("{}/o/oauth2/auth", google_server.uri()),
                token_url: format!("{}/token", google_server.uri()),
                userinfo_url: format!("{}/userinfo", google_server.uri()),
            },
            Client::new(),
        );

        let listener = TcpListener::bind(test::APP_ADDRESS)
            .await
            .expect("Failed to bind test listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(SsoService::new(auth, google).run_standalone(listener, None));

        let http_client = Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            address,
            http_client,
            publisher,
            google_server,
            signer,
        }
    }

    pub async fn post_register(&self, body: &Value) -> Response {
        self.post("/register", body).await
    }

    pub async fn post_login(&self, body: &Value) -> Response {
        self.post("/login", body).await
    }

    pub async fn post_refresh(&self, refresh_token: &str) -> Response {
        self.post("/refresh", &json!({ "refresh_token": refresh_token }))
            .await
    }

    pub async fn post_logout(&self, refresh_token: &str) -> Response {
        self.post("/logout", &json!({ "refresh_token": refresh_token }))
            .await
    }

    pub async fn get_google_login(&self) -> Response {
        self.http_client
            .get(format!("{}/auth/google", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_google_callback(
        &self,
        code: &str,
        state: &str,
        cookie_state: Option<&str>,
    ) -> Response {
        let mut request = self
            .http_client
            .get(format!("{}/auth/google/callback", self.address))
            .query(&[("code", code), ("state", state)]);
        if let Some(cookie_state) = cookie_state {
            request = request.header("cookie", format!("{OAUTH_STATE_COOKIE}={cookie_state}"));
        }
        request.send().await.expect("Failed to execute request")
    }

    async fn post(&self, route: &str, body: &Value) -> Response {
        self.http_client
            .post(format!("{}{}", self.address, route))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Registers a fresh random user and returns its email.
    pub async fn register_random_user(&self) -> String {
        let email = random_email();
        let response = self
            .post_register(&json!({ "email": email, "password": PASSWORD }))
            .await;
        assert_eq!(response.status().as_u16(), 201);
        email
    }

    /// Logs in and returns the `(access_token, refresh_token)` pair.
    pub async fn login(&self, email: &str) -> (String, String) {
        let response = self
            .post_login(&json!({ "email": email, "password": PASSWORD }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        (
            body["access_token"].as_str().unwrap().to_owned(),
            body["refresh_token"].as_str().unwrap().to_owned(),
        )
    }

    pub fn verify(&self, access_token: &str) -> AccessTokenClaims {
        self.signer
            .verify(access_token)
            .expect("Access token should verify")
    }

    /// Makes the fake IdP accept any code and return the given profile.
    pub async fn mock_google_user(&self, email: &str, name: &str) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "access_token": "google-token" })),
            )
            .mount(&self.google_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "email": email,
                "name": name,
                "picture": "https://img.example/avatar.png"
            })))
            .mount(&self.google_server)
            .await;
    }
}

pub fn random_email() -> String {
    SafeEmail().fake()
}

pub async fn error_message(response: Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["error"].as_str().unwrap().to_owned()
}
