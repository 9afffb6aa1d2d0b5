use std::time::Duration;

use color_eyre::eyre::Result;
use reqwest::Client as HttpClient;
use sso_adapters::{
    config::SsoSettings,
    oauth::GoogleOAuthClient,
    persistence::{PostgresIdentityStore, RedisSessionStore},
    token::JwtTokenSigner,
};
use sso_application::AuthService;
use sso_service::{
    SsoService,
    helpers::{configure_postgresql, configure_rabbitmq, configure_redis},
    init_tracing,
};
use tokio::net::TcpListener;

const OAUTH_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = SsoSettings::load()?;

    let pg_pool = configure_postgresql(&settings.postgres).await?;
    let redis_conn = configure_redis(&settings.redis).await?;
    let publisher = configure_rabbitmq(&settings.rabbitmq).await?;

    let auth = AuthService::new(
        PostgresIdentityStore::new(pg_pool),
        RedisSessionStore::new(redis_conn),
        publisher,
        JwtTokenSigner::new(settings.jwt_config()),
    );

    let http_client = HttpClient::builder().timeout(OAUTH_HTTP_TIMEOUT).build()?;
    let google = GoogleOAuthClient::new(settings.google_oauth_config(), http_client);

    let listener = TcpListener::bind(&settings.http_address).await?;
    tracing::info!("Starting SSO service...");

    SsoService::new(auth, google)
        .run_standalone(listener, Some(settings.allowed_origins()))
        .await?;

    Ok(())
}
