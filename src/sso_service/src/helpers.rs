use color_eyre::eyre::{Result, WrapErr};
use redis::aio::MultiplexedConnection;
use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};
use sso_adapters::{
    config::{PostgresSettings, RabbitMqSettings, RedisSettings},
    events::RabbitMqEventPublisher,
};

/// Connects to PostgreSQL and applies the pending migrations.
pub async fn configure_postgresql(settings: &PostgresSettings) -> Result<PgPool> {
    let pg_pool = get_postgres_pool(settings.url.expose_secret(), settings.max_connections)
        .await
        .wrap_err("Failed to create Postgres connection pool")?;

    sqlx::migrate!()
        .run(&pg_pool)
        .await
        .wrap_err("Failed to run migrations")?;

    Ok(pg_pool)
}

/// Opens a multiplexed Redis connection; clones of it share one socket.
pub async fn configure_redis(settings: &RedisSettings) -> Result<MultiplexedConnection> {
    get_redis_client(&settings.host_name)
        .wrap_err("Failed to get Redis client")?
        .get_multiplexed_async_connection()
        .await
        .wrap_err("Failed to get Redis connection")
}

pub async fn configure_rabbitmq(settings: &RabbitMqSettings) -> Result<RabbitMqEventPublisher> {
    RabbitMqEventPublisher::connect(settings.url.expose_secret(), &settings.exchange)
        .await
        .wrap_err("Failed to connect to RabbitMQ")
}

pub async fn get_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

pub fn get_redis_client(redis_hostname: &str) -> redis::RedisResult<redis::Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}
