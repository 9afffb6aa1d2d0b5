use std::sync::Arc;

use lapin::{
    BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind, options::*,
    types::FieldTable,
};
use serde::Serialize;
use sso_core::{
    EventPublisher, EventPublisherError, LOGIN_ROUTING_KEY, REGISTER_ROUTING_KEY, UserLoggedIn,
    UserRegistered,
};

/// Publishes identity events as persistent JSON messages on a durable topic
/// exchange and waits for the broker's confirm.
#[derive(Clone)]
pub struct RabbitMqEventPublisher {
    // Dropping the connection closes the channel.
    _connection: Arc<Connection>,
    channel: Channel,
    exchange: String,
}

impl RabbitMqEventPublisher {
    #[tracing::instrument(name = "Connecting to RabbitMQ", skip(url))]
    pub async fn connect(url: &str, exchange: &str) -> Result<Self, lapin::Error> {
        let connection = Connection::connect(
            url,
            ConnectionProperties::default().with_connection_name("sso".into()),
        )
        .await?;

        let channel = connection.create_channel().await?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await?;
        channel
            .exchange_declare(
                exchange,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        Ok(Self {
            _connection: Arc::new(connection),
            channel,
            exchange: exchange.to_owned(),
        })
    }

    async fn publish<T: Serialize>(
        &self,
        routing_key: &str,
        event: &T,
    ) -> Result<(), EventPublisherError> {
        let body = serde_json::to_vec(event)?;

        let confirmation = self
            .channel
            .basic_publish(
                &self.exchange,
                routing_key,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default()
                    .with_delivery_mode(2)
                    .with_content_type("application/json".into()),
            )
            .await
            .map_err(|e| EventPublisherError::PublishFailed(e.to_string()))?
            .await
            .map_err(|e| EventPublisherError::PublishFailed(e.to_string()))?;

        if confirmation.is_nack() {
            return Err(EventPublisherError::PublishFailed(format!(
                "broker rejected message for routing key {routing_key}"
            )));
        }

        tracing::debug!(exchange = %self.exchange, routing_key, "Event published");
        Ok(())
    }
}

#[async_trait::async_trait]
impl EventPublisher for RabbitMqEventPublisher {
    #[tracing::instrument(name = "Publishing registered event", skip_all)]
    async fn publish_registered(&self, event: UserRegistered) -> Result<(), EventPublisherError> {
        self.publish(REGISTER_ROUTING_KEY, &event).await
    }

    #[tracing::instrument(name = "Publishing logged in event", skip_all)]
    async fn publish_logged_in(&self, event: UserLoggedIn) -> Result<(), EventPublisherError> {
        self.publish(LOGIN_ROUTING_KEY, &event).await
    }
}
