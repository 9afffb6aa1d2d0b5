pub mod rabbitmq_event_publisher;
pub mod recording_event_publisher;

pub use rabbitmq_event_publisher::RabbitMqEventPublisher;
pub use recording_event_publisher::RecordingEventPublisher;
