use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sso_core::{EventPublisher, EventPublisherError, UserLoggedIn, UserRegistered};
use tokio::sync::RwLock;

/// In-memory publisher that keeps every event it is handed.
///
/// It can be switched into a failing mode, in which every publish returns
/// `PublishFailed` and nothing is recorded.
#[derive(Clone, Default)]
pub struct RecordingEventPublisher {
    registered: Arc<RwLock<Vec<UserRegistered>>>,
    logged_in: Arc<RwLock<Vec<UserLoggedIn>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn registered(&self) -> Vec<UserRegistered> {
        self.registered.read().await.clone()
    }

    pub async fn logged_in(&self) -> Vec<UserLoggedIn> {
        self.logged_in.read().await.clone()
    }

    fn ensure_available(&self) -> Result<(), EventPublisherError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EventPublisherError::PublishFailed(
                "broker unavailable".to_owned(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish_registered(&self, event: UserRegistered) -> Result<(), EventPublisherError> {
        self.ensure_available()?;
        self.registered.write().await.push(event);
        Ok(())
    }

    async fn publish_logged_in(&self, event: UserLoggedIn) -> Result<(), EventPublisherError> {
        self.ensure_available()?;
        self.logged_in.write().await.push(event);
        Ok(())
    }
}
