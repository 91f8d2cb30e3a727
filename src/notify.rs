//! Resource-change notification port
//!
//! Tools that change the library signal through a [`ChangeNotifier`]. Delivery
//! is best effort: callers log a failed publish and carry on.

use crate::protocol::messages::JsonRpcNotification;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

pub const RESOURCES_LIST_CHANGED: &str = "notifications/resources/list_changed";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification channel closed")]
    Closed,
    #[error("Notification channel full")]
    Full,
    #[error("Failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Publishes "the resource list changed" to interested clients
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    async fn publish_change(&self) -> Result<(), NotifyError>;
}

/// Notifier used when no protocol session is attached
#[derive(Debug, Default, Clone)]
pub struct NoopNotifier;

#[async_trait]
impl ChangeNotifier for NoopNotifier {
    async fn publish_change(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Writes `notifications/resources/list_changed` onto the session's outbound line channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    outbound: mpsc::Sender<String>,
}

impl ChannelNotifier {
    pub fn new(outbound: mpsc::Sender<String>) -> Self {
        Self { outbound }
    }
}

#[async_trait]
impl ChangeNotifier for ChannelNotifier {
    async fn publish_change(&self) -> Result<(), NotifyError> {
        let notification = JsonRpcNotification::new(RESOURCES_LIST_CHANGED, None);
        let line = serde_json::to_string(&notification)?;

        // Never wait on a slow client.
        self.outbound.try_send(line).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => NotifyError::Full,
            mpsc::error::TrySendError::Closed(_) => NotifyError::Closed,
        })
    }
}
