use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

/// Whether an outcome is surfaced as a success or an error notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeLevel {
    Success,
    Error,
}

/// Outcome notification emitted after a mutation attempt resolves; the
/// rendering layer turns these into toasts.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeEvent {
    pub entity: String,
    pub operation: String,
    pub level: OutcomeLevel,
    pub message: String,
    pub context: Value,
    pub published_at: DateTime<Utc>,
}

/// Broadcast publisher for outcome notifications
#[derive(Debug, Clone)]
pub struct OutcomePublisher {
    sender: broadcast::Sender<OutcomeEvent>,
}

impl OutcomePublisher {
    /// Create a new publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn success(
        &self,
        entity: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.publish(OutcomeEvent {
            entity: entity.into(),
            operation: operation.into(),
            level: OutcomeLevel::Success,
            message: message.into(),
            context: Value::Null,
            published_at: Utc::now(),
        });
    }

    pub fn error(
        &self,
        entity: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.publish(OutcomeEvent {
            entity: entity.into(),
            operation: operation.into(),
            level: OutcomeLevel::Error,
            message: message.into(),
            context: Value::Null,
            published_at: Utc::now(),
        });
    }

    /// Publish an event. A send with no subscribers is not an error; outcomes
    /// are emitted whether or not anything is listening.
    pub fn publish(&self, event: OutcomeEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to outcome notifications
    pub fn subscribe(&self) -> broadcast::Receiver<OutcomeEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for OutcomePublisher {
    fn default() -> Self {
        Self::new(256)
    }
}
