//! Lifecycle event system: fire-and-forget notifications from the loop.
//!
//! Events are published when something interesting happens during a turn:
//! a tool starts or finishes, the context window is compacted, a turn ends.
//! Front-ends subscribe for display; nothing in the loop consumes a return
//! value from a subscriber.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All lifecycle events emitted by the orchestration loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgentEvent {
    /// A tool call is about to execute
    ToolStarted {
        tool_name: String,
        arguments: serde_json::Value,
        timestamp: DateTime<Utc>,
    },

    /// A tool call finished (success or failure)
    ToolFinished {
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The turn produced a final answer
    FinalMessage {
        content: String,
        timestamp: DateTime<Utc>,
    },

    /// Older messages were collapsed into a summary
    ContextCompacted {
        messages_collapsed: usize,
        tokens_before: usize,
        tokens_after: usize,
        timestamp: DateTime<Utc>,
    },

    /// The turn hit the iteration ceiling
    TurnAborted {
        iterations: u32,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for lifecycle events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub. Subscribers
/// receive all events and filter for what they care about.
pub struct EventBus {
    sender: broadcast::Sender<Arc<AgentEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: AgentEvent) {
        // Ignore send errors (no subscribers = that's fine)
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<AgentEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(AgentEvent::ToolFinished {
            tool_name: "execute_command".into(),
            success: true,
            duration_ms: 42,
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            AgentEvent::ToolFinished {
                tool_name, success, ..
            } => {
                assert_eq!(tool_name, "execute_command");
                assert!(success);
            }
            _ => panic!("Expected ToolFinished event"),
        }
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(AgentEvent::TurnAborted {
            iterations: 10,
            timestamp: Utc::now(),
        });
    }
}
