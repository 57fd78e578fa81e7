//! The context window: the live message sequence plus budget enforcement.

use crate::context::compactor;
use crate::context::token::{message_tokens, HeuristicEstimator, TokenEstimator};
use helmsman_config::ContextConfig;
use helmsman_core::{AgentEvent, EventBus, Message, Role};
use serde::Serialize;
use std::sync::Arc;

/// Upper bound on compaction rounds in one trimming pass.
const MAX_COMPACTION_ROUNDS: u32 = 3;

/// Statistics about the current window state.
#[derive(Debug, Clone, Serialize)]
pub struct ContextStats {
    pub total_messages: usize,
    pub total_tokens: usize,
    pub max_tokens: usize,
    pub utilization_pct: f64,
    pub summarization_count: u32,
    pub keep_recent: usize,
}

/// Owns the live message sequence and keeps it within the token budget.
///
/// All mutation goes through `append`, `compact`, and `clear`. The first
/// message is always the system message; compaction never touches it nor
/// the most recent `keep_recent` messages.
pub struct ContextWindow {
    messages: Vec<Message>,
    estimator: Arc<dyn TokenEstimator>,
    config: ContextConfig,
    summarization_count: u32,
    dirty: bool,
    events: Option<Arc<EventBus>>,
}

impl ContextWindow {
    pub fn new(system_prompt: impl Into<String>, config: ContextConfig) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
            estimator: Arc::new(HeuristicEstimator),
            config,
            summarization_count: 0,
            dirty: false,
            events: None,
        }
    }

    /// Swap in a different token estimator.
    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Publish `ContextCompacted` events to this bus.
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Append a message to the tail of the sequence.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.dirty = true;
    }

    /// Estimated token total across all live messages.
    pub fn total_tokens(&self) -> usize {
        self.messages
            .iter()
            .map(|m| message_tokens(self.estimator.as_ref(), m))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn summarization_count(&self) -> u32 {
        self.summarization_count
    }

    /// The budget-compliant view of the sequence, compacting first if the
    /// window has grown past the trigger threshold since the last call.
    ///
    /// Idempotent: with no intervening `append`, a second call returns the
    /// same sequence without compacting again.
    pub fn trimmed_view(&mut self) -> &[Message] {
        if self.dirty {
            let trigger =
                (self.config.max_tokens as f64 * self.config.trigger_ratio) as usize;
            let mut rounds = 0;
            while self.total_tokens() > trigger && rounds < MAX_COMPACTION_ROUNDS {
                if self.messages.len() <= self.config.keep_recent + 1 {
                    tracing::warn!(
                        total_tokens = self.total_tokens(),
                        max_tokens = self.config.max_tokens,
                        "Over token threshold but cannot compact without losing recent messages"
                    );
                    break;
                }
                if !self.compact() {
                    break;
                }
                rounds += 1;
            }
            let total = self.total_tokens();
            if total > self.config.max_tokens {
                tracing::warn!(
                    total_tokens = total,
                    max_tokens = self.config.max_tokens,
                    "Context exceeds budget; the completion request may be truncated"
                );
            }
            self.dirty = false;
        }
        &self.messages
    }

    /// Collapse everything between the system message and the most recent
    /// `keep_recent` messages into one summary message.
    ///
    /// Returns false when there is nothing to collapse.
    pub fn compact(&mut self) -> bool {
        if self.messages.len() <= self.config.keep_recent + 1 {
            return false;
        }
        let split = self.messages.len() - self.config.keep_recent;
        if split <= 1 {
            return false;
        }

        let to_summarize: Vec<Message> = self.messages.drain(1..split).collect();
        let tokens_before: usize = to_summarize
            .iter()
            .map(|m| message_tokens(self.estimator.as_ref(), m))
            .sum();

        let summary = Message::summary(compactor::summarize(
            self.summarization_count + 1,
            &to_summarize,
        ));
        let tokens_after = message_tokens(self.estimator.as_ref(), &summary);
        self.messages.insert(1, summary);
        self.summarization_count += 1;

        tracing::info!(
            messages_collapsed = to_summarize.len(),
            tokens_before,
            tokens_after,
            "Context compacted"
        );
        if let Some(events) = &self.events {
            events.publish(AgentEvent::ContextCompacted {
                messages_collapsed: to_summarize.len(),
                tokens_before,
                tokens_after,
                timestamp: chrono::Utc::now(),
            });
        }
        true
    }

    /// Reset the sequence, optionally keeping the system message.
    /// Also resets the summarization counter.
    pub fn clear(&mut self, keep_system: bool) {
        if keep_system && !self.messages.is_empty() && self.messages[0].role == Role::System {
            self.messages.truncate(1);
        } else {
            self.messages.clear();
        }
        self.summarization_count = 0;
        self.dirty = false;
    }

    pub fn stats(&self) -> ContextStats {
        let total_tokens = self.total_tokens();
        ContextStats {
            total_messages: self.messages.len(),
            total_tokens,
            max_tokens: self.config.max_tokens,
            utilization_pct: total_tokens as f64 / self.config.max_tokens as f64 * 100.0,
            summarization_count: self.summarization_count,
            keep_recent: self.config.keep_recent,
        }
    }
}
