//! Token estimation for budget enforcement.
//!
//! Estimates are a capacity-planning heuristic, not an exact tokenizer
//! match. The window only needs a consistent measure to decide when to
//! compact, so a cheap word/char formula is enough.

use helmsman_core::Message;

/// Pluggable token estimator.
pub trait TokenEstimator: Send + Sync {
    /// Estimated token count for a piece of text.
    fn estimate(&self, text: &str) -> usize;
}

/// Default estimator: `words * 1.3 + chars / 4`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl TokenEstimator for HeuristicEstimator {
    fn estimate(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let words = text.split_whitespace().count() as f64;
        let chars = text.chars().count() as f64;
        (words * 1.3 + chars / 4.0) as usize
    }
}

/// Full cost of one message, metadata included.
///
/// Line items: role = 1, content = estimate, each tool call = name + args
/// + 10 structure tokens, a tool_call_id = 5, plus 4 per-message overhead.
pub fn message_tokens(estimator: &dyn TokenEstimator, message: &Message) -> usize {
    let mut total = 1;
    total += estimator.estimate(&message.content);
    for call in &message.tool_calls {
        total += estimator.estimate(&call.name);
        total += estimator.estimate(&call.arguments);
        total += 10;
    }
    if message.tool_call_id.is_some() {
        total += 5;
    }
    total + 4
}
