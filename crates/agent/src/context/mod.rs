//! Bounded context management: token estimation, the context window, and
//! the summary compactor that collapses older turns.

mod compactor;
mod token;
mod window;

pub use token::{message_tokens, HeuristicEstimator, TokenEstimator};
pub use window::{ContextStats, ContextWindow};
