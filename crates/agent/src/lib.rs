//! # Helmsman Agent
//!
//! The orchestration core: the turn loop that alternates between completion
//! requests and tool dispatch, the bounded context window that keeps the
//! transcript inside its token budget, and the dispatcher that routes tool
//! calls to built-in or remote providers under the approval policy.

pub mod context;
pub mod dispatch;
pub mod orchestrator;

pub use context::{ContextStats, ContextWindow, HeuristicEstimator, TokenEstimator};
pub use dispatch::{SensitivityPolicy, ToolCatalog, ToolDispatcher, ToolOwner};
pub use orchestrator::{OrchestrationLoop, TurnOutcome};
