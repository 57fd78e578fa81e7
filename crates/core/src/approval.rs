//! ApprovalGate trait: the asynchronous yes/no decision point consulted
//! before executing any sensitive tool.
//!
//! Implementations: a stdin prompt in the CLI, channel-backed gates in
//! embedding applications, fixed-answer gates in tests.

use async_trait::async_trait;

/// An external approval decision point.
///
/// The dispatcher awaits this before executing a sensitive tool; a `false`
/// answer synthesizes a denial envelope and the tool is never invoked.
#[async_trait]
pub trait ApprovalGate: Send + Sync {
    async fn request(&self, tool_name: &str, arguments: &serde_json::Value) -> bool;
}

/// A gate that approves everything. Suitable for non-interactive use where
/// the sensitive sets are empty or trust is established elsewhere.
pub struct AutoApprove;

#[async_trait]
impl ApprovalGate for AutoApprove {
    async fn request(&self, _tool_name: &str, _arguments: &serde_json::Value) -> bool {
        true
    }
}

/// A gate that denies everything.
pub struct DenyAll;

#[async_trait]
impl ApprovalGate for DenyAll {
    async fn request(&self, _tool_name: &str, _arguments: &serde_json::Value) -> bool {
        false
    }
}
