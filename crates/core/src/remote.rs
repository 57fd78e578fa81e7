//! RemoteToolProvider trait: the abstraction over external tool servers.
//!
//! A remote provider advertises a list of callable tools and executes them
//! on request. Its output shape is richer than a built-in tool's: content
//! arrives as text blocks (possibly JSON-encoded), an error flag, and
//! optional structured content. The result shape is modeled as a tagged
//! union here and normalized exactly once, at the dispatcher boundary.

use crate::error::DispatchError;
use crate::tool::ToolDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One content block in a remote tool response.
///
/// Blocks may mix formats within one response; any text-bearing block is
/// opportunistically parsed as JSON during normalization, per block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Text payload, when this block carries text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// The content of a remote tool response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteContent {
    /// A sequence of content blocks
    Blocks(Vec<ContentBlock>),
    /// A single text payload
    Text(String),
}

/// The raw output of a remote tool call, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteToolOutput {
    /// Response content
    pub content: RemoteContent,

    /// Application-level error flag: the tool ran but failed
    #[serde(default, alias = "isError")]
    pub is_error: bool,

    /// Optional structured content; preferred over `content` for error payloads
    #[serde(
        default,
        alias = "structuredContent",
        skip_serializing_if = "Option::is_none"
    )]
    pub structured_content: Option<serde_json::Value>,
}

/// An external tool server.
///
/// Providers may add or remove tools between turns, so the catalog binding
/// is recomputed every loop iteration.
#[async_trait]
pub trait RemoteToolProvider: Send + Sync {
    /// A stable identifier for this provider (used in logs and the catalog binding).
    fn name(&self) -> &str;

    /// Advertise the currently callable tools.
    async fn list_tools(&self) -> std::result::Result<Vec<ToolDescriptor>, DispatchError>;

    /// Execute a tool. `Err` means no result was produced at all
    /// (transport failure); an application-level failure comes back as
    /// `Ok` with `is_error` set.
    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<RemoteToolOutput, DispatchError>;
}
