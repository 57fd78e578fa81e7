//! Tool trait and registry: the abstraction over built-in agent capabilities.
//!
//! Tools are what give the agent the ability to act in the world:
//! read/write files, run shell commands, fetch URLs, etc.

use crate::error::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tool definition sent to the completion service so it knows what it can call.
///
/// Built-in and remote tool names share one namespace in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// The tool name (globally unique across the catalog)
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// The uniform result of a tool execution, whatever the provider kind.
///
/// Always serialized into the content of exactly one `tool`-role message
/// whose `tool_call_id` matches the originating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResultEnvelope {
    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,

    /// Error text when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResultEnvelope {
    /// A successful result carrying content.
    pub fn ok(content: serde_json::Value) -> Self {
        Self {
            success: true,
            content: Some(content),
            error: None,
        }
    }

    /// A failure result carrying an error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            error: Some(error.into()),
        }
    }

    /// A failure result that still carries content for the model to inspect.
    pub fn failure_with_content(content: serde_json::Value, error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: Some(content),
            error: Some(error.into()),
        }
    }
}

/// The core Tool trait for in-process tools.
///
/// Each built-in tool (read_file, create_file, execute_command, url_fetch,
/// etc.) implements this trait. Tools are registered in the ToolRegistry and
/// merged into the catalog alongside remote providers' tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "read_file", "execute_command").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    ///
    /// Internal faults should be returned, not panicked; the dispatcher
    /// recovers `Err` into a failure envelope so no fault escapes a single
    /// call dispatch.
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResultEnvelope, ToolError>;

    /// Convert this tool into a ToolDescriptor for the catalog.
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of built-in tools.
///
/// The dispatcher uses this to look up and execute in-process tools;
/// the catalog merges its descriptors with remote providers' tools.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. First registration wins: a tool with a name already
    /// present is ignored, keeping catalog binding deterministic.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            tracing::warn!(tool = %name, "Duplicate tool registration ignored");
            return;
        }
        self.order.push(name.clone());
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Whether a tool with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool descriptors in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.order
            .iter()
            .filter_map(|n| self.tools.get(n))
            .map(|t| t.descriptor())
            .collect()
    }

    /// List all registered tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
