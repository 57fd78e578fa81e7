//! CompletionClient trait: the abstraction over the language-completion service.
//!
//! A CompletionClient knows how to send a transcript plus a tool catalog to
//! an LLM endpoint and get back a message that is either final content or a
//! batch of tool-call requests.
//!
//! Implementations: OpenAI-compatible endpoints (OpenAI, Groq, OpenRouter,
//! Ollama), custom in-process mocks for testing.

use crate::error::CompletionError;
use crate::message::Message;
use crate::tool::ToolDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A completion request: the budget-compliant transcript view plus the
/// current tool catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "openai/gpt-oss-120b")
    pub model: String,

    /// The transcript messages, system message first
    pub messages: Vec<Message>,

    /// Available tools the model can call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDescriptor>,

    /// Tool choice policy; always "auto" in the orchestration loop
    #[serde(default = "default_tool_choice")]
    pub tool_choice: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_tool_choice() -> String {
    "auto".into()
}

fn default_temperature() -> f32 {
    0.7
}

/// A complete response from the completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated message. A non-empty `tool_calls` field is
    /// authoritative over `content`.
    pub message: Message,

    /// Token usage statistics, when the provider reports them
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The completion-service trait.
///
/// The orchestration loop calls `complete()` without knowing which backend
/// is in use; the backend is chosen at wiring time.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// A human-readable name for this client (e.g., "groq", "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let json = serde_json::json!({
            "model": "gpt-4o",
            "messages": [],
        });
        let req: CompletionRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.tool_choice, "auto");
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.tools.is_empty());
    }
}
