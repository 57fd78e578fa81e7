//! The turn orchestration loop.
//!
//! One turn: append the user message, then alternate between completion
//! requests and tool dispatch until the model answers without tool calls
//! or the iteration ceiling is hit.

use crate::context::ContextWindow;
use crate::dispatch::{SensitivityPolicy, ToolCatalog, ToolDispatcher};
use helmsman_config::AppConfig;
use helmsman_core::error::CompletionError;
use helmsman_core::{
    AgentEvent, ApprovalGate, AutoApprove, CompletionClient, CompletionRequest, EventBus, Message,
    RemoteToolProvider, ToolRegistry,
};
use std::sync::Arc;
use tokio::sync::broadcast;

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model produced a final answer.
    Final(String),
    /// The iteration ceiling was hit; the turn is over, the session is not.
    MaxIterations(u32),
}

/// Drives one conversation: owns the context window, rebuilds the tool
/// catalog every iteration, and routes tool calls through the dispatcher.
pub struct OrchestrationLoop {
    client: Arc<dyn CompletionClient>,
    registry: Arc<ToolRegistry>,
    providers: Vec<Arc<dyn RemoteToolProvider>>,
    gate: Arc<dyn ApprovalGate>,
    policy: SensitivityPolicy,
    events: Arc<EventBus>,
    window: ContextWindow,
    model: String,
    temperature: f32,
    max_iterations: u32,
}

impl OrchestrationLoop {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        system_prompt: impl Into<String>,
        config: &AppConfig,
    ) -> Self {
        let events = Arc::new(EventBus::default());
        Self {
            client,
            registry: Arc::new(ToolRegistry::new()),
            providers: Vec::new(),
            gate: Arc::new(AutoApprove),
            policy: SensitivityPolicy::from_config(&config.approval),
            window: ContextWindow::new(system_prompt, config.context.clone())
                .with_events(Arc::clone(&events)),
            events,
            model: config.default_model.clone(),
            temperature: config.default_temperature,
            max_iterations: config.max_iterations,
        }
    }

    /// Use this registry of built-in tools.
    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Attach a remote tool provider. Providers are consulted for the
    /// catalog in the order they were attached.
    pub fn with_provider(mut self, provider: Arc<dyn RemoteToolProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Gate consulted before sensitive tool calls.
    pub fn with_approval_gate(mut self, gate: Arc<dyn ApprovalGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Subscribe to lifecycle events for this conversation.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<AgentEvent>> {
        self.events.subscribe()
    }

    pub fn window(&self) -> &ContextWindow {
        &self.window
    }

    /// Run one full turn for a user input.
    ///
    /// Tool-level failures never surface here; only completion-transport
    /// failures and the iteration ceiling end the turn early.
    pub async fn run_turn(&mut self, user_input: &str) -> Result<TurnOutcome, CompletionError> {
        self.window.append(Message::user(user_input));

        let dispatcher = ToolDispatcher::new(
            Arc::clone(&self.registry),
            &self.providers,
            Arc::clone(&self.gate),
            self.policy.clone(),
            Arc::clone(&self.events),
        );

        for iteration in 1..=self.max_iterations {
            // Providers may change their tool set between iterations.
            let catalog = ToolCatalog::assemble(&self.registry, &self.providers).await;

            let request = CompletionRequest {
                model: self.model.clone(),
                messages: self.window.trimmed_view().to_vec(),
                tools: catalog.descriptors().to_vec(),
                tool_choice: "auto".into(),
                temperature: self.temperature,
            };

            tracing::debug!(
                iteration,
                messages = request.messages.len(),
                tools = request.tools.len(),
                "Requesting completion"
            );
            let response = self.client.complete(request).await?;
            let reply = response.message;

            if reply.tool_calls.is_empty() {
                let content = reply.content.clone();
                self.window.append(reply);
                self.events.publish(AgentEvent::FinalMessage {
                    content: content.clone(),
                    timestamp: chrono::Utc::now(),
                });
                return Ok(TurnOutcome::Final(content));
            }

            // The assistant message with its raw call requests goes into
            // the transcript before any result does.
            let calls = reply.tool_calls.clone();
            self.window.append(reply);

            let results = dispatcher.dispatch_all(&catalog, &calls).await;
            for message in results {
                self.window.append(message);
            }
        }

        tracing::warn!(
            iterations = self.max_iterations,
            "Turn hit the iteration ceiling"
        );
        self.events.publish(AgentEvent::TurnAborted {
            iterations: self.max_iterations,
            timestamp: chrono::Utc::now(),
        });
        self.window.append(Message::assistant(
            "Max tool iterations reached. Please try again.",
        ));
        Ok(TurnOutcome::MaxIterations(self.max_iterations))
    }

    /// Reset the conversation: clear the window (keeping the system
    /// message) and the summarization counter. Providers are untouched.
    pub fn reset(&mut self) {
        self.window.clear(true);
        tracing::info!("Conversation reset");
    }

    /// Window statistics for display.
    pub fn stats(&self) -> crate::context::ContextStats {
        self.window.stats()
    }
}
