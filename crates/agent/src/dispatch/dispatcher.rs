//! The tool dispatcher: routes each call to its owner under the approval
//! policy and folds every outcome into a result envelope.

use crate::dispatch::catalog::{ToolCatalog, ToolOwner};
use helmsman_config::ApprovalConfig;
use helmsman_core::error::DispatchError;
use helmsman_core::{
    AgentEvent, ApprovalGate, EventBus, Message, RemoteContent, RemoteToolOutput,
    RemoteToolProvider, ToolCallRequest, ToolRegistry, ToolResultEnvelope,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

/// Which tool names require gate approval before execution.
///
/// Membership is explicit: a name is sensitive iff it appears in one of the
/// configured sets. Tools outside both sets run without a prompt.
#[derive(Debug, Clone, Default)]
pub struct SensitivityPolicy {
    sensitive: HashSet<String>,
}

impl SensitivityPolicy {
    pub fn from_config(config: &ApprovalConfig) -> Self {
        let sensitive = config
            .dangerous
            .iter()
            .chain(config.approval_required.iter())
            .cloned()
            .collect();
        Self { sensitive }
    }

    pub fn is_sensitive(&self, name: &str) -> bool {
        self.sensitive.contains(name)
    }
}

/// Executes tool-call batches: approval gating, owner routing, result
/// normalization, and lifecycle events.
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    providers: HashMap<String, Arc<dyn RemoteToolProvider>>,
    gate: Arc<dyn ApprovalGate>,
    policy: SensitivityPolicy,
    events: Arc<EventBus>,
}

impl ToolDispatcher {
    pub fn new(
        registry: Arc<ToolRegistry>,
        providers: &[Arc<dyn RemoteToolProvider>],
        gate: Arc<dyn ApprovalGate>,
        policy: SensitivityPolicy,
        events: Arc<EventBus>,
    ) -> Self {
        let providers = providers
            .iter()
            .map(|p| (p.name().to_string(), Arc::clone(p)))
            .collect();
        Self {
            registry,
            providers,
            gate,
            policy,
            events,
        }
    }

    /// Execute every call in the batch concurrently and return one
    /// `tool`-role message per call, in call-issue order.
    pub async fn dispatch_all(
        &self,
        catalog: &ToolCatalog,
        calls: &[ToolCallRequest],
    ) -> Vec<Message> {
        let futures = calls.iter().map(|call| self.dispatch_one(catalog, call));
        let envelopes = futures::future::join_all(futures).await;

        calls
            .iter()
            .zip(envelopes)
            .map(|(call, envelope)| {
                let content = serde_json::to_string(&envelope)
                    .unwrap_or_else(|_| r#"{"success":false,"error":"no result"}"#.into());
                Message::tool_result(call.id.clone(), content)
            })
            .collect()
    }

    /// Execute a single call. Every failure mode is recovered into an
    /// envelope; nothing here aborts sibling dispatches.
    async fn dispatch_one(
        &self,
        catalog: &ToolCatalog,
        call: &ToolCallRequest,
    ) -> ToolResultEnvelope {
        let arguments: serde_json::Value = match serde_json::from_str(&call.arguments) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Malformed tool-call arguments");
                return ToolResultEnvelope::failure(format!(
                    "Invalid tool arguments: {e}"
                ));
            }
        };

        self.events.publish(AgentEvent::ToolStarted {
            tool_name: call.name.clone(),
            arguments: arguments.clone(),
            timestamp: chrono::Utc::now(),
        });
        let started = Instant::now();

        let envelope = self.route(catalog, &call.name, arguments).await;

        self.events.publish(AgentEvent::ToolFinished {
            tool_name: call.name.clone(),
            success: envelope.success,
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: chrono::Utc::now(),
        });
        envelope
    }

    async fn route(
        &self,
        catalog: &ToolCatalog,
        name: &str,
        arguments: serde_json::Value,
    ) -> ToolResultEnvelope {
        let owner = match catalog.owner(name) {
            Some(owner) => owner,
            None => {
                return ToolResultEnvelope::failure(
                    DispatchError::UnknownTool(name.to_string()).to_string(),
                )
            }
        };

        if self.policy.is_sensitive(name) && !self.gate.request(name, &arguments).await {
            tracing::info!(tool = %name, "Tool execution denied by the approval gate");
            return ToolResultEnvelope::failure(DispatchError::ApprovalDenied.to_string());
        }

        match owner {
            ToolOwner::Builtin => {
                // Registered name without an implementation means the
                // catalog and registry diverged mid-turn.
                let Some(tool) = self.registry.get(name) else {
                    return ToolResultEnvelope::failure(
                        DispatchError::UnknownTool(name.to_string()).to_string(),
                    );
                };
                match tool.execute(arguments).await {
                    Ok(envelope) => envelope,
                    Err(e) => ToolResultEnvelope::failure(e.to_string()),
                }
            }
            ToolOwner::Remote(provider_name) => {
                let Some(provider) = self.providers.get(provider_name) else {
                    return ToolResultEnvelope::failure(
                        DispatchError::ProviderUnavailable.to_string(),
                    );
                };
                match provider.call_tool(name, arguments).await {
                    Ok(output) => normalize_remote_output(output),
                    Err(e) => {
                        tracing::warn!(tool = %name, provider = %provider_name, error = %e,
                            "Remote tool call produced no result");
                        ToolResultEnvelope::failure(
                            DispatchError::ProviderUnavailable.to_string(),
                        )
                    }
                }
            }
        }
    }
}

/// Normalize a raw remote tool output into the uniform envelope.
///
/// Text blocks are parsed as JSON individually, falling back to the raw
/// text per block. On an application-level error, structured content is
/// preferred; otherwise the processed content is wrapped as
/// `{"result": ...}`.
fn normalize_remote_output(output: RemoteToolOutput) -> ToolResultEnvelope {
    let processed = match output.content {
        RemoteContent::Text(text) => parse_block(&text),
        RemoteContent::Blocks(blocks) => {
            let mut values: Vec<serde_json::Value> = blocks
                .into_iter()
                .filter_map(|b| b.text)
                .map(|t| parse_block(&t))
                .collect();
            match values.len() {
                0 => serde_json::Value::Null,
                1 => values.remove(0),
                _ => serde_json::Value::Array(values),
            }
        }
    };

    if output.is_error {
        let error_text = match &processed {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "tool execution failed".to_string(),
            other => other.to_string(),
        };
        let content = output.structured_content.unwrap_or_else(|| {
            let result = if processed.is_null() {
                serde_json::json!("tool execution failed")
            } else {
                processed
            };
            serde_json::json!({ "result": result })
        });
        return ToolResultEnvelope::failure_with_content(content, error_text);
    }

    match output.structured_content {
        Some(structured) => ToolResultEnvelope::ok(structured),
        None => ToolResultEnvelope::ok(processed),
    }
}

fn parse_block(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use helmsman_core::error::ToolError;
    use helmsman_core::{ContentBlock, Tool};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echo"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> std::result::Result<ToolResultEnvelope, ToolError> {
            Ok(ToolResultEnvelope::ok(arguments["text"].clone()))
        }
    }

    struct CountingDeleteTool {
        executions: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for CountingDeleteTool {
        fn name(&self) -> &str {
            "delete_file"
        }
        fn description(&self) -> &str {
            "delete"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }
        async fn execute(
            &self,
            _arguments: serde_json::Value,
        ) -> std::result::Result<ToolResultEnvelope, ToolError> {
            self.executions.fetch_add(1, Ordering::SeqCst);
            Ok(ToolResultEnvelope::ok(serde_json::json!("deleted")))
        }
    }

    /// A tool that sleeps, to exercise ordering under concurrency.
    struct SlowTool {
        name: &'static str,
        delay_ms: u64,
    }

    #[async_trait]
    impl Tool for SlowTool {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "slow"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }
        async fn execute(
            &self,
            _arguments: serde_json::Value,
        ) -> std::result::Result<ToolResultEnvelope, ToolError> {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            Ok(ToolResultEnvelope::ok(serde_json::json!(self.name)))
        }
    }

    fn dispatcher_with(registry: ToolRegistry, gate: Arc<dyn ApprovalGate>) -> ToolDispatcher {
        ToolDispatcher::new(
            Arc::new(registry),
            &[],
            gate,
            SensitivityPolicy::from_config(&ApprovalConfig::default()),
            Arc::new(EventBus::default()),
        )
    }

    fn call(id: &str, name: &str, args: &str) -> ToolCallRequest {
        ToolCallRequest {
            id: id.into(),
            name: name.into(),
            arguments: args.into(),
        }
    }

    fn envelope_of(message: &Message) -> ToolResultEnvelope {
        serde_json::from_str(&message.content).unwrap()
    }

    #[tokio::test]
    async fn unknown_tool_yields_failure_envelope() {
        let dispatcher = dispatcher_with(ToolRegistry::new(), Arc::new(helmsman_core::AutoApprove));
        let catalog = ToolCatalog::assemble(&ToolRegistry::new(), &[]).await;

        let results = dispatcher
            .dispatch_all(&catalog, &[call("c1", "foo", "{}")])
            .await;

        let envelope = envelope_of(&results[0]);
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("unknown tool: foo"));
    }

    #[tokio::test]
    async fn denial_blocks_execution() {
        let executions = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(CountingDeleteTool {
            executions: executions.clone(),
        }));
        let catalog = ToolCatalog::assemble(&registry, &[]).await;
        let dispatcher = dispatcher_with(registry, Arc::new(helmsman_core::DenyAll));

        let results = dispatcher
            .dispatch_all(&catalog, &[call("c1", "delete_file", "{}")])
            .await;

        let envelope = envelope_of(&results[0]);
        assert!(!envelope.success);
        assert_eq!(
            envelope.error.as_deref(),
            Some("Tool execution denied by user.")
        );
        assert_eq!(executions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_sensitive_tool_skips_gate() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let catalog = ToolCatalog::assemble(&registry, &[]).await;
        // DenyAll would refuse if asked; echo must not ask.
        let dispatcher = dispatcher_with(registry, Arc::new(helmsman_core::DenyAll));

        let results = dispatcher
            .dispatch_all(&catalog, &[call("c1", "echo", r#"{"text":"hi"}"#)])
            .await;

        assert!(envelope_of(&results[0]).success);
    }

    #[tokio::test]
    async fn results_keep_call_issue_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(SlowTool {
            name: "slow",
            delay_ms: 50,
        }));
        registry.register(Box::new(SlowTool {
            name: "fast",
            delay_ms: 0,
        }));
        let catalog = ToolCatalog::assemble(&registry, &[]).await;
        let dispatcher = dispatcher_with(registry, Arc::new(helmsman_core::AutoApprove));

        let results = dispatcher
            .dispatch_all(
                &catalog,
                &[call("c1", "slow", "{}"), call("c2", "fast", "{}")],
            )
            .await;

        assert_eq!(results[0].tool_call_id.as_deref(), Some("c1"));
        assert_eq!(results[1].tool_call_id.as_deref(), Some("c2"));
        assert_eq!(envelope_of(&results[0]).content, Some(serde_json::json!("slow")));
    }

    #[tokio::test]
    async fn malformed_arguments_recovered() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let catalog = ToolCatalog::assemble(&registry, &[]).await;
        let dispatcher = dispatcher_with(registry, Arc::new(helmsman_core::AutoApprove));

        let results = dispatcher
            .dispatch_all(&catalog, &[call("c1", "echo", "{not json")])
            .await;

        let envelope = envelope_of(&results[0]);
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().contains("Invalid tool arguments"));
    }

    #[test]
    fn normalize_parses_json_blocks() {
        let output = RemoteToolOutput {
            content: RemoteContent::Blocks(vec![ContentBlock::text(r#"{"files": 3}"#)]),
            is_error: false,
            structured_content: None,
        };
        let envelope = normalize_remote_output(output);
        assert!(envelope.success);
        assert_eq!(envelope.content, Some(serde_json::json!({"files": 3})));
    }

    #[test]
    fn normalize_falls_back_to_raw_text() {
        let output = RemoteToolOutput {
            content: RemoteContent::Blocks(vec![
                ContentBlock::text("plain text"),
                ContentBlock::text(r#"{"k":1}"#),
            ]),
            is_error: false,
            structured_content: None,
        };
        let envelope = normalize_remote_output(output);
        assert_eq!(
            envelope.content,
            Some(serde_json::json!(["plain text", {"k": 1}]))
        );
    }

    #[test]
    fn normalize_error_without_structured_content() {
        let output = RemoteToolOutput {
            content: RemoteContent::Blocks(vec![ContentBlock::text("boom")]),
            is_error: true,
            structured_content: None,
        };
        let envelope = normalize_remote_output(output);
        assert!(!envelope.success);
        assert_eq!(envelope.content, Some(serde_json::json!({"result": "boom"})));
    }

    #[test]
    fn normalize_error_prefers_structured_content() {
        let output = RemoteToolOutput {
            content: RemoteContent::Text("ignored".into()),
            is_error: true,
            structured_content: Some(serde_json::json!({"code": 7})),
        };
        let envelope = normalize_remote_output(output);
        assert!(!envelope.success);
        assert_eq!(envelope.content, Some(serde_json::json!({"code": 7})));
    }

    #[test]
    fn sensitivity_is_exact_name_membership() {
        let policy = SensitivityPolicy::from_config(&ApprovalConfig::default());
        assert!(policy.is_sensitive("delete_file"));
        assert!(policy.is_sensitive("create_file"));
        // Name containing "delete" is not sensitive unless listed.
        assert!(!policy.is_sensitive("undelete_helper"));
    }
}
