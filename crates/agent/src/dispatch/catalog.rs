//! The tool catalog: one merged namespace over built-in and remote tools.

use helmsman_core::{RemoteToolProvider, ToolDescriptor, ToolRegistry};
use std::collections::HashMap;
use std::sync::Arc;

/// Who executes a given tool name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOwner {
    Builtin,
    Remote(String),
}

/// A snapshot of the callable tools and their owners.
///
/// Providers may add or remove tools between turns, so a catalog is only
/// valid for the loop iteration that assembled it.
pub struct ToolCatalog {
    descriptors: Vec<ToolDescriptor>,
    owners: HashMap<String, ToolOwner>,
}

impl ToolCatalog {
    /// Merge the built-in registry with every remote provider's advertised
    /// tools. First registration wins on name collisions: built-ins first,
    /// then providers in registration order. A provider whose listing fails
    /// is skipped for this turn.
    pub async fn assemble(
        registry: &ToolRegistry,
        providers: &[Arc<dyn RemoteToolProvider>],
    ) -> Self {
        let mut descriptors = Vec::new();
        let mut owners = HashMap::new();

        for descriptor in registry.descriptors() {
            owners.insert(descriptor.name.clone(), ToolOwner::Builtin);
            descriptors.push(descriptor);
        }

        for provider in providers {
            let listed = match provider.list_tools().await {
                Ok(listed) => listed,
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        error = %e,
                        "Remote provider listing failed; skipping for this turn"
                    );
                    continue;
                }
            };
            for descriptor in listed {
                if owners.contains_key(&descriptor.name) {
                    tracing::warn!(
                        tool = %descriptor.name,
                        provider = provider.name(),
                        "Tool name collision; keeping earlier registration"
                    );
                    continue;
                }
                owners.insert(
                    descriptor.name.clone(),
                    ToolOwner::Remote(provider.name().to_string()),
                );
                descriptors.push(descriptor);
            }
        }

        Self {
            descriptors,
            owners,
        }
    }

    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    pub fn owner(&self, name: &str) -> Option<&ToolOwner> {
        self.owners.get(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use helmsman_core::error::{DispatchError, ToolError};
    use helmsman_core::{RemoteToolOutput, Tool, ToolResultEnvelope};

    struct LocalTool(&'static str);

    #[async_trait]
    impl Tool for LocalTool {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "local"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }
        async fn execute(
            &self,
            _arguments: serde_json::Value,
        ) -> std::result::Result<ToolResultEnvelope, ToolError> {
            Ok(ToolResultEnvelope::ok(serde_json::Value::Null))
        }
    }

    struct FakeProvider {
        name: &'static str,
        tools: Vec<&'static str>,
        fail_listing: bool,
    }

    #[async_trait]
    impl RemoteToolProvider for FakeProvider {
        fn name(&self) -> &str {
            self.name
        }
        async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, DispatchError> {
            if self.fail_listing {
                return Err(DispatchError::ProviderExecution("listing down".into()));
            }
            Ok(self
                .tools
                .iter()
                .map(|n| ToolDescriptor {
                    name: n.to_string(),
                    description: "remote".into(),
                    parameters: serde_json::json!({"type": "object"}),
                })
                .collect())
        }
        async fn call_tool(
            &self,
            _name: &str,
            _arguments: serde_json::Value,
        ) -> Result<RemoteToolOutput, DispatchError> {
            Err(DispatchError::ProviderUnavailable)
        }
    }

    #[tokio::test]
    async fn builtins_win_name_collisions() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(LocalTool("shared")));
        let providers: Vec<Arc<dyn RemoteToolProvider>> = vec![Arc::new(FakeProvider {
            name: "remote-a",
            tools: vec!["shared", "remote_only"],
            fail_listing: false,
        })];

        let catalog = ToolCatalog::assemble(&registry, &providers).await;
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.owner("shared"), Some(&ToolOwner::Builtin));
        assert_eq!(
            catalog.owner("remote_only"),
            Some(&ToolOwner::Remote("remote-a".into()))
        );
    }

    #[tokio::test]
    async fn earlier_provider_wins() {
        let registry = ToolRegistry::new();
        let providers: Vec<Arc<dyn RemoteToolProvider>> = vec![
            Arc::new(FakeProvider {
                name: "first",
                tools: vec!["dup"],
                fail_listing: false,
            }),
            Arc::new(FakeProvider {
                name: "second",
                tools: vec!["dup"],
                fail_listing: false,
            }),
        ];

        let catalog = ToolCatalog::assemble(&registry, &providers).await;
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.owner("dup"), Some(&ToolOwner::Remote("first".into())));
    }

    #[tokio::test]
    async fn failed_listing_is_skipped() {
        let registry = ToolRegistry::new();
        let providers: Vec<Arc<dyn RemoteToolProvider>> = vec![
            Arc::new(FakeProvider {
                name: "down",
                tools: vec!["ghost"],
                fail_listing: true,
            }),
            Arc::new(FakeProvider {
                name: "up",
                tools: vec!["alive"],
                fail_listing: false,
            }),
        ];

        let catalog = ToolCatalog::assemble(&registry, &providers).await;
        assert!(catalog.owner("ghost").is_none());
        assert!(catalog.owner("alive").is_some());
    }
}
