//! Cross-orchestrator delegation registry.
//!
//! Lets one workflow invoke a named phase of another instead of
//! re-deriving its output. The registry only defines the contract:
//! context goes in as an opaque mapping, an opaque result comes back.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::{OrchestratorError, Result};

/// Opaque context passed along a cross-orchestrator call.
pub type DelegationContext = serde_json::Map<String, serde_json::Value>;

/// The callee side of a cross-orchestrator call.
#[async_trait]
pub trait PhaseDelegate: Send + Sync {
    async fn invoke_phase(
        &self,
        phase_name: &str,
        context: &DelegationContext,
    ) -> Result<serde_json::Value>;
}

/// Name-keyed mapping of live delegates, scoped to the lifetime of the
/// owning orchestrator.
#[derive(Default)]
pub struct OrchestratorRegistry {
    delegates: HashMap<String, Arc<dyn PhaseDelegate>>,
}

impl OrchestratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; last-write-wins.
    pub fn register(&mut self, name: impl Into<String>, delegate: Arc<dyn PhaseDelegate>) {
        self.delegates.insert(name.into(), delegate);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.delegates.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.delegates.keys().map(String::as_str).collect()
    }

    /// Delegate a phase to a registered orchestrator.
    pub async fn invoke(
        &self,
        name: &str,
        phase_name: &str,
        context: &DelegationContext,
    ) -> Result<serde_json::Value> {
        let delegate = self
            .delegates
            .get(name)
            .ok_or_else(|| OrchestratorError::NotRegistered(name.to_string()))?;

        info!(
            callee = name,
            phase = phase_name,
            context_keys = ?context.keys().collect::<Vec<_>>(),
            "Cross-orchestrator call"
        );

        delegate.invoke_phase(phase_name, context).await
    }
}

impl std::fmt::Debug for OrchestratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl PhaseDelegate for Echo {
        async fn invoke_phase(
            &self,
            phase_name: &str,
            context: &DelegationContext,
        ) -> Result<serde_json::Value> {
            Ok(json!({
                "phase": phase_name,
                "keys": context.keys().collect::<Vec<_>>(),
            }))
        }
    }

    #[tokio::test]
    async fn test_invoke_unregistered() {
        let registry = OrchestratorRegistry::new();
        let err = registry
            .invoke("ghost", "findings", &DelegationContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::NotRegistered(name) if name == "ghost"));
    }

    #[tokio::test]
    async fn test_invoke_registered() {
        let mut registry = OrchestratorRegistry::new();
        registry.register("review", Arc::new(Echo));

        let mut context = DelegationContext::new();
        context.insert("output_dir".to_string(), json!("repolens_output/arch"));

        let result = registry
            .invoke("review", "findings", &context)
            .await
            .unwrap();
        assert_eq!(result["phase"], "findings");
        assert_eq!(result["keys"][0], "output_dir");
    }

    #[tokio::test]
    async fn test_register_overwrites() {
        let mut registry = OrchestratorRegistry::new();
        registry.register("review", Arc::new(Echo));
        registry.register("review", Arc::new(Echo));
        assert_eq!(registry.names().len(), 1);
    }
}
