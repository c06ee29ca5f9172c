//! Agent capability records.

use serde::{Deserialize, Serialize};

/// Model identifier used when an agent record does not name one.
pub const DEFAULT_MODEL: &str = "sonnet";

/// Resolved capability record for one agent.
///
/// Immutable once constructed; identity is the `name` within one
/// orchestrator's catalog. Records are either built inline by a workflow
/// or parsed from a JSON file, in which case `description` and
/// `instructions` are required and `tools`/`model` fall back to their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Catalog key. Filled from the file stem when loaded from disk.
    #[serde(default)]
    pub name: String,
    /// One-line role description.
    pub description: String,
    /// Instruction text the agent runs under.
    pub instructions: String,
    /// Tool names this agent may invoke.
    #[serde(default)]
    pub tools: Vec<String>,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl AgentSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            instructions: instructions.into(),
            tools: Vec::new(),
            model: default_model(),
        }
    }

    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let spec = AgentSpec::new("analyzer", "Analyzes code", "You analyze code.");
        assert_eq!(spec.name, "analyzer");
        assert!(spec.tools.is_empty());
        assert_eq!(spec.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_deserialize_optional_fields() {
        let spec: AgentSpec = serde_json::from_str(
            r#"{"description": "Writes docs", "instructions": "You write docs."}"#,
        )
        .unwrap();
        assert!(spec.name.is_empty());
        assert!(spec.tools.is_empty());
        assert_eq!(spec.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_deserialize_missing_instructions_fails() {
        let result = serde_json::from_str::<AgentSpec>(r#"{"description": "Writes docs"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_with_tools_and_model() {
        let spec = AgentSpec::new("reviewer", "Reviews output", "You review.")
            .with_tools(["Read", "Grep"])
            .with_model("opus");
        assert_eq!(spec.tools, vec!["Read", "Grep"]);
        assert_eq!(spec.model, "opus");
    }
}
