//! Capability binding for one orchestrator run.

use std::collections::HashMap;

use crate::agent::AgentSpec;

/// The fixed agent/tool binding of one execution session.
///
/// Assembled once before the session opens and never mutated afterwards:
/// the tool and agent sets are immutable for the lifetime of one run.
#[derive(Debug, Clone, Default)]
pub struct CapabilitySet {
    agents: HashMap<String, AgentSpec>,
    allowed_tools: Vec<String>,
}

impl CapabilitySet {
    pub fn new(agents: HashMap<String, AgentSpec>, allowed_tools: Vec<String>) -> Self {
        Self {
            agents,
            allowed_tools,
        }
    }

    pub fn agent(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.get(name)
    }

    pub fn agents(&self) -> &HashMap<String, AgentSpec> {
        &self.agents
    }

    /// Allowed tool names, first-occurrence order.
    pub fn allowed_tools(&self) -> &[String] {
        &self.allowed_tools
    }

    pub fn permits(&self, tool_name: &str) -> bool {
        self.allowed_tools.iter().any(|t| t == tool_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CapabilitySet {
        let mut agents = HashMap::new();
        agents.insert(
            "analyzer".to_string(),
            AgentSpec::new("analyzer", "Analyzes code", "You analyze."),
        );
        CapabilitySet::new(agents, vec!["Read".to_string(), "Write".to_string()])
    }

    #[test]
    fn test_agent_lookup() {
        let caps = sample();
        assert!(caps.agent("analyzer").is_some());
        assert!(caps.agent("ghost").is_none());
    }

    #[test]
    fn test_permits() {
        let caps = sample();
        assert!(caps.permits("Read"));
        assert!(!caps.permits("Bash"));
    }
}
