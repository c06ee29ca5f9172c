//! Registry of known tool servers.
//!
//! A static catalog describing the integration servers repolens knows
//! how to work with: what tools they provide, whether they are usable
//! without configuration, and what to fall back to when one is missing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Description of one known tool server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSpec {
    pub description: String,
    pub available: bool,
    pub tools: Vec<String>,
    #[serde(default)]
    pub forbidden_tools: Vec<String>,
    pub config_required: bool,
}

/// Catalog of known tool servers keyed by name.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    servers: BTreeMap<String, ServerSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            servers: Self::builtin_servers(),
        }
    }

    fn builtin_servers() -> BTreeMap<String, ServerSpec> {
        let mut servers = BTreeMap::new();
        servers.insert(
            "figma".to_string(),
            ServerSpec {
                description: "Figma server for design context".to_string(),
                available: false,
                tools: strings(&["figma_get_file", "figma_get_components"]),
                forbidden_tools: Vec::new(),
                config_required: true,
            },
        );
        servers.insert(
            "pulumi".to_string(),
            ServerSpec {
                description: "Pulumi server for infrastructure context (read-only)".to_string(),
                available: false,
                tools: strings(&[
                    "mcp__pulumi__get-stacks",
                    "mcp__pulumi__resource-search",
                    "mcp__pulumi__get-policy-violations",
                    "mcp__pulumi__list-resources",
                    "mcp__pulumi__list-functions",
                ]),
                forbidden_tools: strings(&[
                    "mcp__pulumi__neo-bridge",
                    "mcp__pulumi__neo-continue-task",
                    "mcp__pulumi__deploy-to-aws",
                ]),
                config_required: true,
            },
        );
        servers.insert(
            "sequential-thinking".to_string(),
            ServerSpec {
                description: "Advanced reasoning tool".to_string(),
                available: true,
                tools: strings(&["sequentialthinking"]),
                forbidden_tools: Vec::new(),
                config_required: false,
            },
        );
        servers.insert(
            "playwright".to_string(),
            ServerSpec {
                description: "Browser automation tool".to_string(),
                available: false,
                tools: strings(&[
                    "browser_navigate",
                    "browser_click",
                    "browser_snapshot",
                ]),
                forbidden_tools: Vec::new(),
                config_required: false,
            },
        );
        servers
    }

    pub fn servers(&self) -> &BTreeMap<String, ServerSpec> {
        &self.servers
    }

    /// Override a server's availability, e.g. after a connectivity probe.
    pub fn set_available(&mut self, server_name: &str, available: bool) {
        if let Some(server) = self.servers.get_mut(server_name) {
            server.available = available;
        }
    }

    pub fn is_server_available(&self, server_name: &str) -> bool {
        self.servers
            .get(server_name)
            .is_some_and(|s| s.available)
    }

    pub fn server_tools(&self, server_name: &str) -> Vec<String> {
        self.servers
            .get(server_name)
            .map(|s| s.tools.clone())
            .unwrap_or_default()
    }

    /// Whether any available server provides the tool.
    pub fn validate_tool_availability(&self, tool_name: &str) -> bool {
        self.servers
            .values()
            .any(|s| s.available && s.tools.iter().any(|t| t == tool_name))
    }

    /// Alternative approaches when a tool is unavailable.
    pub fn fallback_options(&self, tool_name: &str) -> Vec<String> {
        match tool_name {
            "figma_get_file" => strings(&[
                "create design specifications in markdown",
                "use Mermaid diagrams for wireframes",
            ]),
            "mcp__pulumi__get-stacks" => strings(&[
                "document infrastructure from configuration files in the repository",
            ]),
            _ => strings(&["manual implementation required"]),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_servers_present() {
        let registry = ToolRegistry::new();
        assert!(registry.servers().contains_key("figma"));
        assert!(registry.servers().contains_key("pulumi"));
    }

    #[test]
    fn test_availability_defaults() {
        let registry = ToolRegistry::new();
        assert!(registry.is_server_available("sequential-thinking"));
        assert!(!registry.is_server_available("figma"));
        assert!(!registry.is_server_available("unknown"));
    }

    #[test]
    fn test_set_available() {
        let mut registry = ToolRegistry::new();
        registry.set_available("figma", true);
        assert!(registry.is_server_available("figma"));
        assert!(registry.validate_tool_availability("figma_get_file"));
    }

    #[test]
    fn test_tool_availability_requires_available_server() {
        let registry = ToolRegistry::new();
        // Tool exists but its server is not available.
        assert!(!registry.validate_tool_availability("figma_get_file"));
        assert!(registry.validate_tool_availability("sequentialthinking"));
    }

    #[test]
    fn test_fallbacks() {
        let registry = ToolRegistry::new();
        assert!(!registry.fallback_options("figma_get_file").is_empty());
        assert_eq!(
            registry.fallback_options("nonexistent"),
            vec!["manual implementation required"]
        );
    }
}
