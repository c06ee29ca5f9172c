//! Pulumi infrastructure-query integration wrapper (read-only).
//!
//! Only read-only Pulumi tools are whitelisted; tools that modify
//! infrastructure are listed as forbidden and rejected by
//! [`PulumiIntegration::validate_tool`]. The orchestrator merges the
//! allowed list only; agents access the server directly through the
//! runtime.

use thiserror::Error;
use tracing::warn;

use repolens_core::ToolProvider;

const ORG_ENV: &str = "PULUMI_ORG";

/// Whitelisted read-only tools.
const ALLOWED_TOOLS: &[&str] = &[
    "mcp__pulumi__get-stacks",
    "mcp__pulumi__resource-search",
    "mcp__pulumi__get-policy-violations",
    "mcp__pulumi__get-users",
    "mcp__pulumi__neo-get-tasks",
    "mcp__pulumi__get-type",
    "mcp__pulumi__get-resource",
    "mcp__pulumi__get-function",
    "mcp__pulumi__list-resources",
    "mcp__pulumi__list-functions",
];

/// Tools that modify infrastructure.
const FORBIDDEN_TOOLS: &[&str] = &[
    "mcp__pulumi__neo-bridge",
    "mcp__pulumi__neo-continue-task",
    "mcp__pulumi__deploy-to-aws",
];

#[derive(Debug, Error)]
#[error("tool '{0}' is forbidden: it modifies infrastructure; only read-only operations allowed")]
pub struct ForbiddenToolError(pub String);

#[derive(Debug, Clone)]
pub struct PulumiIntegration {
    available: bool,
    organization: Option<String>,
}

impl PulumiIntegration {
    pub fn new(available: bool, organization: Option<String>) -> Self {
        Self {
            available,
            organization,
        }
    }

    /// Optimistic availability; the server authenticates on first use.
    pub fn from_env() -> Self {
        let organization = std::env::var(ORG_ENV).ok();
        if organization.is_none() {
            warn!("{} not set, using server default organization", ORG_ENV);
        }
        Self::new(true, organization)
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Whether a tool is whitelisted. Forbidden tools are an error, not
    /// merely absent.
    pub fn validate_tool(&self, tool_name: &str) -> Result<bool, ForbiddenToolError> {
        if FORBIDDEN_TOOLS.contains(&tool_name) {
            return Err(ForbiddenToolError(tool_name.to_string()));
        }
        Ok(ALLOWED_TOOLS.contains(&tool_name))
    }
}

impl ToolProvider for PulumiIntegration {
    fn name(&self) -> &str {
        "pulumi"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn allowed_tools(&self) -> Vec<String> {
        ALLOWED_TOOLS.iter().map(|t| t.to_string()).collect()
    }

    fn forbidden_tools(&self) -> Vec<String> {
        FORBIDDEN_TOOLS.iter().map(|t| t.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_tool_validates() {
        let pulumi = PulumiIntegration::new(true, None);
        assert!(pulumi.validate_tool("mcp__pulumi__get-stacks").unwrap());
        assert!(!pulumi.validate_tool("mcp__other__thing").unwrap());
    }

    #[test]
    fn test_forbidden_tool_is_an_error() {
        let pulumi = PulumiIntegration::new(true, None);
        let err = pulumi.validate_tool("mcp__pulumi__deploy-to-aws").unwrap_err();
        assert!(err.to_string().contains("deploy-to-aws"));
    }

    #[test]
    fn test_forbidden_never_in_allowed() {
        let pulumi = PulumiIntegration::new(true, None);
        let allowed = pulumi.allowed_tools();
        for tool in pulumi.forbidden_tools() {
            assert!(!allowed.contains(&tool));
        }
    }

    #[test]
    fn test_unavailable_provider() {
        let pulumi = PulumiIntegration::new(false, Some("acme".to_string()));
        assert!(!pulumi.is_available());
        assert_eq!(pulumi.organization(), Some("acme"));
    }
}
