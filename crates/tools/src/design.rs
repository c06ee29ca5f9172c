//! Figma design-tool integration wrapper.

use serde_json::{json, Value};

use repolens_core::ToolProvider;

const ACCESS_TOKEN_ENV: &str = "FIGMA_ACCESS_TOKEN";

/// Wrapper for the Figma design-context server.
///
/// Availability is decided by the injected access token, so tests and
/// callers can fix it instead of depending on ambient process state.
#[derive(Debug, Clone)]
pub struct FigmaIntegration {
    access_token: Option<String>,
}

impl FigmaIntegration {
    pub fn new(access_token: Option<String>) -> Self {
        Self { access_token }
    }

    /// Read the access token from the environment.
    pub fn from_env() -> Self {
        Self::new(std::env::var(ACCESS_TOKEN_ENV).ok())
    }

    /// Design context for a file, or degradation guidance when the
    /// integration is not configured.
    pub fn design_context(&self, file_id: &str) -> Value {
        if !self.is_available() {
            return json!({
                "error": "design tool integration not configured",
                "fallback": "use manual design specifications",
                "instructions": [
                    format!("set the {} environment variable", ACCESS_TOKEN_ENV),
                    "or document the design manually with wireframe sketches",
                ],
            });
        }

        json!({
            "file_id": file_id,
            "tools": self.allowed_tools(),
        })
    }
}

impl ToolProvider for FigmaIntegration {
    fn name(&self) -> &str {
        "figma"
    }

    fn is_available(&self) -> bool {
        self.access_token.is_some()
    }

    fn allowed_tools(&self) -> Vec<String> {
        vec![
            "figma_get_file".to_string(),
            "figma_get_components".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_without_token() {
        let figma = FigmaIntegration::new(None);
        assert!(!figma.is_available());
    }

    #[test]
    fn test_available_with_token() {
        let figma = FigmaIntegration::new(Some("token".to_string()));
        assert!(figma.is_available());
        assert_eq!(figma.allowed_tools().len(), 2);
    }

    #[test]
    fn test_design_context_degrades() {
        let figma = FigmaIntegration::new(None);
        let context = figma.design_context("file-123");
        assert!(context.get("error").is_some());
        assert!(context.get("fallback").is_some());
    }

    #[test]
    fn test_design_context_available() {
        let figma = FigmaIntegration::new(Some("token".to_string()));
        let context = figma.design_context("file-123");
        assert_eq!(context["file_id"], "file-123");
    }
}
