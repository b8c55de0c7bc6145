//! External tool registry.
//!
//! A tool is an external service a file may belong to, supplying the
//! icon and base URI used to open that file outside the browser. The
//! registry is immutable configuration injected at startup, never
//! mutated at runtime.

/// An external service associated with files via the tool metadata key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub base_uri: String,
}

impl Tool {
    pub fn new(id: &str, name: &str, icon: &str, base_uri: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            base_uri: base_uri.to_string(),
        }
    }
}

/// Immutable lookup table of known tools.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Tool>) -> Self {
        Self { tools }
    }

    pub fn find(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.id == id)
    }

    pub fn all(&self) -> &[Tool] {
        &self.tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_known_tool() {
        let registry = ToolRegistry::new(vec![Tool::new(
            "agora",
            "Agora",
            "icon-greek-pillar-outline",
            "https://agora.example.com",
        )]);

        let tool = registry.find("agora");
        assert!(tool.is_some());
        assert_eq!(tool.unwrap().base_uri, "https://agora.example.com");
    }

    #[test]
    fn test_find_unknown_tool_is_none() {
        let registry = ToolRegistry::default();
        assert!(registry.find("missing").is_none());
    }
}
