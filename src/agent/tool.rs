//! Tool capability contract and registry.
//!
//! A tool is an explicit, named capability the reasoning engine can invoke:
//! a stable name, a natural-language description surfaced in the prompt so
//! the engine knows when to use it, and an invoke function from raw input
//! text to observation text. The orchestrator dispatches by exact name
//! through a [`ToolSet`]; there is no runtime attribute probing.

use std::collections::BTreeMap;
use std::fmt::Write;

use async_trait::async_trait;

use crate::error::AgentError;

/// A named, described, invocable capability exposed to the reasoning engine.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable identifier the engine must echo in its `Action:` line.
    fn name(&self) -> &str;

    /// Capability summary surfaced to the engine in the prompt.
    fn description(&self) -> &str;

    /// Invokes the tool with the engine's raw `Action Input` text.
    ///
    /// Implementations degrade gracefully on empty or garbled input,
    /// returning a readable "no results" observation rather than failing.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ToolExecution`] only for failures the tool
    /// cannot absorb; these propagate out of the run as fatal.
    async fn invoke(&self, raw_input: &str) -> Result<String, AgentError>;
}

/// Registry mapping tool names to implementations.
///
/// Iteration order is the registration order surfaced to the engine, kept
/// deterministic by the underlying ordered map.
#[derive(Default)]
pub struct ToolSet {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolSet {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool under its own name. A later registration with the
    /// same name replaces the earlier one.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Looks up a tool by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| &**tool)
    }

    /// Returns `true` if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Registered tool names, comma-separated, for prompts and corrective
    /// observations.
    #[must_use]
    pub fn names(&self) -> String {
        self.tools
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// One `name: description` line per tool, for the prompt's catalog.
    #[must_use]
    pub fn catalog(&self) -> String {
        let mut out = String::new();
        for tool in self.tools.values() {
            let _ = writeln!(out, "{}: {}", tool.name(), tool.description());
        }
        out
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its input."
        }

        async fn invoke(&self, raw_input: &str) -> Result<String, AgentError> {
            Ok(raw_input.to_string())
        }
    }

    #[tokio::test]
    async fn test_register_and_invoke() {
        let mut tools = ToolSet::new();
        tools.register(Box::new(EchoTool));

        let tool = tools.get("echo");
        assert!(tool.is_some());
        if let Some(tool) = tool {
            let out = tool.invoke("hello").await.unwrap_or_default();
            assert_eq!(out, "hello");
        }
        assert!(tools.get("missing").is_none());
    }

    #[test]
    fn test_names_and_catalog() {
        let mut tools = ToolSet::new();
        tools.register(Box::new(EchoTool));
        assert_eq!(tools.names(), "echo");
        assert_eq!(tools.catalog(), "echo: Echoes its input.\n");
        assert_eq!(tools.len(), 1);
        assert!(!tools.is_empty());
    }

    #[test]
    fn test_empty_set() {
        let tools = ToolSet::new();
        assert!(tools.is_empty());
        assert!(tools.names().is_empty());
        assert!(tools.catalog().is_empty());
    }
}
