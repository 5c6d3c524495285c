//! Ordered collection of tools.

use super::ToolHandle;
use crate::error::{DaisyError, Result};
use serde_json::Value;
use tracing::{debug, info};

/// Tools in declaration order, unique by name.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolHandle>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. Names must be unique.
    pub fn register(&mut self, tool: ToolHandle) -> Result<()> {
        if self.get(tool.name()).is_some() {
            return Err(DaisyError::Config(format!(
                "Tool '{}' is already registered",
                tool.name()
            )));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, tool: ToolHandle) -> Result<Self> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&ToolHandle> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolHandle> {
        self.tools.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name with JSON arguments.
    pub async fn invoke(&self, name: &str, args: Option<&Value>) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| DaisyError::UnknownTool(name.to_string()))?;

        info!("Invoking tool: {}", name);
        let output = tool.invoke(args).await?;
        debug!("Tool {} returned {} bytes", name, output.len());
        Ok(output)
    }

    /// Invoke a tool with arguments given as a JSON string, as produced by
    /// chat-completion tool calls. An empty string means no arguments.
    pub async fn invoke_json(&self, name: &str, arguments: &str) -> Result<String> {
        if arguments.trim().is_empty() {
            return self.invoke(name, None).await;
        }
        let args: Value = serde_json::from_str(arguments)
            .map_err(|e| DaisyError::InvalidArguments(format!("Invalid JSON arguments: {}", e)))?;
        self.invoke(name, Some(&args)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolParam;
    use serde_json::json;

    fn tool(name: &'static str) -> ToolHandle {
        ToolHandle::from_fn(name, "test tool", move |args| {
            format!("{}:{}", name, args.str("query"))
        })
        .param(ToolParam::required("query", "Query"))
    }

    #[test]
    fn test_registry_preserves_order() {
        let registry = ToolRegistry::new()
            .with(tool("b"))
            .unwrap()
            .with(tool("a"))
            .unwrap()
            .with(tool("c"))
            .unwrap();
        assert_eq!(registry.names(), vec!["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("a")).unwrap();
        assert!(registry.register(tool("a")).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_invoke_by_name() {
        let registry = ToolRegistry::new().with(tool("a")).unwrap();
        let out = registry
            .invoke("a", Some(&json!({ "query": "x" })))
            .await
            .unwrap();
        assert_eq!(out, "a:x");
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.invoke("missing", None).await.unwrap_err();
        assert!(matches!(err, DaisyError::UnknownTool(_)));
    }

    #[tokio::test]
    async fn test_invoke_json_arguments() {
        let registry = ToolRegistry::new().with(tool("a")).unwrap();
        assert_eq!(
            registry.invoke_json("a", r#"{"query": "y"}"#).await.unwrap(),
            "a:y"
        );
        assert!(matches!(
            registry.invoke_json("a", "{not json").await,
            Err(DaisyError::InvalidArguments(_))
        ));
    }
}
