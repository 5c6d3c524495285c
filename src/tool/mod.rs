//! Tools exposed to an agent runtime.
//!
//! A tool is a named, documented handler that takes string arguments and
//! returns text. Handlers never fail: external trouble is reported inside
//! the returned text. The only errors at this boundary are protocol errors
//! (unknown tool, missing or malformed arguments), raised before a handler
//! runs.

mod args;
mod registry;

pub use args::ToolArgs;
pub use registry::ToolRegistry;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// A declared tool parameter. Parameters without a default are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolParam {
    pub name: String,
    pub description: String,
    pub default: Option<String>,
}

impl ToolParam {
    /// A parameter the caller must supply.
    pub fn required(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            default: None,
        }
    }

    /// A parameter that falls back to `default` when omitted.
    pub fn optional(name: &str, description: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            default: Some(default.to_string()),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Handler behind a tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Produce the tool's text result for already-validated arguments.
    async fn call(&self, args: &ToolArgs) -> String;
}

/// Adapter for handlers that need no I/O.
struct FnHandler<F>(F);

#[async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(&ToolArgs) -> String + Send + Sync,
{
    async fn call(&self, args: &ToolArgs) -> String {
        (self.0)(args)
    }
}

/// A registered tool: name, docstring, parameters, and handler.
#[derive(Clone)]
pub struct ToolHandle {
    name: String,
    description: String,
    params: Vec<ToolParam>,
    handler: Arc<dyn ToolHandler>,
}

impl ToolHandle {
    /// Create a tool backed by an async handler.
    pub fn new(name: &str, description: &str, handler: Arc<dyn ToolHandler>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            params: Vec::new(),
            handler,
        }
    }

    /// Create a tool backed by a plain function.
    pub fn from_fn<F>(name: &str, description: &str, f: F) -> Self
    where
        F: Fn(&ToolArgs) -> String + Send + Sync + 'static,
    {
        Self::new(name, description, Arc::new(FnHandler(f)))
    }

    /// Declare a parameter.
    pub fn param(mut self, param: ToolParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn params(&self) -> &[ToolParam] {
        &self.params
    }

    /// JSON schema describing the tool's arguments.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.params {
            let mut prop = json!({
                "type": "string",
                "description": param.description,
            });
            if let Some(default) = &param.default {
                prop["default"] = json!(default);
            }
            properties.insert(param.name.clone(), prop);
        }

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.is_required())
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Validate raw arguments against the declared parameters.
    pub fn bind(&self, raw: Option<&Value>) -> Result<ToolArgs> {
        ToolArgs::bind(&self.name, &self.params, raw)
    }

    /// Validate arguments and run the handler.
    pub async fn invoke(&self, raw: Option<&Value>) -> Result<String> {
        let args = self.bind(raw)?;
        Ok(self.handler.call(&args).await)
    }
}

impl std::fmt::Debug for ToolHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolHandle")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
