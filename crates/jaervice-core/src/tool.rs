//! Tool System
//!
//! Tools wrap one external capability behind a uniform name/description/execute
//! contract. The registry keeps them in registration order and resolves the
//! calls the model asks for.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ToolError;

/// Tool call request from the LLM
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call id, echoed back on the matching tool message
    pub id: String,

    /// Tool identifier
    pub name: String,

    /// Arguments as key-value pairs
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: HashMap::new(),
        }
    }

    /// Create a call with a freshly generated id
    pub fn with_generated_id(name: impl Into<String>) -> Self {
        Self::new(format!("call_{}", uuid::Uuid::new_v4().simple()), name)
    }

    #[must_use]
    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// String argument lookup
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(serde_json::Value::as_str)
    }

    /// Arguments encoded as a JSON object string
    pub fn arguments_json(&self) -> String {
        serde_json::to_string(&self.arguments).unwrap_or_else(|_| "{}".into())
    }
}

/// Result from tool execution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Id of the call this answers
    pub id: String,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (tool text or error message)
    pub output: String,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            success: true,
            output: output.into(),
        }
    }

    pub fn failure(name: impl Into<String>, id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            success: false,
            output: error.into(),
        }
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

impl ParameterSchema {
    /// Required string parameter
    pub fn required_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: "string".into(),
            description: description.into(),
            required: true,
            enum_values: None,
        }
    }
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,
}

impl ToolSchema {
    /// JSON Schema object describing the arguments
    pub fn input_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        for param in &self.parameters {
            let mut prop = serde_json::json!({
                "type": param.param_type,
                "description": param.description,
            });
            if let Some(values) = &param.enum_values {
                prop["enum"] = serde_json::Value::Array(values.clone());
            }
            properties.insert(param.name.clone(), prop);
        }

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, call: &ToolCall) -> Result<String, ToolError>;

    /// Validate arguments before execution
    fn validate(&self, call: &ToolCall) -> Result<(), ToolError> {
        let schema = self.schema();

        for param in &schema.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(ToolError::InvalidArguments(format!(
                    "missing required parameter: {}",
                    param.name
                )));
            }
        }

        Ok(())
    }
}

/// Ordered registry of available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    /// Register a shared tool. A tool with the same name is replaced in place.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.schema().name;
        if let Some(&slot) = self.index.get(&name) {
            self.tools[slot] = tool;
        } else {
            self.index.insert(name, self.tools.len());
            self.tools.push(tool);
        }
    }

    /// Get a tool by name
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&slot| Arc::clone(&self.tools[slot]))
    }

    /// Tool schemas in registration order
    pub fn list(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.schema().name).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run one tool call. Unknown tools and failures come back as a failed result.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        let Some(tool) = self.resolve(&call.name) else {
            tracing::warn!(tool = %call.name, "Model requested an unknown tool");
            return ToolResult::failure(
                &call.name,
                &call.id,
                format!("Tool \"{}\" not found.", call.name),
            );
        };

        let outcome = match tool.validate(call) {
            Ok(()) => tool.execute(call).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(output) => ToolResult::success(&call.name, &call.id, output),
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool call failed");
                ToolResult::failure(
                    &call.name,
                    &call.id,
                    format!("Error with tool \"{}\": {}", call.name, e),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".into(),
                description: "Echo the query".into(),
                parameters: vec![ParameterSchema::required_string("query", "Text to echo")],
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<String, ToolError> {
            Ok(call.str_arg("query").unwrap_or_default().to_string())
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "broken".into(),
                description: "Always fails".into(),
                parameters: Vec::new(),
            }
        }

        async fn execute(&self, _call: &ToolCall) -> Result<String, ToolError> {
            Err(ToolError::Timeout("upstream took too long".into()))
        }
    }

    #[test]
    fn test_tool_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        registry.register(BrokenTool);
        registry.register(EchoTool);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["echo", "broken"]);
        assert!(registry.resolve("echo").is_some());
        assert!(registry.resolve("unknown").is_none());
    }

    #[test]
    fn test_input_schema() {
        let schema = EchoTool.schema().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["required"][0], "query");
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let call = ToolCall::new("c1", "echo").with_argument("query", "hello");
        let result = registry.dispatch(&call).await;
        assert!(result.success);
        assert_eq!(result.id, "c1");
        assert_eq!(result.output, "hello");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let registry = ToolRegistry::new();
        let result = registry.dispatch(&ToolCall::new("c9", "teleport")).await;
        assert!(!result.success);
        assert_eq!(result.id, "c9");
        assert_eq!(result.output, "Tool \"teleport\" not found.");
    }

    #[tokio::test]
    async fn test_dispatch_failure_and_validation() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        registry.register(BrokenTool);

        let result = registry.dispatch(&ToolCall::new("c2", "broken")).await;
        assert!(!result.success);
        assert!(result.output.contains("upstream took too long"));

        let result = registry.dispatch(&ToolCall::new("c3", "echo")).await;
        assert!(!result.success);
        assert!(result.output.contains("missing required parameter: query"));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ToolCall::with_generated_id("echo");
        let b = ToolCall::with_generated_id("echo");
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("call_"));
    }
}
