use async_trait::async_trait;
use std::collections::HashMap;

use crate::tool_context::ToolContext;
use tripchat_types::{ParameterDefinition, ToolParameters, ToolResult};

/// Tool trait that all tools must implement
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name of the tool (must be unique)
    fn name(&self) -> &str;

    /// Human-readable description, shown to the model
    fn description(&self) -> &str;

    /// Parameter definitions
    fn parameters(&self) -> HashMap<String, ParameterDefinition>;

    /// Execute the tool
    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult;

    /// JSON schema of the arguments object
    fn parameters_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        // Sorted so the schema is stable between requests
        let mut parameters: Vec<_> = self.parameters().into_iter().collect();
        parameters.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, param_def) in parameters {
            let mut param_json = serde_json::json!({
                "type": param_def.param_type,
                "description": param_def.description,
            });
            if let Some(default) = param_def.default {
                param_json["default"] = default;
            }
            properties.insert(name.clone(), param_json);

            if param_def.required {
                required.push(name);
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }
}
