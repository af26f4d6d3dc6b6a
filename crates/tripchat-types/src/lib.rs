//! Core types and structures for tripchat
//!
//! This crate provides the foundational types used across all tripchat crates:
//! chat messages, tool calls, and the parameter/result types tools exchange
//! with the agent.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// ============================================================================
// Constants
// ============================================================================

/// Default Groq model used by the travel agent
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Maximum number of LLM round-trips the agent executor makes per turn
pub const MAX_AGENT_ITERATIONS: usize = 15;

/// Maximum number of node executions per graph run
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Maximum number of results requested from the activity search backend
pub const MAX_SEARCH_RESULTS: usize = 3;

// ============================================================================
// Message Types
// ============================================================================

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";
pub const ROLE_TOOL: &str = "tool";

/// Helper function to deserialize string or null values
pub fn deserialize_string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// Message structure for chat API
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Message {
    #[serde(default)]
    pub role: String,
    #[serde(deserialize_with = "deserialize_string_or_null", default)]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

impl Message {
    fn with_role(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(ROLE_SYSTEM, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(ROLE_USER, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(ROLE_ASSISTANT, content)
    }

    /// Assistant message carrying tool calls (content is usually empty)
    pub fn assistant_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: Some(tool_calls),
            ..Self::with_role(ROLE_ASSISTANT, content)
        }
    }

    /// Tool observation answering the call with `tool_call_id`
    pub fn tool(tool_call_id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
            ..Self::with_role(ROLE_TOOL, content)
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == ROLE_USER
    }

    pub fn is_assistant(&self) -> bool {
        self.role == ROLE_ASSISTANT
    }

    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().map(|calls| !calls.is_empty()).unwrap_or(false)
    }
}

/// Tool call structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_tool_type")]
    pub tool_type: String,
    pub function: FunctionCall,
}

fn default_tool_type() -> String {
    "function".to_string()
}

impl ToolCall {
    pub fn function(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool_type: default_tool_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// Function call structure within a tool call
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

// ============================================================================
// Tool Execution Types
// ============================================================================

/// Tool parameters
#[derive(Debug, Clone)]
pub struct ToolParameters {
    pub data: HashMap<String, serde_json::Value>,
}

impl ToolParameters {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Parse the JSON object the model produced as call arguments.
    /// An empty string is treated as an empty object.
    pub fn from_json(json_str: &str) -> anyhow::Result<Self> {
        if json_str.trim().is_empty() {
            return Ok(Self::new());
        }
        let data: HashMap<String, serde_json::Value> = serde_json::from_str(json_str)?;
        Ok(Self { data })
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.data.insert(key.to_string(), json_value);
        }
    }

    pub fn get_required<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let value = self
            .data
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("Required parameter '{}' missing", key))?;

        serde_json::from_value(value.clone())
            .map_err(|e| anyhow::anyhow!("Failed to parse parameter '{}': {}", key, e))
    }

    pub fn get_optional<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.data.get(key) {
            Some(serde_json::Value::Null) | None => Ok(None),
            Some(value) => {
                let parsed: T = serde_json::from_value(value.clone())
                    .map_err(|e| anyhow::anyhow!("Failed to parse parameter '{}': {}", key, e))?;
                Ok(Some(parsed))
            }
        }
    }
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self::new()
    }
}

/// Tool execution result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub success: bool,
    pub content: String,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(content: String) -> Self {
        Self {
            success: true,
            content,
            error: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            success: false,
            content: String::new(),
            error: Some(error),
        }
    }

    /// Text handed back to the model as the tool observation
    pub fn observation(&self) -> String {
        match &self.error {
            Some(error) if !self.success => format!("Error: {}", error),
            _ => self.content.clone(),
        }
    }
}

/// Tool parameter definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub param_type: String,
    pub description: String,
    pub required: bool,
    pub default: Option<serde_json::Value>,
}

/// Helper macro for creating parameter definitions
#[macro_export]
macro_rules! param {
    ($name:expr, $type:expr, $desc:expr, required) => {
        (
            $name.to_string(),
            $crate::ParameterDefinition {
                param_type: $type.to_string(),
                description: $desc.to_string(),
                required: true,
                default: None,
            },
        )
    };
    ($name:expr, $type:expr, $desc:expr, optional, $default:expr) => {
        (
            $name.to_string(),
            $crate::ParameterDefinition {
                param_type: $type.to_string(),
                description: $desc.to_string(),
                required: false,
                default: Some(serde_json::Value::from($default)),
            },
        )
    };
    ($name:expr, $type:expr, $desc:expr, optional) => {
        (
            $name.to_string(),
            $crate::ParameterDefinition {
                param_type: $type.to_string(),
                description: $desc.to_string(),
                required: false,
                default: None,
            },
        )
    };
}
