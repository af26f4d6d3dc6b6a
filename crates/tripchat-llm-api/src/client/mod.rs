use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod groq;
pub mod scripted;

/// Chat messages use the shared OpenAI-compatible message shape
pub use tripchat_types::{FunctionCall, Message as ChatMessage, ToolCall};

/// LLM client trait - unified interface for all LLM providers
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Chat with tools support
    async fn chat(&self, messages: Vec<ChatMessage>, tools: Vec<ToolDefinition>) -> Result<LlmResponse>;

    /// Simple chat completion without tools
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<String> {
        let response = self.chat(messages.to_vec(), Vec::new()).await?;
        Ok(response.message.content)
    }

    /// Model identifier, used for logging
    fn model_name(&self) -> &str;
}

/// LLM response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub message: ChatMessage,
    pub usage: Option<TokenUsage>,
}

impl LlmResponse {
    pub fn from_message(message: ChatMessage) -> Self {
        Self { message, usage: None }
    }
}

/// Token usage information
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Tool definition for function calling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// OpenAI `tools` array entry
    pub fn to_openai(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}
