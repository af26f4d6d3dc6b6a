use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

use super::{ChatMessage, LlmClient, LlmResponse, TokenUsage, ToolDefinition};
use tripchat_logging::{log_request_to_file, log_response_to_file};

/// OpenAI-compatible chat completion client (Groq, OpenAI, llama.cpp)
pub struct GroqLlmClient {
    api_key: String,
    model: String,
    api_url: String,
    temperature: f32,
    request_log_dir: Option<PathBuf>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

impl GroqLlmClient {
    pub fn new(api_key: String, model: String, api_url: String) -> Self {
        Self {
            api_key,
            model,
            api_url,
            temperature: 0.0,
            request_log_dir: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Write every request and response body into `dir`
    pub fn with_request_log_dir(mut self, dir: PathBuf) -> Self {
        self.request_log_dir = Some(dir);
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn build_chat_request(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> serde_json::Value {
        let mut request = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });

        if !tools.is_empty() {
            let tool_definitions: Vec<serde_json::Value> = tools.iter().map(ToolDefinition::to_openai).collect();
            request["tools"] = serde_json::Value::Array(tool_definitions);
            request["tool_choice"] = serde_json::json!("auto");
        }

        request
    }

    async fn send(&self, request: &serde_json::Value) -> Result<ChatCompletionResponse> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        if let Some(dir) = &self.request_log_dir {
            if let Err(e) = log_request_to_file(dir, &self.api_url, request, &self.model, &self.api_key, timestamp) {
                tracing::warn!(error = %e, "failed to log request");
            }
        }

        tracing::debug!(model = %self.model, url = %self.api_url, "sending chat completion request");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.api_url))?;

        let status = response.status();
        let response_text = response.text().await?;

        if let Some(dir) = &self.request_log_dir {
            if let Err(e) = log_response_to_file(dir, status.as_u16(), &response_text, &self.model, timestamp) {
                tracing::warn!(error = %e, "failed to log response");
            }
        }

        if !status.is_success() {
            return Err(anyhow::anyhow!("LLM API error ({}): {}", status, response_text));
        }

        serde_json::from_str(&response_text).context("Failed to parse chat completion response")
    }
}

#[async_trait]
impl LlmClient for GroqLlmClient {
    async fn chat(&self, messages: Vec<ChatMessage>, tools: Vec<ToolDefinition>) -> Result<LlmResponse> {
        let request = self.build_chat_request(&messages, &tools);
        let chat_response = self.send(&request).await?;

        let message = match chat_response.choices.into_iter().next() {
            Some(choice) => choice.message,
            None => ChatMessage::assistant("No response generated"),
        };

        if let Some(usage) = &chat_response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion usage"
            );
        }

        Ok(LlmResponse {
            message,
            usage: chat_response.usage,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
