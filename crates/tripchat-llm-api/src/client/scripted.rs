use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ChatMessage, LlmClient, LlmResponse, ToolCall, ToolDefinition};

/// A request observed by [`ScriptedLlmClient`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    pub tool_names: Vec<String>,
}

/// Replays a fixed queue of assistant messages and records every request.
///
/// Used for deterministic runs of the agent without network access.
#[derive(Default)]
pub struct ScriptedLlmClient {
    responses: Mutex<VecDeque<ChatMessage>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedLlmClient {
    pub fn new(responses: Vec<ChatMessage>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a plain-text assistant reply
    pub fn push_reply(&self, content: impl Into<String>) {
        self.push(ChatMessage::assistant(content));
    }

    /// Queue an assistant turn that calls one tool
    pub fn push_tool_call(&self, id: &str, name: &str, arguments: serde_json::Value) {
        let call = ToolCall::function(id, name, arguments.to_string());
        self.push(ChatMessage::assistant_tool_calls("", vec![call]));
    }

    pub fn push(&self, message: ChatMessage) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(message);
        }
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn chat(&self, messages: Vec<ChatMessage>, tools: Vec<ToolDefinition>) -> Result<LlmResponse> {
        self.requests
            .lock()
            .map_err(|_| anyhow::anyhow!("scripted client lock poisoned"))?
            .push(RecordedRequest {
                messages,
                tool_names: tools.into_iter().map(|t| t.name).collect(),
            });

        let next = self
            .responses
            .lock()
            .map_err(|_| anyhow::anyhow!("scripted client lock poisoned"))?
            .pop_front();

        next.map(LlmResponse::from_message)
            .ok_or_else(|| anyhow::anyhow!("scripted client has no responses left"))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
