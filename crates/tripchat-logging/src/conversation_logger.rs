use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use tripchat_types::Message;

#[derive(Serialize)]
struct ToolCallInfo<'a> {
    id: &'a str,
    name: &'a str,
    arguments: &'a str,
}

#[derive(Serialize)]
struct LogEntry<'a> {
    timestamp: String, // ISO‑8601 UTC
    thread_id: &'a str,
    role: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCallInfo<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

/// Appends every message of a conversation thread to a JSONL file.
pub struct ConversationLogger {
    file_path: PathBuf,
    thread_id: String,
    file: Option<tokio::fs::File>,
}

impl ConversationLogger {
    /// Create a new logger in `logs_dir`; the file name is derived from the
    /// current UTC time and the thread id.
    pub async fn new(logs_dir: &Path, thread_id: &str) -> Result<Self> {
        fs::create_dir_all(logs_dir).await?;

        let now: DateTime<Utc> = Utc::now();
        let short_thread: String = thread_id.chars().take(8).collect();
        let filename = format!("trip-{}-{}.jsonl", now.format("%Y-%m-%d-%H%M%S"), short_thread);
        let file_path = logs_dir.join(filename);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await?;
        Ok(Self {
            file_path,
            thread_id: thread_id.to_string(),
            file: Some(file),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Append a single message. Write failures are reported but never
    /// interrupt the conversation.
    pub async fn log_message(&mut self, message: &Message, model: Option<&str>) {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339(),
            thread_id: &self.thread_id,
            role: &message.role,
            content: &message.content,
            model,
            tool_calls: message.tool_calls.as_ref().map(|calls| {
                calls
                    .iter()
                    .map(|call| ToolCallInfo {
                        id: &call.id,
                        name: &call.function.name,
                        arguments: &call.function.arguments,
                    })
                    .collect()
            }),
            tool_call_id: message.tool_call_id.as_deref(),
            name: message.name.as_deref(),
        };

        let Ok(mut json) = serde_json::to_string(&entry) else {
            return;
        };
        json.push('\n');

        if let Some(file) = &mut self.file {
            if let Err(e) = file.write_all(json.as_bytes()).await {
                tracing::warn!(error = %e, "conversation log write failed");
            } else {
                let _ = file.flush().await;
            }
        }
    }

    /// Append several messages in order; `model` is recorded on assistant
    /// messages only
    pub async fn log_messages(&mut self, messages: &[Message], model: Option<&str>) {
        for message in messages {
            let model = if message.is_assistant() { model } else { None };
            self.log_message(message, model).await;
        }
    }

    /// Close the logger (explicit drop). Called on graceful shutdown.
    pub async fn shutdown(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.sync_all().await;
        }
    }
}
