use serde::{Deserialize, Serialize};

use tripchat_types::Message;

use crate::web::session_manager::SessionId;

/// A message as shown in the chat window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageView {
    pub role: String,
    pub content: String,
}

impl From<&Message> for ChatMessageView {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.clone(),
            content: message.content.clone(),
        }
    }
}

pub fn message_views(messages: &[Message]) -> Vec<ChatMessageView> {
    messages.iter().map(ChatMessageView::from).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub thread_id: String,
    pub created_at: String,
    pub last_activity: String,
    pub message_count: usize,
    pub complete: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
    pub thread_id: String,
    pub messages: Vec<ChatMessageView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionHistory {
    #[serde(flatten)]
    pub info: SessionInfo,
    pub messages: Vec<ChatMessageView>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub reply: String,
    pub complete: bool,
    pub messages: Vec<ChatMessageView>,
}
