use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use tripchat_agent::TurnOutcome;
use tripchat_graph::CompiledGraph;

use crate::app::Conversation;
use crate::web::protocol::{message_views, ChatMessageView, SessionInfo};

pub type SessionId = Uuid;

/// What the session list and history endpoints show
struct Snapshot {
    messages: Vec<ChatMessageView>,
    complete: bool,
    last_activity: DateTime<Utc>,
}

/// A browser chat session. Turns on one session are serialized by the
/// conversation mutex; reads go through the snapshot and never wait on a turn.
pub struct WebSession {
    pub id: SessionId,
    pub thread_id: String,
    pub created_at: DateTime<Utc>,
    conversation: Mutex<Conversation>,
    snapshot: RwLock<Snapshot>,
}

impl WebSession {
    fn new(conversation: Conversation) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            thread_id: conversation.thread_id().to_string(),
            created_at: now,
            snapshot: RwLock::new(Snapshot {
                messages: message_views(conversation.history()),
                complete: false,
                last_activity: now,
            }),
            conversation: Mutex::new(conversation),
        }
    }

    pub async fn send(&self, text: &str) -> Result<(TurnOutcome, Vec<ChatMessageView>)> {
        let mut conversation = self.conversation.lock().await;
        self.snapshot.write().await.last_activity = Utc::now();

        let outcome = conversation.send(text).await?;
        let messages = message_views(conversation.history());

        let mut snapshot = self.snapshot.write().await;
        snapshot.messages = messages.clone();
        snapshot.complete = outcome.complete;
        Ok((outcome, messages))
    }

    pub async fn messages(&self) -> Vec<ChatMessageView> {
        self.snapshot.read().await.messages.clone()
    }

    pub async fn get_info(&self) -> SessionInfo {
        let snapshot = self.snapshot.read().await;
        SessionInfo {
            session_id: self.id,
            thread_id: self.thread_id.clone(),
            created_at: self.created_at.to_rfc3339(),
            last_activity: snapshot.last_activity.to_rfc3339(),
            message_count: snapshot.messages.len(),
            complete: snapshot.complete,
        }
    }

    async fn close(&self) {
        self.conversation.lock().await.close().await;
    }
}

/// Owns all live web sessions
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<WebSession>>>,
    app: CompiledGraph,
    logs_dir: Option<PathBuf>,
    model: String,
}

impl SessionManager {
    pub fn new(app: CompiledGraph, logs_dir: Option<PathBuf>, model: impl Into<String>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            app,
            logs_dir,
            model: model.into(),
        }
    }

    pub async fn create_session(&self) -> Arc<WebSession> {
        let conversation = Conversation::start(self.app.clone(), self.logs_dir.as_deref(), self.model.clone()).await;
        let session = Arc::new(WebSession::new(conversation));

        self.sessions.write().await.insert(session.id, Arc::clone(&session));
        tracing::info!("Created web session {}", session.id);
        session
    }

    pub async fn get_session(&self, session_id: &SessionId) -> Option<Arc<WebSession>> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Sessions ordered by creation time
    pub async fn list_sessions(&self) -> Vec<SessionInfo> {
        let sessions: Vec<Arc<WebSession>> = self.sessions.read().await.values().cloned().collect();
        let mut infos = Vec::with_capacity(sessions.len());
        for session in sessions {
            infos.push(session.get_info().await);
        }
        infos.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        infos
    }

    /// Remove a session and its checkpointed thread; false if it did not exist
    pub async fn remove_session(&self, session_id: &SessionId) -> Result<bool> {
        let Some(session) = self.sessions.write().await.remove(session_id) else {
            return Ok(false);
        };

        session.close().await;
        self.app.checkpointer().delete(&session.thread_id).await?;
        tracing::info!("Removed web session {}", session_id);
        Ok(true)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
