use anyhow::Result;
use std::path::Path;

use tripchat_agent::{TravelSession, TurnOutcome};
use tripchat_graph::CompiledGraph;
use tripchat_logging::ConversationLogger;
use tripchat_types::Message;

/// A travel session plus its optional JSONL conversation log
pub struct Conversation {
    session: TravelSession,
    logger: Option<ConversationLogger>,
    model: String,
}

async fn open_logger(logs_dir: Option<&Path>, thread_id: &str) -> Option<ConversationLogger> {
    let dir = logs_dir?;
    match ConversationLogger::new(dir, thread_id).await {
        Ok(logger) => {
            tracing::debug!("Logging conversation to {}", logger.file_path().display());
            Some(logger)
        }
        Err(e) => {
            tracing::warn!("Conversation logging disabled: {:#}", e);
            None
        }
    }
}

impl Conversation {
    pub async fn start(app: CompiledGraph, logs_dir: Option<&Path>, model: impl Into<String>) -> Self {
        let session = TravelSession::new(app);
        let logger = open_logger(logs_dir, session.thread_id()).await;
        Self {
            session,
            logger,
            model: model.into(),
        }
    }

    pub async fn restore(app: CompiledGraph, thread_id: &str, logs_dir: Option<&Path>, model: impl Into<String>) -> Result<Self> {
        let session = TravelSession::restore(app, thread_id).await?;
        let logger = open_logger(logs_dir, thread_id).await;
        Ok(Self {
            session,
            logger,
            model: model.into(),
        })
    }

    pub fn session(&self) -> &TravelSession {
        &self.session
    }

    pub fn thread_id(&self) -> &str {
        self.session.thread_id()
    }

    pub fn history(&self) -> &[Message] {
        self.session.history()
    }

    /// Run one turn and append the messages it added to the log
    pub async fn send(&mut self, text: &str) -> Result<TurnOutcome> {
        let seen = self.session.history().len();
        let outcome = self.session.send(text).await;

        if let Some(logger) = &mut self.logger {
            match &outcome {
                Ok(_) => {
                    let added = self.session.history().get(seen..).unwrap_or_default();
                    logger.log_messages(added, Some(&self.model)).await;
                }
                Err(_) => logger.log_message(&Message::user(text), None).await,
            }
        }
        outcome
    }

    /// Switch to a fresh thread, closing the current log file
    pub async fn reset(&mut self, logs_dir: Option<&Path>) -> Result<()> {
        self.close().await;
        let discarded = self.session.reset().await;
        self.logger = open_logger(logs_dir, self.session.thread_id()).await;
        discarded
    }

    pub async fn close(&mut self) {
        if let Some(mut logger) = self.logger.take() {
            logger.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    use tripchat_agent::{build_travel_workflow, compile_travel_app, AgentExecutor};
    use tripchat_graph::MemorySaver;
    use tripchat_llm_api::ScriptedLlmClient;
    use tripchat_tools::{travel_tool_registry, OfflineActivities};

    fn scripted_app(llm: Arc<ScriptedLlmClient>) -> CompiledGraph {
        let tools = Arc::new(travel_tool_registry(Arc::new(OfflineActivities)));
        let executor = Arc::new(AgentExecutor::new(llm, tools));
        compile_travel_app(build_travel_workflow(executor), Arc::new(MemorySaver::new())).unwrap()
    }

    fn log_lines(conversation: &Conversation) -> Vec<serde_json::Value> {
        let path = conversation.logger.as_ref().unwrap().file_path();
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_turn_is_logged_with_cleaned_reply() {
        let dir = tempfile::tempdir().unwrap();
        let llm = Arc::new(ScriptedLlmClient::default());
        llm.push_reply("<function=search_flights>{}</function>Where to?");
        let mut conversation = Conversation::start(scripted_app(llm), Some(dir.path()), "test-model").await;

        conversation.send("Hi").await.unwrap();

        let lines = log_lines(&conversation);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["role"], "user");
        assert_eq!(lines[0]["content"], "Hi");
        assert!(lines[0].get("model").is_none());
        assert_eq!(lines[1]["role"], "assistant");
        assert_eq!(lines[1]["content"], "Where to?");
        assert_eq!(lines[1]["model"], "test-model");
    }

    #[tokio::test]
    async fn test_failed_turn_still_logs_the_user_message() {
        let dir = tempfile::tempdir().unwrap();
        let llm = Arc::new(ScriptedLlmClient::default());
        let mut conversation = Conversation::start(scripted_app(llm), Some(dir.path()), "test-model").await;

        assert!(conversation.send("Hello?").await.is_err());

        let lines = log_lines(&conversation);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["content"], "Hello?");
    }

    #[tokio::test]
    async fn test_reset_discards_the_old_thread() {
        let llm = Arc::new(ScriptedLlmClient::default());
        llm.push_reply("Where to?");
        let app = scripted_app(llm);
        let mut conversation = Conversation::start(app.clone(), None, "test-model").await;

        conversation.send("Hi").await.unwrap();
        let old = conversation.thread_id().to_string();
        assert!(app.get_state(&old).await.unwrap().is_some());

        conversation.reset(None).await.unwrap();

        assert_ne!(conversation.thread_id(), old);
        assert_eq!(conversation.history().len(), 1);
        assert!(app.get_state(&old).await.unwrap().is_none());
    }
}
