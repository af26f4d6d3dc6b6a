use anyhow::{Context, Result};
use futures::StreamExt;
use serde::Serialize;

use tripchat_graph::{CompiledGraph, GraphEvent, RunConfig, StateUpdate};
use tripchat_types::Message;

use crate::cleanup::clean_response_text;
use crate::prompt::GREETING;

/// Result of one user turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    /// The run reached the end of the graph with a final itinerary
    pub complete: bool,
}

/// A chat with the travel agent on one checkpointed thread.
///
/// The display history always starts with the greeting, followed by the
/// thread's user and assistant messages with function markup removed.
pub struct TravelSession {
    thread_id: String,
    app: CompiledGraph,
    display: Vec<Message>,
    complete: bool,
}

impl TravelSession {
    pub fn new(app: CompiledGraph) -> Self {
        Self::with_thread_id(app, uuid::Uuid::new_v4().to_string())
    }

    pub fn with_thread_id(app: CompiledGraph, thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            app,
            display: vec![Message::assistant(GREETING)],
            complete: false,
        }
    }

    /// Reattach to a thread stored by the app's checkpointer
    pub async fn restore(app: CompiledGraph, thread_id: &str) -> Result<Self> {
        let checkpoint = app
            .get_state(thread_id)
            .await
            .with_context(|| format!("Failed to load thread {}", thread_id))?
            .with_context(|| format!("No saved conversation for thread {}", thread_id))?;

        let mut session = Self::with_thread_id(app, thread_id);
        session.complete = checkpoint.next.is_none() && !checkpoint.state.messages.is_empty();
        session.refresh_display(&checkpoint.state.messages);
        Ok(session)
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn history(&self) -> &[Message] {
        &self.display
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Start over on a fresh thread, discarding the old thread's checkpoint
    pub async fn reset(&mut self) -> Result<()> {
        let old = std::mem::replace(&mut self.thread_id, uuid::Uuid::new_v4().to_string());
        self.display = vec![Message::assistant(GREETING)];
        self.complete = false;

        self.app
            .checkpointer()
            .delete(&old)
            .await
            .with_context(|| format!("Failed to discard thread {}", old))
    }

    fn refresh_display(&mut self, messages: &[Message]) {
        let mut display = vec![Message::assistant(GREETING)];
        display.extend(
            messages
                .iter()
                .filter(|m| m.is_user() || (m.is_assistant() && !m.has_tool_calls()))
                .map(|m| {
                    if m.is_assistant() {
                        Message::assistant(clean_response_text(&m.content))
                    } else {
                        m.clone()
                    }
                }),
        );
        self.display = display;
    }

    /// Send a user message and run the graph until it pauses or ends
    pub async fn send(&mut self, prompt: &str) -> Result<TurnOutcome> {
        let input = StateUpdate::message(Message::user(prompt));
        let mut events = self.app.stream(Some(input), RunConfig::new(self.thread_id.clone()));

        let mut last_state = None;
        let mut complete = false;
        while let Some(event) = events.next().await {
            match event.with_context(|| format!("Conversation turn failed on thread {}", self.thread_id))? {
                GraphEvent::Values(state) => last_state = Some(state),
                GraphEvent::Interrupted { next } => {
                    tracing::debug!("Waiting for user input before '{}'", next);
                }
                GraphEvent::Finished => complete = true,
            }
        }

        let state = last_state.context("Graph produced no state")?;
        let reply = state
            .last_message()
            .filter(|m| m.is_assistant())
            .map(|m| clean_response_text(&m.content))
            .unwrap_or_default();

        self.refresh_display(&state.messages);
        self.complete = complete;

        Ok(TurnOutcome { reply, complete })
    }
}
