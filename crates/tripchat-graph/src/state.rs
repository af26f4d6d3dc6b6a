use serde::{Deserialize, Serialize};
use tripchat_types::Message;

/// Graph state: the ordered conversation of one thread
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub messages: Vec<Message>,
}

impl AgentState {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append reducer: updates never replace existing messages
    pub fn apply(&mut self, update: StateUpdate) {
        self.messages.extend(update.messages);
    }
}

/// Partial state returned by a node or supplied as run input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub messages: Vec<Message>,
}

impl StateUpdate {
    pub fn messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn message(message: Message) -> Self {
        Self {
            messages: vec![message],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_apply_appends() {
        let mut state = AgentState::new(vec![Message::user("hi")]);
        state.apply(StateUpdate::message(Message::assistant("hello")));
        state.apply(StateUpdate::default());
        state.apply(StateUpdate::messages(vec![Message::user("a"), Message::user("b")]));

        let contents: Vec<&str> = state.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "hello", "a", "b"]);
        assert_eq!(state.last_message().map(|m| m.content.as_str()), Some("b"));
    }
}
