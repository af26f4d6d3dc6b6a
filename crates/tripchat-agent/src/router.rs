use tripchat_graph::AgentState;

use crate::prompt::FINAL_ITINERARY_MARKER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    End,
    Interrupt,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::End => "end",
            Route::Interrupt => "interrupt",
        }
    }
}

/// `End` once the last message carries the final itinerary marker
pub fn route(state: &AgentState) -> Route {
    match state.last_message() {
        Some(message) if message.content.contains(FINAL_ITINERARY_MARKER) => Route::End,
        _ => Route::Interrupt,
    }
}

/// Route key for the graph's conditional edges
pub fn router(state: &AgentState) -> String {
    route(state).as_str().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripchat_types::Message;

    fn state(messages: Vec<Message>) -> AgentState {
        AgentState::new(messages)
    }

    #[test]
    fn test_final_itinerary_ends() {
        let s = state(vec![
            Message::user("yes"),
            Message::assistant("Great! Here is your final itinerary:\n- Flight: direct"),
        ]);
        assert_eq!(router(&s), "end");
    }

    #[test]
    fn test_anything_else_interrupts() {
        assert_eq!(router(&state(vec![])), "interrupt");
        assert_eq!(router(&state(vec![Message::assistant("Which flight do you prefer?")])), "interrupt");
        assert_eq!(router(&state(vec![Message::assistant("here is your final itinerary:")])), "interrupt");
    }

    #[test]
    fn test_only_last_message_counts() {
        let s = state(vec![
            Message::assistant("Here is your final itinerary: ..."),
            Message::user("Actually, change the hotel"),
        ]);
        assert_eq!(route(&s), Route::Interrupt);
    }
}
