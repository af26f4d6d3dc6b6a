//! Rule-based stand-in for the LLM, used with `--offline`.
//!
//! It walks the same five steps as the system prompt: collect destination,
//! budget and days, then call the flight, hotel and activity tools one turn
//! at a time, and finally write the itinerary from the user's answers.

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use tripchat_llm_api::{ChatMessage, LlmClient, LlmResponse, ToolCall, ToolDefinition};
use tripchat_types::{ROLE_ASSISTANT, ROLE_TOOL, ROLE_USER};

use crate::prompt::FINAL_ITINERARY_MARKER;

const FLIGHTS_OFFERED: &str = "I found two flights to";
const HOTELS_OFFERED: &str = "I found three great hotels in";
const ACTIVITIES_OFFERED: &str = "Would you like to add any of these to your itinerary?";

static DESTINATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:to|in|visit|visiting|destination is)\s+([A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*)")
        .expect("destination pattern is valid")
});
static BUDGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\$\s?(\d[\d,]*)|(\d[\d,]*)\s*(?:dollars|usd\b|\$))").expect("budget pattern is valid")
});
static DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*-?\s*(?:days?|nights?)\b").expect("days pattern is valid"));
static FLIGHT_CHOICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:direct|layover)\b").expect("flight choice pattern is valid"));
static HOTEL_CHOICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:grand plaza|city center|budget stay|luxury|mid-range|economy)\b")
        .expect("hotel choice pattern is valid")
});

const FLIGHT_REPROMPT: &str = "Please pick one of the flights: the direct flight or the one with a layover.";
const HOTEL_REPROMPT: &str =
    "Please pick one of the hotels: 'The Grand Plaza', 'City Center Inn' or 'Budget Stay'.";

#[derive(Debug, Default, Clone, PartialEq)]
struct TripDetails {
    destination: Option<String>,
    budget: Option<i64>,
    days: Option<u32>,
}

impl TripDetails {
    /// The first mention of each detail wins; later answers such as
    /// "one night in The Grand Plaza" must not change the trip.
    fn from_messages(messages: &[ChatMessage]) -> Self {
        let mut details = TripDetails::default();
        for message in messages.iter().filter(|m| m.role == ROLE_USER) {
            let text = &message.content;
            if details.destination.is_none() {
                if let Some(c) = DESTINATION.captures(text) {
                    details.destination = Some(c[1].to_string());
                }
            }
            if details.budget.is_none() {
                details.budget = BUDGET.captures(text).and_then(|c| {
                    let digits: String = c
                        .get(1)
                        .or_else(|| c.get(2))?
                        .as_str()
                        .chars()
                        .filter(|ch| ch.is_ascii_digit())
                        .collect();
                    digits.parse().ok()
                });
            }
            if details.days.is_none() {
                details.days = DAYS.captures(text).and_then(|c| c[1].parse().ok());
            }
        }
        details
    }

    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.destination.is_none() {
            missing.push("destination");
        }
        if self.budget.is_none() {
            missing.push("budget");
        }
        if self.days.is_none() {
            missing.push("number of days");
        }
        missing
    }
}

/// The user's reply to the assistant message containing `offer`
fn answer_to(messages: &[ChatMessage], offer: &str) -> Option<String> {
    let index = messages
        .iter()
        .rposition(|m| m.role == ROLE_ASSISTANT && m.content.contains(offer))?;
    messages[index + 1..]
        .iter()
        .find(|m| m.role == ROLE_USER)
        .map(|m| m.content.trim().to_string())
}

/// The first reply to `offer` that names one of the offered options
fn choice_for(messages: &[ChatMessage], offer: &str, options: &Regex) -> Option<String> {
    let index = messages
        .iter()
        .rposition(|m| m.role == ROLE_ASSISTANT && m.content.contains(offer))?;
    messages[index + 1..]
        .iter()
        .filter(|m| m.role == ROLE_USER)
        .find(|m| options.is_match(&m.content))
        .map(|m| m.content.trim().to_string())
}

fn offered(messages: &[ChatMessage], offer: &str) -> bool {
    messages
        .iter()
        .any(|m| m.role == ROLE_ASSISTANT && m.content.contains(offer))
}

#[derive(Default)]
pub struct OfflinePlanner;

impl OfflinePlanner {
    pub fn new() -> Self {
        Self
    }

    fn present_tool_result(&self, messages: &[ChatMessage], result: &ChatMessage) -> ChatMessage {
        let tool = result.name.as_deref().unwrap_or_default();
        if result.content.starts_with("Error:") {
            return ChatMessage::assistant(format!(
                "Sorry, I couldn't complete the {} search ({}). Could you try again?",
                tool.replace('_', " "),
                result.content
            ));
        }

        if tool == "search_activities" {
            let place = TripDetails::from_messages(messages)
                .destination
                .unwrap_or_else(|| "your destination".to_string());
            return ChatMessage::assistant(format!(
                "Here are some things to do in {}:\n{}\n\n{}",
                place, result.content, ACTIVITIES_OFFERED
            ));
        }

        ChatMessage::assistant(result.content.clone())
    }

    fn tool_call(&self, messages: &[ChatMessage], name: &str, arguments: serde_json::Value) -> ChatMessage {
        let call = ToolCall::function(format!("call_{}", messages.len()), name, arguments.to_string());
        ChatMessage::assistant_tool_calls("", vec![call])
    }

    fn itinerary(&self, details: &TripDetails, messages: &[ChatMessage]) -> String {
        format!(
            "{}\n- Destination: {}\n- Duration: {} days\n- Budget: ${}\n- Flight: {}\n- Hotel: {}\n- Activities: {}\nEnjoy your trip!",
            FINAL_ITINERARY_MARKER,
            details.destination.as_deref().unwrap_or("unknown"),
            details.days.unwrap_or_default(),
            details.budget.unwrap_or_default(),
            choice_for(messages, FLIGHTS_OFFERED, &FLIGHT_CHOICE).unwrap_or_default(),
            choice_for(messages, HOTELS_OFFERED, &HOTEL_CHOICE).unwrap_or_default(),
            answer_to(messages, ACTIVITIES_OFFERED).unwrap_or_default(),
        )
    }

    fn next_message(&self, messages: &[ChatMessage]) -> ChatMessage {
        if let Some(last) = messages.last().filter(|m| m.role == ROLE_TOOL) {
            return self.present_tool_result(messages, last);
        }

        if offered(messages, FINAL_ITINERARY_MARKER) {
            return ChatMessage::assistant(
                "Your itinerary is already complete. Start a new session to plan another trip!",
            );
        }

        let details = TripDetails::from_messages(messages);
        let destination = details.destination.clone().unwrap_or_default();

        if offered(messages, ACTIVITIES_OFFERED) {
            return ChatMessage::assistant(self.itinerary(&details, messages));
        }
        if offered(messages, HOTELS_OFFERED) {
            if choice_for(messages, HOTELS_OFFERED, &HOTEL_CHOICE).is_none() {
                return ChatMessage::assistant(HOTEL_REPROMPT);
            }
            return self.tool_call(messages, "search_activities", json!({ "query": destination }));
        }
        if offered(messages, FLIGHTS_OFFERED) {
            if choice_for(messages, FLIGHTS_OFFERED, &FLIGHT_CHOICE).is_none() {
                return ChatMessage::assistant(FLIGHT_REPROMPT);
            }
            return self.tool_call(messages, "search_hotels", json!({ "destination": destination }));
        }

        let missing = details.missing();
        if missing.is_empty() {
            return self.tool_call(
                messages,
                "search_flights",
                json!({ "destination": destination, "budget": details.budget.unwrap_or_default() }),
            );
        }

        ChatMessage::assistant(format!(
            "Hello! I'd be glad to help you plan your trip. Could you tell me your {}?",
            missing.join(", ")
        ))
    }
}

#[async_trait]
impl LlmClient for OfflinePlanner {
    async fn chat(&self, messages: Vec<ChatMessage>, _tools: Vec<ToolDefinition>) -> Result<LlmResponse> {
        Ok(LlmResponse::from_message(self.next_message(&messages)))
    }

    fn model_name(&self) -> &str {
        "offline-planner"
    }
}
