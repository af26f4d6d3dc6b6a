use anyhow::{Context, Result};
use std::sync::Arc;

use tripchat_llm_api::{LlmClient, ToolDefinition};
use tripchat_logging::safe_truncate;
use tripchat_toolcore::{ToolContext, ToolParameters, ToolRegistry, ToolResult};
use tripchat_types::{Message, MAX_AGENT_ITERATIONS};

use crate::prompt::SYSTEM_PROMPT;

pub const ITERATION_LIMIT_MESSAGE: &str = "Agent stopped due to iteration limit or time limit.";

/// Longest observation excerpt written to the log
const OBSERVATION_LOG_CHARS: usize = 200;

/// One tool call made while producing an answer
#[derive(Debug, Clone, PartialEq)]
pub struct AgentStep {
    pub tool: String,
    pub arguments: String,
    pub observation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutput {
    pub output: String,
    pub intermediate_steps: Vec<AgentStep>,
}

/// Tool-calling agent loop.
///
/// The prompt is the system prompt, the conversation so far and a scratchpad
/// of this invocation's tool calls and observations. The scratchpad is
/// dropped once an answer is produced.
pub struct AgentExecutor {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    system_prompt: String,
    max_iterations: usize,
}

impl AgentExecutor {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            llm,
            tools,
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_iterations: MAX_AGENT_ITERATIONS,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .get_all_tools()
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect()
    }

    pub async fn invoke(&self, messages: &[Message]) -> Result<AgentOutput> {
        self.invoke_with_context(messages, &ToolContext::default()).await
    }

    pub async fn invoke_with_context(&self, messages: &[Message], context: &ToolContext) -> Result<AgentOutput> {
        let tools = self.tool_definitions();
        let mut prompt = Vec::with_capacity(messages.len() + 1);
        prompt.push(Message::system(self.system_prompt.clone()));
        prompt.extend(messages.iter().filter(|m| m.role != tripchat_types::ROLE_SYSTEM).cloned());

        let mut scratchpad: Vec<Message> = Vec::new();
        let mut steps = Vec::new();

        for iteration in 0..self.max_iterations {
            tracing::debug!("Agent iteration {}/{}", iteration + 1, self.max_iterations);

            let mut request = prompt.clone();
            request.extend(scratchpad.iter().cloned());

            let response = self
                .llm
                .chat(request, tools.clone())
                .await
                .with_context(|| format!("LLM request to {} failed", self.llm.model_name()))?;
            let message = response.message;

            let calls = match &message.tool_calls {
                Some(calls) if !calls.is_empty() => calls.clone(),
                _ => {
                    tracing::debug!("Agent finished with {} tool call(s)", steps.len());
                    return Ok(AgentOutput {
                        output: message.content,
                        intermediate_steps: steps,
                    });
                }
            };

            tracing::info!("LLM requested {} tool call(s)", calls.len());
            scratchpad.push(message);

            for call in calls {
                let name = call.function.name.clone();
                let arguments = call.function.arguments.clone();

                let result = match ToolParameters::from_json(&arguments) {
                    Ok(params) => self.tools.execute_tool(&name, params, context).await,
                    Err(e) => ToolResult::error(format!("Failed to parse tool arguments: {}", e)),
                };
                let observation = result.observation();

                if result.success {
                    tracing::debug!("Tool {} returned: {}", name, safe_truncate(&observation, OBSERVATION_LOG_CHARS));
                } else {
                    tracing::warn!("Tool {} failed: {}", name, safe_truncate(&observation, OBSERVATION_LOG_CHARS));
                }

                scratchpad.push(Message::tool(call.id.clone(), name.clone(), observation.clone()));
                steps.push(AgentStep {
                    tool: name,
                    arguments,
                    observation,
                });
            }
        }

        tracing::warn!("Agent hit the iteration limit of {}", self.max_iterations);
        Ok(AgentOutput {
            output: ITERATION_LIMIT_MESSAGE.to_string(),
            intermediate_steps: steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tripchat_llm_api::ScriptedLlmClient;
    use tripchat_tools::{travel_tool_registry, OfflineActivities};

    fn executor(llm: Arc<ScriptedLlmClient>) -> AgentExecutor {
        let tools = Arc::new(travel_tool_registry(Arc::new(OfflineActivities)));
        AgentExecutor::new(llm, tools)
    }

    #[tokio::test]
    async fn test_plain_reply() {
        let llm = Arc::new(ScriptedLlmClient::default());
        llm.push_reply("Where would you like to go?");

        let output = executor(llm.clone()).invoke(&[Message::user("hi")]).await.unwrap();
        assert_eq!(output.output, "Where would you like to go?");
        assert!(output.intermediate_steps.is_empty());

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages[0].role, "system");
        assert_eq!(requests[0].messages[0].content, SYSTEM_PROMPT);
        assert_eq!(
            requests[0].tool_names,
            vec!["search_activities", "search_flights", "search_hotels"]
        );
    }

    #[tokio::test]
    async fn test_tool_call_loop() {
        let llm = Arc::new(ScriptedLlmClient::default());
        llm.push_tool_call("call_1", "search_flights", json!({"destination": "Paris", "budget": 1000}));
        llm.push_reply("I found two flights. Which do you prefer?");

        let output = executor(llm.clone())
            .invoke(&[Message::user("Paris, $1000, 4 days")])
            .await
            .unwrap();

        assert_eq!(output.intermediate_steps.len(), 1);
        assert_eq!(
            output.intermediate_steps[0].observation,
            "I found two flights to Paris. A direct flight for $1100 and one with a layover for $950. Which do you prefer?"
        );

        let second = &llm.requests()[1].messages;
        assert_eq!(second.len(), 4);
        assert!(second[2].has_tool_calls());
        assert_eq!(second[3].role, "tool");
        assert_eq!(second[3].tool_call_id.as_deref(), Some("call_1"));
    }

    #[tokio::test]
    async fn test_unknown_tool_and_bad_arguments_become_observations() {
        let llm = Arc::new(ScriptedLlmClient::default());
        llm.push_tool_call("a", "book_flight", json!({}));
        llm.push(Message::assistant_tool_calls(
            "",
            vec![tripchat_types::ToolCall::function("b", "search_hotels", "{not json")],
        ));
        llm.push_reply("Sorry about that.");

        let output = executor(llm).invoke(&[Message::user("go")]).await.unwrap();
        assert_eq!(output.output, "Sorry about that.");
        assert!(output.intermediate_steps[0].observation.starts_with("Error: Tool 'book_flight' not found"));
        assert!(output.intermediate_steps[1]
            .observation
            .starts_with("Error: Failed to parse tool arguments"));
    }

    #[tokio::test]
    async fn test_iteration_limit() {
        let llm = Arc::new(ScriptedLlmClient::default());
        for i in 0..3 {
            llm.push_tool_call(&format!("c{}", i), "search_hotels", json!({"destination": "Rome"}));
        }

        let output = executor(llm.clone())
            .with_max_iterations(3)
            .invoke(&[Message::user("Rome")])
            .await
            .unwrap();
        assert_eq!(output.output, ITERATION_LIMIT_MESSAGE);
        assert_eq!(output.intermediate_steps.len(), 3);
        assert_eq!(llm.remaining(), 0);
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let llm = Arc::new(ScriptedLlmClient::default());
        let err = executor(llm).invoke(&[Message::user("hi")]).await.unwrap_err();
        assert!(format!("{:#}", err).contains("no responses left"));
    }
}
