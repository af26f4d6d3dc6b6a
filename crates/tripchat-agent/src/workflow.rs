use async_trait::async_trait;
use std::sync::Arc;

use tripchat_graph::{
    AgentState, Checkpointer, CompileOptions, CompiledGraph, GraphError, Node, Passthrough, RunConfig, StateGraph,
    StateUpdate, END,
};
use tripchat_toolcore::ToolContext;
use tripchat_types::Message;

use crate::executor::AgentExecutor;
use crate::router::{router, Route};

pub const AGENT_NODE: &str = "agent";
pub const INTERRUPT_NODE: &str = "interrupt";

/// Runs the executor over the conversation and appends its answer
pub struct AgentNode {
    executor: Arc<AgentExecutor>,
}

impl AgentNode {
    pub fn new(executor: Arc<AgentExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Node for AgentNode {
    async fn run(&self, state: &AgentState, config: &RunConfig) -> anyhow::Result<StateUpdate> {
        let context = ToolContext::new(config.thread_id.clone());
        let result = self.executor.invoke_with_context(&state.messages, &context).await?;
        Ok(StateUpdate::message(Message::assistant(result.output)))
    }
}

/// `agent` routes to `END` on a final itinerary and to `interrupt` otherwise
pub fn build_travel_workflow(executor: Arc<AgentExecutor>) -> StateGraph {
    let mut workflow = StateGraph::new();
    workflow
        .add_node(AGENT_NODE, AgentNode::new(executor))
        .add_node(INTERRUPT_NODE, Passthrough)
        .add_conditional_edges(
            AGENT_NODE,
            router,
            [(Route::End.as_str(), END), (Route::Interrupt.as_str(), INTERRUPT_NODE)],
        )
        .set_entry_point(AGENT_NODE);
    workflow
}

/// Compile so that every run pauses before `interrupt` to wait for the user
pub fn compile_travel_app(workflow: StateGraph, checkpointer: Arc<dyn Checkpointer>) -> Result<CompiledGraph, GraphError> {
    workflow.compile(
        checkpointer,
        CompileOptions::default().with_interrupt_before([INTERRUPT_NODE]),
    )
}
