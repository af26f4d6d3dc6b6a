use async_trait::async_trait;
use std::sync::Arc;

use crate::compiled::RunConfig;
use crate::state::{AgentState, StateUpdate};

/// A unit of work in the graph. `config` identifies the thread being run.
#[async_trait]
pub trait Node: Send + Sync {
    async fn run(&self, state: &AgentState, config: &RunConfig) -> anyhow::Result<StateUpdate>;
}

/// Picks the mapping key for a conditional edge
pub type Router = Arc<dyn Fn(&AgentState) -> String + Send + Sync>;

/// Identity node; contributes nothing to the state
pub struct Passthrough;

#[async_trait]
impl Node for Passthrough {
    async fn run(&self, _state: &AgentState, _config: &RunConfig) -> anyhow::Result<StateUpdate> {
        Ok(StateUpdate::default())
    }
}

/// Wraps a synchronous closure as a node
pub struct FnNode<F>(pub F);

impl<F> FnNode<F>
where
    F: Fn(&AgentState) -> anyhow::Result<StateUpdate> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Node for FnNode<F>
where
    F: Fn(&AgentState) -> anyhow::Result<StateUpdate> + Send + Sync,
{
    async fn run(&self, state: &AgentState, _config: &RunConfig) -> anyhow::Result<StateUpdate> {
        (self.0)(state)
    }
}
