use async_stream::try_stream;
use chrono::Utc;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tripchat_types::DEFAULT_RECURSION_LIMIT;

use crate::builder::{Branch, END};
use crate::checkpoint::{Checkpoint, Checkpointer};
use crate::error::GraphError;
use crate::node::Node;
use crate::state::{AgentState, StateUpdate};

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Runs pause right before these nodes
    pub interrupt_before: Vec<String>,
    /// Maximum node executions per run
    pub recursion_limit: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            interrupt_before: Vec::new(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl CompileOptions {
    pub fn with_interrupt_before<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interrupt_before = nodes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }
}

/// Per-run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub thread_id: String,
}

impl RunConfig {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// Full state after the input merge or after a node ran
    Values(AgentState),
    /// The run paused before `next`
    Interrupted { next: String },
    /// The run reached `END` or a node with no outgoing edge
    Finished,
}

pub(crate) struct GraphInner {
    pub(crate) nodes: HashMap<String, Arc<dyn Node>>,
    pub(crate) edges: HashMap<String, String>,
    pub(crate) branches: HashMap<String, Branch>,
    pub(crate) entry: String,
    pub(crate) interrupt_before: HashSet<String>,
    pub(crate) recursion_limit: usize,
    pub(crate) checkpointer: Arc<dyn Checkpointer>,
}

impl GraphInner {
    /// Successor of `node` given the state it produced; `None` ends the run
    fn next_node(&self, node: &str, state: &AgentState) -> Result<Option<String>, GraphError> {
        let next = if let Some(to) = self.edges.get(node) {
            Some(to.clone())
        } else if let Some(branch) = self.branches.get(node) {
            let key = (branch.router)(state);
            let to = branch.mapping.get(&key).ok_or_else(|| GraphError::UnmappedRoute {
                node: node.to_string(),
                key: key.clone(),
            })?;
            tracing::debug!("Router for '{}' chose '{}' -> '{}'", node, key, to);
            Some(to.clone())
        } else {
            None
        };

        Ok(next.filter(|to| to != END))
    }

    async fn save(&self, thread_id: &str, state: &AgentState, next: Option<String>, step: u64) -> Result<(), GraphError> {
        self.checkpointer
            .put(Checkpoint {
                thread_id: thread_id.to_string(),
                state: state.clone(),
                next,
                step,
                updated_at: Utc::now(),
            })
            .await
    }
}

/// Executable graph bound to a checkpointer. Cheap to clone.
#[derive(Clone)]
pub struct CompiledGraph {
    inner: Arc<GraphInner>,
}

impl CompiledGraph {
    pub(crate) fn from_inner(inner: GraphInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn entry_point(&self) -> &str {
        &self.inner.entry
    }

    pub fn interrupt_before(&self) -> Vec<String> {
        let mut nodes: Vec<String> = self.inner.interrupt_before.iter().cloned().collect();
        nodes.sort();
        nodes
    }

    pub fn checkpointer(&self) -> Arc<dyn Checkpointer> {
        Arc::clone(&self.inner.checkpointer)
    }

    /// Run one pass of the graph for a thread.
    ///
    /// With `Some(input)` the input is appended to the thread's state and the
    /// run starts at the entry point, dropping any pending node. With `None`
    /// the run continues from the node a previous run paused before.
    pub fn stream(&self, input: Option<StateUpdate>, config: RunConfig) -> BoxStream<'static, Result<GraphEvent, GraphError>> {
        let inner = Arc::clone(&self.inner);

        let events = try_stream! {
            let thread_id = config.thread_id.clone();
            let previous = inner.checkpointer.get(&thread_id).await?;
            let resuming = input.is_none();

            let (mut state, mut step, start) = match input {
                Some(update) => {
                    let (mut state, step) = previous
                        .map(|cp| (cp.state, cp.step + 1))
                        .unwrap_or_default();
                    state.apply(update);
                    (state, step, inner.entry.clone())
                }
                None => {
                    let checkpoint = previous.ok_or_else(|| GraphError::NothingToResume(thread_id.clone()))?;
                    let next = checkpoint
                        .next
                        .clone()
                        .ok_or_else(|| GraphError::NothingToResume(thread_id.clone()))?;
                    (checkpoint.state, checkpoint.step, next)
                }
            };

            if !resuming {
                inner.save(&thread_id, &state, Some(start.clone()), step).await?;
                yield GraphEvent::Values(state.clone());
            }

            let mut current = Some(start);
            let mut executed = 0usize;
            let mut interrupted = None;

            while let Some(name) = current.take() {
                let resumed_node = resuming && executed == 0;
                if !resumed_node && inner.interrupt_before.contains(&name) {
                    inner.save(&thread_id, &state, Some(name.clone()), step).await?;
                    interrupted = Some(name);
                    break;
                }

                if executed >= inner.recursion_limit {
                    Err::<(), _>(GraphError::RecursionLimit(inner.recursion_limit))?;
                }

                let node = inner.nodes.get(&name).cloned().ok_or_else(|| GraphError::UnknownNode {
                    node: name.clone(),
                    referenced_by: format!("checkpoint of thread {}", thread_id),
                })?;

                tracing::debug!("Thread {} step {}: running node '{}'", thread_id, step, name);
                let update = node
                    .run(&state, &config)
                    .await
                    .map_err(|source| GraphError::NodeFailed { node: name.clone(), source })?;
                state.apply(update);
                executed += 1;
                step += 1;

                current = inner.next_node(&name, &state)?;
                inner.save(&thread_id, &state, current.clone(), step).await?;
                yield GraphEvent::Values(state.clone());
            }

            match interrupted {
                Some(next) => {
                    tracing::debug!("Thread {} interrupted before '{}'", thread_id, next);
                    yield GraphEvent::Interrupted { next };
                }
                None => {
                    tracing::debug!("Thread {} finished after {} node(s)", thread_id, executed);
                    yield GraphEvent::Finished;
                }
            }
        };

        events.boxed()
    }

    /// Drive [`CompiledGraph::stream`] to completion and return the final state
    pub async fn invoke(&self, input: Option<StateUpdate>, config: RunConfig) -> Result<AgentState, GraphError> {
        let thread_id = config.thread_id.clone();
        let mut events = self.stream(input, config);
        let mut last = None;

        while let Some(event) = events.next().await {
            if let GraphEvent::Values(state) = event? {
                last = Some(state);
            }
        }

        match last {
            Some(state) => Ok(state),
            None => Ok(self.get_state(&thread_id).await?.map(|cp| cp.state).unwrap_or_default()),
        }
    }

    pub async fn resume(&self, config: RunConfig) -> Result<AgentState, GraphError> {
        self.invoke(None, config).await
    }

    /// Latest checkpoint of a thread
    pub async fn get_state(&self, thread_id: &str) -> Result<Option<Checkpoint>, GraphError> {
        self.inner.checkpointer.get(thread_id).await
    }
}
