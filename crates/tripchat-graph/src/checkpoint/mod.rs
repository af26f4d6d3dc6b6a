//! Thread checkpoint storage.

mod file;
mod memory;

pub use file::JsonFileSaver;
pub use memory::MemorySaver;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::state::AgentState;

/// Snapshot of a thread after a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub thread_id: String,
    pub state: AgentState,
    /// Node the thread is paused before, `None` once a run has finished
    pub next: Option<String>,
    pub step: u64,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait Checkpointer: Send + Sync {
    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, GraphError>;

    /// Store `checkpoint` as the latest one of its thread
    async fn put(&self, checkpoint: Checkpoint) -> Result<(), GraphError>;

    async fn delete(&self, thread_id: &str) -> Result<(), GraphError>;

    async fn list_threads(&self) -> Result<Vec<String>, GraphError>;
}
