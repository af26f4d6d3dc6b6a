use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Checkpoint, Checkpointer};
use crate::error::GraphError;

/// Keeps the latest checkpoint of each thread in memory
#[derive(Default)]
pub struct MemorySaver {
    checkpoints: RwLock<HashMap<String, Checkpoint>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, GraphError> {
        Ok(self.checkpoints.read().await.get(thread_id).cloned())
    }

    async fn put(&self, checkpoint: Checkpoint) -> Result<(), GraphError> {
        self.checkpoints
            .write()
            .await
            .insert(checkpoint.thread_id.clone(), checkpoint);
        Ok(())
    }

    async fn delete(&self, thread_id: &str) -> Result<(), GraphError> {
        self.checkpoints.write().await.remove(thread_id);
        Ok(())
    }

    async fn list_threads(&self) -> Result<Vec<String>, GraphError> {
        let mut threads: Vec<String> = self.checkpoints.read().await.keys().cloned().collect();
        threads.sort();
        Ok(threads)
    }
}
