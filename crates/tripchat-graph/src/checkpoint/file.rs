use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{Checkpoint, Checkpointer};
use crate::error::GraphError;

/// Stores one pretty-printed JSON file per thread in a directory
pub struct JsonFileSaver {
    dir: PathBuf,
}

impl JsonFileSaver {
    /// Open (and create if needed) the checkpoint directory
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, GraphError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn thread_path(&self, thread_id: &str) -> Result<PathBuf, GraphError> {
        let valid = !thread_id.is_empty()
            && thread_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(GraphError::InvalidThreadId(thread_id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", thread_id)))
    }
}

#[async_trait]
impl Checkpointer for JsonFileSaver {
    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, GraphError> {
        let path = self.thread_path(thread_id)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, checkpoint: Checkpoint) -> Result<(), GraphError> {
        let path = self.thread_path(&checkpoint.thread_id)?;
        let json = serde_json::to_string_pretty(&checkpoint)?;

        // Write then rename so readers never see a partial file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn delete(&self, thread_id: &str) -> Result<(), GraphError> {
        let path = self.thread_path(thread_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_threads(&self) -> Result<Vec<String>, GraphError> {
        let mut threads = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem() {
                    threads.push(stem.to_string_lossy().to_string());
                }
            }
        }

        threads.sort();
        Ok(threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AgentState;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use tripchat_types::Message;

    fn checkpoint(thread_id: &str, next: Option<&str>) -> Checkpoint {
        Checkpoint {
            thread_id: thread_id.to_string(),
            state: AgentState::new(vec![Message::user("Paris please")]),
            next: next.map(str::to_string),
            step: 2,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let saver = JsonFileSaver::new(dir.path().join("checkpoints")).unwrap();

        assert_eq!(saver.get("t-1").await.unwrap(), None);

        let cp = checkpoint("t-1", Some("interrupt"));
        saver.put(cp.clone()).await.unwrap();
        assert_eq!(saver.get("t-1").await.unwrap(), Some(cp));
        assert_eq!(saver.list_threads().await.unwrap(), vec!["t-1".to_string()]);

        saver.delete("t-1").await.unwrap();
        saver.delete("t-1").await.unwrap();
        assert_eq!(saver.get("t-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_path_like_thread_ids() {
        let dir = tempfile::tempdir().unwrap();
        let saver = JsonFileSaver::new(dir.path()).unwrap();

        let err = saver.get("../escape").await.unwrap_err();
        assert!(matches!(err, GraphError::InvalidThreadId(_)));
        assert!(saver.put(checkpoint("", None)).await.is_err());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        JsonFileSaver::new(dir.path())
            .unwrap()
            .put(checkpoint("abc", None))
            .await
            .unwrap();

        let reopened = JsonFileSaver::new(dir.path()).unwrap();
        let cp = reopened.get("abc").await.unwrap().unwrap();
        assert_eq!(cp.state.messages[0].content, "Paris please");
        assert_eq!(cp.next, None);
    }
}
