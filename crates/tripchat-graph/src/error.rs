use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node '{0}' already exists")]
    DuplicateNode(String),

    #[error("'{0}' is a reserved node name")]
    ReservedName(String),

    #[error("unknown node '{node}' referenced by {referenced_by}")]
    UnknownNode { node: String, referenced_by: String },

    #[error("graph has no entry point")]
    MissingEntryPoint,

    #[error("node '{0}' has both a fixed edge and conditional edges")]
    ConflictingEdges(String),

    #[error("router for '{node}' returned '{key}', which is not in its mapping")]
    UnmappedRoute { node: String, key: String },

    #[error("recursion limit of {0} reached without hitting a stop condition")]
    RecursionLimit(usize),

    #[error("thread '{0}' has no pending node to resume")]
    NothingToResume(String),

    #[error("invalid thread id '{0}'")]
    InvalidThreadId(String),

    #[error("node '{node}' failed: {source}")]
    NodeFailed {
        node: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("checkpoint IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
