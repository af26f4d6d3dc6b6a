//! Message-state graph runtime.
//!
//! ```text
//! StateGraph ─► compile(checkpointer, options) ─► CompiledGraph
//!                                                  │
//!                                                  ├─► stream(input, config) ─► GraphEvent*
//!                                                  └─► Checkpointer (memory / JSON files)
//! ```
//!
//! State is an append-only list of messages. Each run starts at the entry
//! point, executes nodes along fixed or conditional edges and stops at
//! `END`, at a node with no outgoing edge, or right before a node listed in
//! `interrupt_before`. The thread's state is checkpointed after every step.

pub mod builder;
pub mod checkpoint;
pub mod compiled;
pub mod error;
pub mod node;
pub mod state;

pub use builder::{StateGraph, END};
pub use checkpoint::{Checkpoint, Checkpointer, JsonFileSaver, MemorySaver};
pub use compiled::{CompileOptions, CompiledGraph, GraphEvent, RunConfig};
pub use error::GraphError;
pub use node::{FnNode, Node, Passthrough, Router};
pub use state::{AgentState, StateUpdate};
