//! Tool abstraction shared by the travel agent and its search tools.

pub mod tool;
pub mod tool_context;
pub mod tool_registry;

pub use tool::Tool;
pub use tool_context::ToolContext;
pub use tool_registry::ToolRegistry;
pub use tripchat_types::{param, ParameterDefinition, ToolParameters, ToolResult};
