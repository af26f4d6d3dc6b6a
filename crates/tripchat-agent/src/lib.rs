//! The travel-planning agent: prompt, tool-calling executor, conversation
//! graph and chat session.

pub mod cleanup;
pub mod executor;
pub mod offline;
pub mod prompt;
pub mod router;
pub mod session;
pub mod workflow;

pub use cleanup::clean_response_text;
pub use executor::{AgentExecutor, AgentOutput, AgentStep, ITERATION_LIMIT_MESSAGE};
pub use offline::OfflinePlanner;
pub use prompt::{FINAL_ITINERARY_MARKER, GREETING, SYSTEM_PROMPT};
pub use router::{route, router, Route};
pub use session::{TravelSession, TurnOutcome};
pub use workflow::{build_travel_workflow, compile_travel_app, AgentNode, AGENT_NODE, INTERRUPT_NODE};
