pub mod conversation;
pub mod repl;
pub mod setup;
pub mod task;
pub mod web_server;

pub use conversation::Conversation;
pub use repl::run_repl_mode;
pub use setup::{build_travel_app, build_travel_app_with_llm, create_llm_client};
pub use task::run_task_mode;
pub use web_server::run_web_server;
