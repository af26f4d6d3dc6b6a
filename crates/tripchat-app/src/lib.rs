//! TripChat application: command line, REPL, one-shot task mode and the
//! web chat server around the travel-planning agent.

pub mod app;
pub mod cli;
pub mod config;
pub mod web;

pub use app::{build_travel_app, build_travel_app_with_llm, create_llm_client, Conversation};
pub use cli::Cli;
pub use config::AppConfig;
