//! # tripchat-llm-api
//!
//! A unified interface for the chat-completion backends the travel agent can
//! talk to:
//! - Groq (default, `llama-3.1-8b-instant`)
//! - OpenAI
//! - llama.cpp and other self-hosted OpenAI-compatible servers
//!
//! ## Example
//!
//! ```rust,no_run
//! use tripchat_llm_api::{BackendType, ClientFactory, ChatMessage};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ClientFactory::create(
//!         BackendType::Groq,
//!         Some("your-api-key".to_string()),
//!         "llama-3.1-8b-instant".to_string(),
//!         None,
//!     )?;
//!
//!     let response = client.chat(vec![ChatMessage::user("Hello!")], vec![]).await?;
//!     println!("Response: {}", response.message.content);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;

pub use client::{
    groq::GroqLlmClient, scripted::ScriptedLlmClient, ChatMessage, FunctionCall, LlmClient,
    LlmResponse, TokenUsage, ToolCall, ToolDefinition,
};

pub use config::{
    get_default_url_for_backend, normalize_api_url, parse_model_spec, BackendType,
    ClientFactory, GROQ_API_URL, OPENAI_API_URL,
};
