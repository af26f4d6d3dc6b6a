use anyhow::{bail, Result};
use std::path::PathBuf;

use tripchat_llm_api::{parse_model_spec, BackendType};
use tripchat_types::{DEFAULT_MODEL, MAX_AGENT_ITERATIONS};

use crate::cli::Cli;

pub const TAVILY_API_KEY_ENV: &str = "TAVILY_API_KEY";

/// Application configuration derived from CLI arguments and environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendType,
    pub model: String,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub tavily_key: Option<String>,
    pub max_iterations: usize,
    pub checkpoint_dir: Option<PathBuf>,
    pub offline: bool,
    /// Directory for conversation and request logs; `None` disables them
    pub logs_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::Groq,
            model: DEFAULT_MODEL.to_string(),
            api_url: None,
            api_key: None,
            tavily_key: None,
            max_iterations: MAX_AGENT_ITERATIONS,
            checkpoint_dir: None,
            offline: false,
            logs_dir: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Resolve configuration from parsed flags and the process environment
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Self::resolve(cli, |name| std::env::var(name).ok())?;

        if !cli.no_logs {
            config.logs_dir = match tripchat_logging::get_logs_dir() {
                Ok(dir) => Some(dir),
                Err(e) => {
                    tracing::warn!("Logging disabled: {:#}", e);
                    None
                }
            };
        }

        Ok(config)
    }

    /// Precedence: CLI flags > model spec > environment > defaults
    pub fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let (model, spec_backend, spec_url) = parse_model_spec(&cli.model);

        let backend = match cli.backend.as_deref() {
            Some(name) => match BackendType::from_str(name) {
                Some(backend) => backend,
                None => bail!("Unknown backend '{}' (expected groq, openai or llama)", name),
            },
            None => spec_backend.unwrap_or(BackendType::Groq),
        };

        let api_url = non_empty(cli.api_url.clone()).or(spec_url);
        let api_key = non_empty(cli.api_key.clone())
            .or_else(|| non_empty(backend.api_key_env().and_then(&env)));
        let tavily_key = non_empty(cli.tavily_key.clone()).or_else(|| non_empty(env(TAVILY_API_KEY_ENV)));

        if !cli.offline {
            if let (None, Some(var)) = (&api_key, backend.api_key_env()) {
                bail!(
                    "{} is not set. Export it, pass --api-key, or run with --offline",
                    var
                );
            }
            if backend == BackendType::Llama && api_url.is_none() {
                bail!("The llama backend needs --api-url or a model spec like model@llama(http://host:port)");
            }
        }

        if cli.max_iterations == 0 {
            bail!("--max-iterations must be at least 1");
        }

        Ok(Self {
            backend,
            model,
            api_url,
            api_key,
            tavily_key,
            max_iterations: cli.max_iterations,
            checkpoint_dir: cli.checkpoint_dir.clone(),
            offline: cli.offline,
            logs_dir: None,
        })
    }

    /// Name shown to the user for the answering model
    pub fn model_label(&self) -> String {
        if self.offline {
            "offline planner".to_string()
        } else {
            format!("{}@{}", self.model, self.backend.as_str())
        }
    }
}
