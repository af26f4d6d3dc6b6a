use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::path::PathBuf;

use tripchat_types::{DEFAULT_MODEL, MAX_AGENT_ITERATIONS};

/// CLI arguments for tripchat
#[derive(Parser, Debug)]
#[command(name = "tripchat")]
#[command(about = "TripChat - plan a trip with an AI travel agent")]
#[command(version)]
pub struct Cli {
    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,

    /// Send a single message, print the reply and exit
    #[arg(long, value_name = "TEXT")]
    pub task: Option<String>,

    /// Print the task reply as JSON (only useful with --task)
    #[arg(long)]
    pub json: bool,

    /// Model name, optionally as "model@backend(url)"
    #[arg(long, value_name = "MODEL", env = "TRIPCHAT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Backend type (groq, openai, llama)
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<String>,

    /// Custom chat completions URL
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// LLM API key (default: GROQ_API_KEY, or OPENAI_API_KEY for the openai backend)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Tavily API key for activity search (default: TAVILY_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub tavily_key: Option<String>,

    /// Maximum LLM calls per agent answer
    #[arg(long, default_value_t = MAX_AGENT_ITERATIONS)]
    pub max_iterations: usize,

    /// Persist conversation checkpoints as JSON files in this directory
    #[arg(long, value_name = "DIR")]
    pub checkpoint_dir: Option<PathBuf>,

    /// Use the built-in rule-based planner instead of a remote LLM
    #[arg(long)]
    pub offline: bool,

    /// Don't write conversation and request logs to ~/.tripchat/logs
    #[arg(long)]
    pub no_logs: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Run the web chat server
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub web: bool,

    /// Web server port
    #[arg(long, default_value = "8080", env = "TRIPCHAT_WEB_PORT")]
    pub web_port: u16,

    /// Web server bind address
    #[arg(long, default_value = "127.0.0.1", env = "TRIPCHAT_WEB_BIND")]
    pub web_bind: String,
}

impl Cli {
    /// Write completions for `shell` to stdout
    pub fn print_completions(shell: Shell) {
        let mut command = Cli::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_task_mode_flags() {
        let cli = Cli::try_parse_from(["tripchat", "--task", "Paris for 3 days", "--json", "--offline"]).unwrap();
        assert_eq!(cli.task.as_deref(), Some("Paris for 3 days"));
        assert!(cli.json);
        assert!(cli.offline);
        assert!(!cli.web);
        assert_eq!(cli.max_iterations, MAX_AGENT_ITERATIONS);
    }

    #[test]
    fn test_web_flags() {
        let cli = Cli::try_parse_from(["tripchat", "--web", "--web-port", "9000", "--web-bind", "0.0.0.0"]).unwrap();
        assert!(cli.web);
        assert_eq!(cli.web_port, 9000);
        assert_eq!(cli.web_bind, "0.0.0.0");
    }
}
