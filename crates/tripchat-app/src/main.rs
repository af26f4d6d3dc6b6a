use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tripchat::app::{build_travel_app, run_repl_mode, run_task_mode, run_web_server};
use tripchat::{AppConfig, Cli};

const CRATES: &[&str] = &[
    "tripchat",
    "tripchat_agent",
    "tripchat_graph",
    "tripchat_llm_api",
    "tripchat_logging",
    "tripchat_tools",
    "tripchat_toolcore",
];

/// RUST_LOG wins; otherwise our crates log at info (debug with --verbose)
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let default_filter = std::iter::once("warn".to_string())
        .chain(CRATES.iter().map(|krate| format!("{}={}", krate, level)))
        .collect::<Vec<_>>()
        .join(",");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(shell) = cli.generate {
        Cli::print_completions(shell);
        return Ok(());
    }

    init_tracing(cli.verbose);

    let config = AppConfig::from_cli(&cli)?;
    let app = build_travel_app(&config)?;

    if let Some(task_text) = cli.task.clone() {
        return run_task_mode(&config, app, task_text, cli.json).await;
    }

    if cli.web {
        return run_web_server(&config, app, &cli.web_bind, cli.web_port).await;
    }

    run_repl_mode(&config, app).await
}
