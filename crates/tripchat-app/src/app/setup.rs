use anyhow::{Context, Result};
use std::sync::Arc;

use tripchat_agent::{build_travel_workflow, compile_travel_app, AgentExecutor, OfflinePlanner};
use tripchat_graph::{Checkpointer, CompiledGraph, JsonFileSaver, MemorySaver};
use tripchat_llm_api::{ClientFactory, LlmClient};
use tripchat_tools::{activity_search_backend, travel_tool_registry};

use crate::config::AppConfig;

/// LLM client for the configured backend, or the offline planner
pub fn create_llm_client(config: &AppConfig) -> Result<Arc<dyn LlmClient>> {
    if config.offline {
        tracing::info!("Running offline with the rule-based planner");
        return Ok(Arc::new(OfflinePlanner::new()));
    }

    match &config.logs_dir {
        Some(dir) => ClientFactory::create_with_request_logs(
            config.backend,
            config.api_key.clone(),
            config.model.clone(),
            config.api_url.clone(),
            dir.clone(),
        ),
        None => ClientFactory::create(
            config.backend,
            config.api_key.clone(),
            config.model.clone(),
            config.api_url.clone(),
        ),
    }
}

fn create_checkpointer(config: &AppConfig) -> Result<Arc<dyn Checkpointer>> {
    match &config.checkpoint_dir {
        Some(dir) => {
            let saver = JsonFileSaver::new(dir)
                .with_context(|| format!("Failed to open checkpoint directory {}", dir.display()))?;
            tracing::info!("Checkpoints stored in {}", dir.display());
            Ok(Arc::new(saver))
        }
        None => Ok(Arc::new(MemorySaver::new())),
    }
}

/// Wire tools, executor, workflow and checkpointer into the runnable app
pub fn build_travel_app_with_llm(config: &AppConfig, llm: Arc<dyn LlmClient>) -> Result<CompiledGraph> {
    let tools = Arc::new(travel_tool_registry(activity_search_backend(config.tavily_key.clone())));
    let executor = Arc::new(AgentExecutor::new(llm, tools).with_max_iterations(config.max_iterations));
    let workflow = build_travel_workflow(executor);

    compile_travel_app(workflow, create_checkpointer(config)?).context("Failed to compile the travel workflow")
}

pub fn build_travel_app(config: &AppConfig) -> Result<CompiledGraph> {
    let llm = create_llm_client(config)?;
    build_travel_app_with_llm(config, llm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_app_builds() {
        let config = AppConfig {
            offline: true,
            ..Default::default()
        };
        let app = build_travel_app(&config).unwrap();
        assert_eq!(app.entry_point(), "agent");
        assert_eq!(app.interrupt_before(), vec!["interrupt".to_string()]);
    }

    #[test]
    fn test_checkpoint_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            offline: true,
            checkpoint_dir: Some(dir.path().join("threads")),
            ..Default::default()
        };
        build_travel_app(&config).unwrap();
        assert!(dir.path().join("threads").is_dir());
    }
}
