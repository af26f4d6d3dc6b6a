use anyhow::Result;
use colored::Colorize;

use tripchat_graph::CompiledGraph;

use crate::app::Conversation;
use crate::config::AppConfig;

/// Run in task mode - send one message and print the reply
pub async fn run_task_mode(config: &AppConfig, app: CompiledGraph, task_text: String, json: bool) -> Result<()> {
    if !json {
        println!("{}", "✈️  TripChat - Task Mode".bright_cyan().bold());
        println!("{}", format!("Task: {}", task_text).bright_yellow());
        println!();
    }

    let mut conversation = Conversation::start(app, config.logs_dir.as_deref(), config.model_label()).await;
    let result = conversation.send(&task_text).await;
    conversation.close().await;
    let outcome = result?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "thread_id": conversation.thread_id(),
                "reply": outcome.reply,
                "complete": outcome.complete,
            }))?
        );
    } else {
        println!("{}", outcome.reply);
    }

    Ok(())
}
