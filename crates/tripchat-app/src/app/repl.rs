use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use tripchat_graph::CompiledGraph;
use tripchat_types::Message;

use crate::app::Conversation;
use crate::config::AppConfig;

fn print_message(message: &Message) {
    if message.is_user() {
        println!("{} {}", "You:".bright_green().bold(), message.content);
    } else {
        println!("{} {}", "Assistant:".bright_cyan().bold(), message.content);
    }
}

fn print_help() {
    println!("{} Commands:", "💡".bright_yellow());
    println!("  /history          - Show the conversation so far");
    println!("  /reset            - Discard this trip and start a new one");
    println!("  /thread           - Show the current thread id");
    println!("  /thread <id>      - Resume a saved thread (needs --checkpoint-dir)");
    println!("  exit, quit        - Leave");
}

/// Run interactive REPL mode
pub async fn run_repl_mode(config: &AppConfig, app: CompiledGraph) -> Result<()> {
    let logs_dir = config.logs_dir.as_deref();

    println!("{}", "✈️  TripChat - your travel planning assistant".bright_cyan().bold());
    println!("{}", format!("Model: {}", config.model_label()).bright_black());
    println!("{}", "Type 'exit' or 'quit' to exit, or '/help' for commands\n".bright_black());

    let mut conversation = Conversation::start(app.clone(), logs_dir, config.model_label()).await;
    for message in conversation.history() {
        print_message(message);
    }

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&format!("{} ", "You:".bright_green().bold()));

        match readline {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                if line == "exit" || line == "quit" {
                    println!("{}", "Goodbye!".bright_cyan());
                    break;
                }

                if line == "/help" {
                    print_help();
                    continue;
                }

                if line == "/history" {
                    for message in conversation.history() {
                        print_message(message);
                    }
                    continue;
                }

                if line == "/reset" {
                    if let Err(e) = conversation.reset(logs_dir).await {
                        eprintln!("{} {:#}", "⚠️".bright_yellow(), e);
                    }
                    println!("{} Started a new trip (thread {})", "🔄".bright_cyan(), conversation.thread_id());
                    for message in conversation.history() {
                        print_message(message);
                    }
                    continue;
                }

                if line == "/thread" {
                    println!("{} Thread: {}", "🧵".bright_cyan(), conversation.thread_id());
                    continue;
                }

                if let Some(thread_id) = line.strip_prefix("/thread ") {
                    match Conversation::restore(app.clone(), thread_id.trim(), logs_dir, config.model_label()).await {
                        Ok(restored) => {
                            conversation.close().await;
                            conversation = restored;
                            println!("{} Resumed thread {}", "📂".bright_green(), conversation.thread_id());
                            for message in conversation.history() {
                                print_message(message);
                            }
                        }
                        Err(e) => eprintln!("{} {:#}", "❌ Failed to resume:".bright_red(), e),
                    }
                    continue;
                }

                match conversation.send(line).await {
                    Ok(outcome) => {
                        println!("{} {}\n", "Assistant:".bright_cyan().bold(), outcome.reply);
                        if outcome.complete {
                            println!(
                                "{}",
                                "✅ Your itinerary is complete. Type /reset to plan another trip.".bright_green()
                            );
                        }
                    }
                    Err(e) => {
                        eprintln!("{} {:#}\n", "Error:".bright_red().bold(), e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(e) => {
                conversation.close().await;
                return Err(e.into());
            }
        }
    }

    conversation.close().await;
    Ok(())
}
