// Logging module - conversation and request logging
pub mod conversation_logger;
pub mod request_logger;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use conversation_logger::ConversationLogger;

pub use request_logger::{log_request_to_file, log_response_to_file, redact_api_key};

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Get or create the base tripchat directory (~/.tripchat)
pub fn get_tripchat_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    let tripchat_dir = PathBuf::from(home_dir).join(".tripchat");
    ensure_dir(&tripchat_dir)?;
    Ok(tripchat_dir)
}

/// Get or create the logs directory (~/.tripchat/logs)
pub fn get_logs_dir() -> Result<PathBuf> {
    let logs_dir = get_tripchat_dir()?.join("logs");
    ensure_dir(&logs_dir)?;
    Ok(logs_dir)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_truncate() {
        assert_eq!(safe_truncate("short", 10), "short");
        assert_eq!(safe_truncate("a longer sentence", 8), "a lon...");
        assert_eq!(safe_truncate("abcdef", 2), "...");
        // multi-byte characters are counted as characters, not bytes
        assert_eq!(safe_truncate("ééééé", 4), "é...");
    }
}
