use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Keep only a short prefix of an API key for log output
pub fn redact_api_key(api_key: &str) -> String {
    format!("{}***", api_key.chars().take(6).collect::<String>())
}

fn describe_url(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed_url) => {
            let port = parsed_url.port().map(|p| p.to_string()).unwrap_or_else(|| {
                if parsed_url.scheme() == "https" {
                    "443 (default)".to_string()
                } else {
                    "80 (default)".to_string()
                }
            });
            format!(
                "URL: {}\nHost: {}\nPort: {}\nScheme: {}\n\n",
                url,
                parsed_url.host_str().unwrap_or("unknown"),
                port,
                parsed_url.scheme()
            )
        }
        Err(_) => format!("URL: {}\n\n", url),
    }
}

/// Write an outgoing LLM request to `logs_dir` for persistent debugging.
///
/// The file is named `req-{timestamp}-{model}.txt`; the API key is redacted.
pub fn log_request_to_file(
    logs_dir: &Path,
    url: &str,
    request: &serde_json::Value,
    model: &str,
    api_key: &str,
    timestamp: i64,
) -> Result<PathBuf> {
    let model_name = model.replace('/', "-");
    let file_path = logs_dir.join(format!("req-{}-{}.txt", timestamp, model_name));

    let mut log_content = String::new();
    log_content.push_str("HTTP REQUEST LOG\n");
    log_content.push_str("================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", timestamp));
    log_content.push_str(&format!("Model: {}\n\n", model));
    log_content.push_str(&describe_url(url));

    log_content.push_str("Headers:\n");
    log_content.push_str("  Content-Type: application/json\n");
    log_content.push_str(&format!("  Authorization: Bearer {}\n\n", redact_api_key(api_key)));

    log_content.push_str("Request Body:\n");
    match serde_json::to_string_pretty(request) {
        Ok(json) => {
            log_content.push_str(&json);
            log_content.push('\n');
        }
        Err(e) => {
            log_content.push_str(&format!("Error serializing request: {}\n", e));
        }
    }

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write request log to {}", file_path.display()))?;

    tracing::debug!(path = %file_path.display(), "request logged");
    Ok(file_path)
}

/// Write the response matching a request logged with the same `timestamp`
pub fn log_response_to_file(
    logs_dir: &Path,
    status: u16,
    body: &str,
    model: &str,
    timestamp: i64,
) -> Result<PathBuf> {
    let model_name = model.replace('/', "-");
    let file_path = logs_dir.join(format!("resp-{}-{}.txt", timestamp, model_name));

    let mut log_content = String::new();
    log_content.push_str("HTTP RESPONSE LOG\n");
    log_content.push_str("=================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", timestamp));
    log_content.push_str(&format!("Model: {}\n", model));
    log_content.push_str(&format!("Status: {}\n\n", status));

    log_content.push_str("Response Body:\n");
    // Try to pretty-print JSON, fall back to raw text
    let pretty = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok());
    log_content.push_str(pretty.as_deref().unwrap_or(body));
    log_content.push('\n');
    log_content.push_str(&format!("\n---\nResponse Size: {} bytes\n", body.len()));

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write response log to {}", file_path.display()))?;

    tracing::debug!(path = %file_path.display(), "response logged");
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_request_log_redacts_key() {
        let dir = TempDir::new().unwrap();
        let body = serde_json::json!({"model": "llama-3.1-8b-instant", "messages": []});
        let path = log_request_to_file(
            dir.path(),
            "https://api.groq.com/openai/v1/chat/completions",
            &body,
            "meta/llama",
            "gsk_supersecretkey",
            1700000000,
        )
        .unwrap();

        assert!(path.ends_with("req-1700000000-meta-llama.txt"));
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("Host: api.groq.com"));
        assert!(content.contains("Bearer gsk_su***"));
        assert!(!content.contains("supersecretkey"));
        assert!(content.contains("\"model\": \"llama-3.1-8b-instant\""));
    }

    #[test]
    fn test_response_log_keeps_non_json_body() {
        let dir = TempDir::new().unwrap();
        let path = log_response_to_file(dir.path(), 502, "bad gateway", "m", 42).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("Status: 502"));
        assert!(content.contains("bad gateway"));
    }
}
