use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::client::{groq::GroqLlmClient, LlmClient};
use crate::config::{get_default_url_for_backend, normalize_api_url, BackendType};

/// Client factory for creating LLM clients
pub struct ClientFactory;

impl ClientFactory {
    /// Create an LLM client based on the specified backend type
    ///
    /// # Arguments
    /// * `backend` - The backend type to use (Groq, OpenAI, Llama)
    /// * `api_key` - API key; falls back to the backend's environment variable
    /// * `model` - Model name to use
    /// * `api_url` - Optional custom API URL (uses the backend default if None)
    pub fn create(
        backend: BackendType,
        api_key: Option<String>,
        model: String,
        api_url: Option<String>,
    ) -> Result<Arc<dyn LlmClient>> {
        Ok(Arc::new(Self::build(backend, api_key, model, api_url)?))
    }

    /// Like [`ClientFactory::create`], also writing request/response logs into `log_dir`
    pub fn create_with_request_logs(
        backend: BackendType,
        api_key: Option<String>,
        model: String,
        api_url: Option<String>,
        log_dir: PathBuf,
    ) -> Result<Arc<dyn LlmClient>> {
        let client = Self::build(backend, api_key, model, api_url)?.with_request_log_dir(log_dir);
        Ok(Arc::new(client))
    }

    fn build(
        backend: BackendType,
        api_key: Option<String>,
        model: String,
        api_url: Option<String>,
    ) -> Result<GroqLlmClient> {
        let url = match api_url {
            Some(url) => normalize_api_url(&url),
            None => get_default_url_for_backend(&backend).ok_or_else(|| {
                anyhow::anyhow!("{} backend requires an API URL", backend.as_str())
            })?,
        };

        let key = api_key
            .or_else(|| backend.api_key_env().and_then(|var| env::var(var).ok()))
            .unwrap_or_default();

        if key.is_empty() && backend != BackendType::Llama {
            return Err(anyhow::anyhow!(
                "No API key for the {} backend (set {})",
                backend.as_str(),
                backend.api_key_env().unwrap_or("an API key")
            ));
        }

        tracing::info!(backend = backend.as_str(), model = %model, url = %url, "LLM client configured");

        // Every supported backend speaks the OpenAI chat completions protocol
        Ok(GroqLlmClient::new(key, model, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llama_requires_url() {
        let result = ClientFactory::create(BackendType::Llama, None, "local".to_string(), None);
        assert!(result.is_err());

        let client = ClientFactory::create(
            BackendType::Llama,
            None,
            "local".to_string(),
            Some("http://localhost:8080".to_string()),
        )
        .unwrap();
        assert_eq!(client.model_name(), "local");
    }

    #[test]
    fn test_explicit_key_is_used() {
        let client = ClientFactory::create(
            BackendType::Groq,
            Some("gsk_test".to_string()),
            "llama-3.1-8b-instant".to_string(),
            None,
        )
        .unwrap();
        assert_eq!(client.model_name(), "llama-3.1-8b-instant");
    }
}
