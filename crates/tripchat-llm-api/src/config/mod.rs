pub mod factory;
pub use factory::ClientFactory;

/// Backend type for LLM models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Groq,
    OpenAI,
    Llama,
}

impl BackendType {
    /// Parse backend type from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            "openai" => Some(Self::OpenAI),
            "llama" | "llamacpp" | "llama.cpp" | "llama-cpp" => Some(Self::Llama),
            _ => None,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Groq => "groq",
            Self::OpenAI => "openai",
            Self::Llama => "llama",
        }
    }

    /// Environment variable holding the API key for this backend
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::Groq => Some("GROQ_API_KEY"),
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Llama => None,
        }
    }
}

/// Default Groq API URL
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default OpenAI API URL
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Get the default URL for a given backend type
pub fn get_default_url_for_backend(backend: &BackendType) -> Option<String> {
    match backend {
        BackendType::Groq => Some(GROQ_API_URL.to_string()),
        BackendType::OpenAI => Some(OPENAI_API_URL.to_string()),
        BackendType::Llama => None, // llama.cpp has no default URL
    }
}

/// Parse a model string in the form "model@backend(api_url)", "model@backend"
/// or "model". Returns (model_name, backend, api_url).
pub fn parse_model_spec(spec: &str) -> (String, Option<BackendType>, Option<String>) {
    let Some((model, backend_part)) = spec.split_once('@') else {
        return (spec.to_string(), None, None);
    };

    match backend_part.split_once('(') {
        Some((backend_name, rest)) => {
            let url = rest.strip_suffix(')').unwrap_or(rest);
            (
                model.to_string(),
                BackendType::from_str(backend_name),
                Some(url.to_string()),
            )
        }
        None => (model.to_string(), BackendType::from_str(backend_part), None),
    }
}

/// Normalize API URL by ensuring it has the correct path for OpenAI-compatible endpoints
pub fn normalize_api_url(url: &str) -> String {
    // If URL already contains a path with "completions", use it as-is
    if url.contains("/completions") || url.contains("/chat") {
        return url.to_string();
    }

    if url.ends_with('/') {
        format!("{}v1/chat/completions", url)
    } else {
        format!("{}/v1/chat/completions", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_backend_from_str() {
        assert_eq!(BackendType::from_str("GROQ"), Some(BackendType::Groq));
        assert_eq!(BackendType::from_str("llama.cpp"), Some(BackendType::Llama));
        assert_eq!(BackendType::from_str("openai"), Some(BackendType::OpenAI));
        assert_eq!(BackendType::from_str("anthropic"), None);
    }

    #[test]
    fn test_parse_model_spec() {
        assert_eq!(
            parse_model_spec("llama-3.1-8b-instant"),
            ("llama-3.1-8b-instant".to_string(), None, None)
        );
        assert_eq!(
            parse_model_spec("gpt-4o-mini@openai"),
            ("gpt-4o-mini".to_string(), Some(BackendType::OpenAI), None)
        );
        assert_eq!(
            parse_model_spec("qwen@llama(http://localhost:8080)"),
            (
                "qwen".to_string(),
                Some(BackendType::Llama),
                Some("http://localhost:8080".to_string())
            )
        );
    }

    #[test]
    fn test_normalize_api_url() {
        assert_eq!(normalize_api_url("http://localhost:8080"), "http://localhost:8080/v1/chat/completions");
        assert_eq!(normalize_api_url("http://localhost:8080/"), "http://localhost:8080/v1/chat/completions");
        assert_eq!(normalize_api_url(GROQ_API_URL), GROQ_API_URL);
    }
}
