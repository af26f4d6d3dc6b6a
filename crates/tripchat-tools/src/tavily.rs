use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::activities::{ActivitySearch, SearchError, SearchHit};

pub const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// Tavily web search client
pub struct TavilySearch {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl TavilySearch {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, TAVILY_SEARCH_URL.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ActivitySearch for TavilySearch {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results,
            search_depth: "basic",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TavilyResponse = response.json().await?;
        tracing::debug!("Tavily returned {} results for '{}'", parsed.results.len(), query);

        Ok(parsed.results.into_iter().take(max_results).collect())
    }
}
