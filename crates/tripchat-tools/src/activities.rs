use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use tripchat_toolcore::{param, ParameterDefinition, Tool, ToolContext, ToolParameters, ToolResult};
use tripchat_types::MAX_SEARCH_RESULTS;

/// Longest snippet passed back to the model per hit
const SNIPPET_CHARS: usize = 300;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search API error ({status}): {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

/// Web search backend used by `search_activities`
#[async_trait]
pub trait ActivitySearch: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;
}

/// Fixed suggestions for running without a search API key
pub struct OfflineActivities;

#[async_trait]
impl ActivitySearch for OfflineActivities {
    fn name(&self) -> &str {
        "offline"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let place = query.trim();
        if place.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let hits = [
            (
                format!("Guided walking tour of {}", place),
                format!("Explore the historic centre of {} with a local guide.", place),
            ),
            (
                format!("{} food market tasting", place),
                format!("Sample regional specialities at the best-known market in {}.", place),
            ),
            (
                format!("Sunset viewpoint in {}", place),
                format!("Finish the day with a panoramic view over {}.", place),
            ),
        ];

        Ok(hits
            .into_iter()
            .take(max_results)
            .map(|(title, content)| SearchHit {
                title,
                url: String::new(),
                content,
            })
            .collect())
    }
}

pub fn format_hits(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No activities found for {}.", query);
    }

    let mut out = format!("Top activities for {}:", query);
    for (i, hit) in hits.iter().enumerate() {
        let snippet: String = hit.content.chars().take(SNIPPET_CHARS).collect();
        if hit.url.is_empty() {
            out.push_str(&format!("\n{}. {}: {}", i + 1, hit.title, snippet));
        } else {
            out.push_str(&format!("\n{}. {} ({}): {}", i + 1, hit.title, hit.url, snippet));
        }
    }
    out
}

pub struct SearchActivitiesTool {
    backend: Arc<dyn ActivitySearch>,
    max_results: usize,
}

impl SearchActivitiesTool {
    pub fn new(backend: Arc<dyn ActivitySearch>) -> Self {
        Self {
            backend,
            max_results: MAX_SEARCH_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

#[async_trait]
impl Tool for SearchActivitiesTool {
    fn name(&self) -> &str {
        "search_activities"
    }

    fn description(&self) -> &str {
        "Searches for activities and things to do in a given location. Input should be a city name."
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([param!("query", "string", "City name to search activities for", required)])
    }

    async fn execute(&self, params: ToolParameters, _context: &ToolContext) -> ToolResult {
        let query = match params.get_required::<String>("query") {
            Ok(query) => query,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        tracing::info!("Searching activities for {} via {}", query, self.backend.name());
        match self.backend.search(&query, self.max_results).await {
            Ok(hits) => ToolResult::success(format_hits(&query, &hits)),
            Err(e) => {
                tracing::warn!("Activity search failed: {}", e);
                ToolResult::error(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_offline_respects_max_results() {
        let hits = OfflineActivities.search("Lisbon", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].title.contains("Lisbon"));
    }

    #[tokio::test]
    async fn test_offline_rejects_blank_query() {
        let err = OfflineActivities.search("  ", 3).await.unwrap_err();
        assert!(matches!(err, SearchError::EmptyQuery));
    }

    #[test]
    fn test_format_hits() {
        let hits = vec![
            SearchHit {
                title: "Tram 28".to_string(),
                url: "https://example.com/tram".to_string(),
                content: "Historic tram ride".to_string(),
            },
            SearchHit {
                title: "Fado night".to_string(),
                url: String::new(),
                content: "Live music".to_string(),
            },
        ];
        assert_eq!(
            format_hits("Lisbon", &hits),
            "Top activities for Lisbon:\n1. Tram 28 (https://example.com/tram): Historic tram ride\n2. Fado night: Live music"
        );
        assert_eq!(format_hits("Lisbon", &[]), "No activities found for Lisbon.");
    }

    #[tokio::test]
    async fn test_tool_uses_backend() {
        let tool = SearchActivitiesTool::new(Arc::new(OfflineActivities)).with_max_results(1);
        let params = ToolParameters::from_json(r#"{"query":"Porto"}"#).unwrap();
        let result = tool.execute(params, &ToolContext::default()).await;
        assert!(result.success);
        assert_eq!(result.content.lines().count(), 2);
    }
}
