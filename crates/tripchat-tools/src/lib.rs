//! Travel search tools exposed to the planning agent.
//!
//! Flight and hotel search are deterministic mocks. Activity search goes to
//! Tavily when an API key is configured and to a small offline catalogue
//! otherwise.

pub mod activities;
pub mod flights;
pub mod hotels;
pub mod tavily;

use std::sync::Arc;

use tripchat_toolcore::ToolRegistry;

pub use activities::{ActivitySearch, OfflineActivities, SearchActivitiesTool, SearchError, SearchHit};
pub use flights::SearchFlightsTool;
pub use hotels::SearchHotelsTool;
pub use tavily::{TavilySearch, TAVILY_SEARCH_URL};

pub const TRAVEL_CATEGORY: &str = "travel";

/// Pick the activity search backend: Tavily with a key, offline catalogue without
pub fn activity_search_backend(tavily_api_key: Option<String>) -> Arc<dyn ActivitySearch> {
    match tavily_api_key.filter(|key| !key.trim().is_empty()) {
        Some(key) => Arc::new(TavilySearch::new(key)),
        None => {
            tracing::info!("TAVILY_API_KEY not set, using offline activity suggestions");
            Arc::new(OfflineActivities)
        }
    }
}

/// Registry holding the three travel tools
pub fn travel_tool_registry(activity_search: Arc<dyn ActivitySearch>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    let category = || vec![TRAVEL_CATEGORY.to_string()];

    registry.register_with_categories(SearchFlightsTool, category());
    registry.register_with_categories(SearchHotelsTool, category());
    registry.register_with_categories(SearchActivitiesTool::new(activity_search), category());

    registry
}
