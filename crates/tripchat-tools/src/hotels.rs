use async_trait::async_trait;
use std::collections::HashMap;

use tripchat_toolcore::{param, ParameterDefinition, Tool, ToolContext, ToolParameters, ToolResult};

/// Mock hotel search with one luxury, one mid-range and one economy option
pub struct SearchHotelsTool;

pub fn hotel_options(destination: &str) -> String {
    format!(
        "I found three great hotels in {}: 'The Grand Plaza' (luxury), 'City Center Inn' (mid-range), and 'Budget Stay' (economy). What's your preference?",
        destination
    )
}

#[async_trait]
impl Tool for SearchHotelsTool {
    fn name(&self) -> &str {
        "search_hotels"
    }

    fn description(&self) -> &str {
        "Mock tool to search for hotels in a given destination."
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([param!("destination", "string", "Destination city", required)])
    }

    async fn execute(&self, params: ToolParameters, _context: &ToolContext) -> ToolResult {
        match params.get_required::<String>("destination") {
            Ok(destination) => {
                tracing::info!("Searching hotels for {}", destination);
                ToolResult::success(hotel_options(&destination))
            }
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_hotel_options_text() {
        let params = ToolParameters::from_json(r#"{"destination":"Kyoto"}"#).unwrap();
        let result = SearchHotelsTool.execute(params, &ToolContext::default()).await;
        assert_eq!(
            result.content,
            "I found three great hotels in Kyoto: 'The Grand Plaza' (luxury), 'City Center Inn' (mid-range), and 'Budget Stay' (economy). What's your preference?"
        );
    }

    #[tokio::test]
    async fn test_missing_destination() {
        let result = SearchHotelsTool
            .execute(ToolParameters::new(), &ToolContext::default())
            .await;
        assert!(!result.success);
    }
}
