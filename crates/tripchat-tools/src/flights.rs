use async_trait::async_trait;
use std::collections::HashMap;

use tripchat_toolcore::{param, ParameterDefinition, Tool, ToolContext, ToolParameters, ToolResult};

/// Mock flight search: always offers a direct flight above budget and a
/// layover flight below it.
pub struct SearchFlightsTool;

/// Accept the budget as an integer, a float or a numeric string.
/// Models are not consistent about argument types.
pub(crate) fn parse_budget(params: &ToolParameters) -> Result<i64, String> {
    let value = params
        .data
        .get("budget")
        .ok_or_else(|| "Required parameter 'budget' missing".to_string())?;

    let parsed = match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
                .collect();
            cleaned
                .parse::<i64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    };

    parsed.ok_or_else(|| format!("Failed to parse parameter 'budget': {} is not a number", value))
}

pub fn flight_options(destination: &str, budget: i64) -> String {
    format!(
        "I found two flights to {}. A direct flight for ${} and one with a layover for ${}. Which do you prefer?",
        destination,
        budget.saturating_add(100),
        budget.saturating_sub(50)
    )
}

#[async_trait]
impl Tool for SearchFlightsTool {
    fn name(&self) -> &str {
        "search_flights"
    }

    fn description(&self) -> &str {
        "Mock tool to search for flights given a destination and a budget."
    }

    fn parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::from([
            param!("destination", "string", "Destination city", required),
            param!("budget", "integer", "Total flight budget in US dollars", required),
        ])
    }

    async fn execute(&self, params: ToolParameters, _context: &ToolContext) -> ToolResult {
        let destination = match params.get_required::<String>("destination") {
            Ok(destination) => destination,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let budget = match parse_budget(&params) {
            Ok(budget) => budget,
            Err(e) => return ToolResult::error(e),
        };

        tracing::info!("Searching flights for {} with budget {}", destination, budget);
        ToolResult::success(flight_options(&destination, budget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(json: &str) -> ToolParameters {
        ToolParameters::from_json(json).unwrap()
    }

    #[tokio::test]
    async fn test_flight_options_text() {
        let result = SearchFlightsTool
            .execute(params(r#"{"destination":"Paris","budget":1000}"#), &ToolContext::default())
            .await;
        assert!(result.success);
        assert_eq!(
            result.content,
            "I found two flights to Paris. A direct flight for $1100 and one with a layover for $950. Which do you prefer?"
        );
    }

    #[tokio::test]
    async fn test_budget_as_string_or_float() {
        let context = ToolContext::default();
        let from_string = SearchFlightsTool
            .execute(params(r#"{"destination":"Rome","budget":"$1,500"}"#), &context)
            .await;
        assert!(from_string.content.contains("$1600"));

        let from_float = SearchFlightsTool
            .execute(params(r#"{"destination":"Rome","budget":700.0}"#), &context)
            .await;
        assert!(from_float.content.contains("$650"));
    }

    #[tokio::test]
    async fn test_missing_or_invalid_parameters() {
        let context = ToolContext::default();
        let missing = SearchFlightsTool.execute(params(r#"{"budget":100}"#), &context).await;
        assert!(!missing.success);
        assert!(missing.error.unwrap().contains("destination"));

        let invalid = SearchFlightsTool
            .execute(params(r#"{"destination":"Oslo","budget":"cheap"}"#), &context)
            .await;
        assert!(!invalid.success);
        assert!(invalid.error.unwrap().contains("budget"));
    }

    #[test]
    fn test_budget_arithmetic_saturates() {
        let text = flight_options("Nowhere", i64::MAX);
        assert!(text.contains(&format!("${}", i64::MAX)));
        let text = flight_options("Nowhere", i64::MIN);
        assert!(text.contains(&format!("${}", i64::MIN)));
    }

    #[test]
    fn test_negative_budget_is_kept() {
        assert!(flight_options("Lima", -10).contains("$90 and one with a layover for $-60"));
    }
}
