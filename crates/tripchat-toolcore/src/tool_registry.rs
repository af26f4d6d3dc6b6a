use std::collections::HashMap;
use std::sync::Arc;

use crate::tool::Tool;
use crate::tool_context::ToolContext;
use tripchat_types::{ToolParameters, ToolResult};

/// Registry for managing and discovering tools
#[derive(Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    categories: HashMap<String, Vec<String>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.tools.len())
            .field("categories", &self.categories)
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            categories: HashMap::new(),
        }
    }

    /// Register a new tool; a tool with the same name is replaced
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    /// Register a tool with categories
    pub fn register_with_categories<T: Tool + 'static>(&mut self, tool: T, categories: Vec<String>) {
        let name = tool.name().to_string();
        self.register(tool);

        for category in categories {
            let names = self.categories.entry(category).or_default();
            if !names.contains(&name) {
                names.push(name.clone());
            }
        }
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Get all tools, sorted by name
    pub fn get_all_tools(&self) -> Vec<Arc<dyn Tool>> {
        let mut tools: Vec<_> = self.tools.iter().collect();
        tools.sort_by_key(|(name, _)| name.as_str());
        tools.into_iter().map(|(_, tool)| tool.clone()).collect()
    }

    /// Get tools by category
    pub fn get_tools_by_category(&self, category: &str) -> Vec<Arc<dyn Tool>> {
        match self.categories.get(category) {
            Some(tool_names) => tool_names
                .iter()
                .filter_map(|name| self.tools.get(name))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get tool names, sorted
    pub fn get_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Execute a tool by name
    pub async fn execute_tool(&self, name: &str, params: ToolParameters, context: &ToolContext) -> ToolResult {
        match self.get_tool(name) {
            Some(tool) => {
                tracing::debug!(tool = name, thread_id = %context.thread_id, "executing tool");
                tool.execute(params, context).await
            }
            None => ToolResult::error(format!(
                "Tool '{}' not found. Available tools: {}",
                name,
                self.get_tool_names().join(", ")
            )),
        }
    }

    /// Get categories
    pub fn get_categories(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
