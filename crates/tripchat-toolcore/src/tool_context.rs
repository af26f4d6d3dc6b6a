/// Tool execution context
///
/// Carries the conversation thread the call belongs to.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    pub thread_id: String,
}

impl ToolContext {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
        }
    }
}
