use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::checkpoint::Checkpointer;
use crate::compiled::{CompileOptions, CompiledGraph, GraphInner};
use crate::error::GraphError;
use crate::node::{Node, Router};
use crate::state::AgentState;

/// Terminal pseudo-node
pub const END: &str = "__end__";

pub(crate) struct Branch {
    pub(crate) router: Router,
    pub(crate) mapping: HashMap<String, String>,
}

/// Graph under construction.
///
/// Builder methods chain; problems such as duplicate node names are
/// collected and reported by [`StateGraph::compile`].
#[derive(Default)]
pub struct StateGraph {
    nodes: HashMap<String, Arc<dyn Node>>,
    edges: HashMap<String, String>,
    branches: HashMap<String, Branch>,
    entry: Option<String>,
    errors: Vec<GraphError>,
}

impl StateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: impl Into<String>, node: impl Node + 'static) -> &mut Self {
        let name = name.into();
        if name == END {
            self.errors.push(GraphError::ReservedName(name));
        } else if self.nodes.contains_key(&name) {
            self.errors.push(GraphError::DuplicateNode(name));
        } else {
            self.nodes.insert(name, Arc::new(node));
        }
        self
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        let from = from.into();
        if self.edges.contains_key(&from) || self.branches.contains_key(&from) {
            self.errors.push(GraphError::ConflictingEdges(from));
        } else {
            self.edges.insert(from, to.into());
        }
        self
    }

    /// Route from `from` by calling `router` on the state and looking its
    /// result up in `mapping` (route key -> node name or `END`).
    pub fn add_conditional_edges<R, I, K, V>(&mut self, from: impl Into<String>, router: R, mapping: I) -> &mut Self
    where
        R: Fn(&AgentState) -> String + Send + Sync + 'static,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let from = from.into();
        if self.edges.contains_key(&from) || self.branches.contains_key(&from) {
            self.errors.push(GraphError::ConflictingEdges(from));
            return self;
        }

        let mapping = mapping.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.branches.insert(
            from,
            Branch {
                router: Arc::new(router),
                mapping,
            },
        );
        self
    }

    pub fn set_entry_point(&mut self, name: impl Into<String>) -> &mut Self {
        self.entry = Some(name.into());
        self
    }

    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.keys().cloned().collect();
        names.sort();
        names
    }

    fn check_target(&self, node: &str, referenced_by: String) -> Result<(), GraphError> {
        if node == END || self.nodes.contains_key(node) {
            Ok(())
        } else {
            Err(GraphError::UnknownNode {
                node: node.to_string(),
                referenced_by,
            })
        }
    }

    fn check_source(&self, node: &str, referenced_by: String) -> Result<(), GraphError> {
        if self.nodes.contains_key(node) {
            Ok(())
        } else {
            Err(GraphError::UnknownNode {
                node: node.to_string(),
                referenced_by,
            })
        }
    }

    fn validate(&self, options: &CompileOptions) -> Result<String, GraphError> {
        let entry = self.entry.clone().ok_or(GraphError::MissingEntryPoint)?;
        self.check_source(&entry, "the entry point".to_string())?;

        for (from, to) in &self.edges {
            self.check_source(from, format!("edge {} -> {}", from, to))?;
            self.check_target(to, format!("edge {} -> {}", from, to))?;
        }

        for (from, branch) in &self.branches {
            self.check_source(from, format!("conditional edges from {}", from))?;
            for (key, to) in &branch.mapping {
                self.check_target(to, format!("route '{}' from {}", key, from))?;
            }
        }

        for name in &options.interrupt_before {
            self.check_source(name, "interrupt_before".to_string())?;
        }

        Ok(entry)
    }

    pub fn compile(mut self, checkpointer: Arc<dyn Checkpointer>, options: CompileOptions) -> Result<CompiledGraph, GraphError> {
        if !self.errors.is_empty() {
            return Err(self.errors.remove(0));
        }
        let entry = self.validate(&options)?;

        tracing::debug!(
            "Compiled graph with nodes {:?}, entry '{}', interrupt_before {:?}",
            self.node_names(),
            entry,
            options.interrupt_before
        );

        let interrupt_before: HashSet<String> = options.interrupt_before.into_iter().collect();
        Ok(CompiledGraph::from_inner(GraphInner {
            nodes: self.nodes,
            edges: self.edges,
            branches: self.branches,
            entry,
            interrupt_before,
            recursion_limit: options.recursion_limit,
            checkpointer,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::MemorySaver;
    use crate::node::Passthrough;

    fn compile(graph: StateGraph, interrupt_before: &[&str]) -> Result<CompiledGraph, GraphError> {
        let options = CompileOptions::default().with_interrupt_before(interrupt_before.iter().copied());
        graph.compile(Arc::new(MemorySaver::new()), options)
    }

    #[test]
    fn test_duplicate_and_reserved_names() {
        let mut graph = StateGraph::new();
        graph.add_node("a", Passthrough).add_node("a", Passthrough).set_entry_point("a");
        assert!(matches!(compile(graph, &[]), Err(GraphError::DuplicateNode(n)) if n == "a"));

        let mut graph = StateGraph::new();
        graph.add_node(END, Passthrough);
        assert!(matches!(compile(graph, &[]), Err(GraphError::ReservedName(_))));
    }

    #[test]
    fn test_missing_entry_point() {
        let mut graph = StateGraph::new();
        graph.add_node("a", Passthrough);
        assert!(matches!(compile(graph, &[]), Err(GraphError::MissingEntryPoint)));

        let mut graph = StateGraph::new();
        graph.add_node("a", Passthrough).set_entry_point("b");
        assert!(matches!(compile(graph, &[]), Err(GraphError::UnknownNode { node, .. }) if node == "b"));
    }

    #[test]
    fn test_unknown_edge_targets() {
        let mut graph = StateGraph::new();
        graph.add_node("a", Passthrough).add_edge("a", "missing").set_entry_point("a");
        assert!(matches!(compile(graph, &[]), Err(GraphError::UnknownNode { node, .. }) if node == "missing"));

        let mut graph = StateGraph::new();
        graph
            .add_node("a", Passthrough)
            .add_conditional_edges("a", |_: &AgentState| "x".to_string(), [("x", "nowhere")])
            .set_entry_point("a");
        assert!(matches!(compile(graph, &[]), Err(GraphError::UnknownNode { node, .. }) if node == "nowhere"));
    }

    #[test]
    fn test_unknown_interrupt_node() {
        let mut graph = StateGraph::new();
        graph.add_node("a", Passthrough).add_edge("a", END).set_entry_point("a");
        assert!(matches!(compile(graph, &["b"]), Err(GraphError::UnknownNode { node, .. }) if node == "b"));
    }

    #[test]
    fn test_conflicting_edges() {
        let mut graph = StateGraph::new();
        graph
            .add_node("a", Passthrough)
            .add_edge("a", END)
            .add_conditional_edges("a", |_: &AgentState| "end".to_string(), [("end", END)])
            .set_entry_point("a");
        assert!(matches!(compile(graph, &[]), Err(GraphError::ConflictingEdges(n)) if n == "a"));
    }

    #[test]
    fn test_valid_graph_compiles() {
        let mut graph = StateGraph::new();
        graph
            .add_node("a", Passthrough)
            .add_node("b", Passthrough)
            .add_conditional_edges("a", |_: &AgentState| "next".to_string(), [("next", "b"), ("end", END)])
            .set_entry_point("a");
        assert!(compile(graph, &["b"]).is_ok());
    }
}
