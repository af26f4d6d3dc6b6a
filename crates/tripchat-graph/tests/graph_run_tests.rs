use async_trait::async_trait;
use futures::StreamExt;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tripchat_graph::{
    AgentState, Checkpointer, Node, CompileOptions, CompiledGraph, FnNode, GraphError, GraphEvent, JsonFileSaver,
    MemorySaver, Passthrough, RunConfig, StateGraph, StateUpdate, END,
};
use tripchat_types::Message;

/// Replies "done" once the user says "finish", otherwise echoes
fn echo_node(state: &AgentState) -> anyhow::Result<StateUpdate> {
    let last = state.last_message().map(|m| m.content.clone()).unwrap_or_default();
    let reply = if last.contains("finish") {
        "done".to_string()
    } else {
        format!("echo: {}", last)
    };
    Ok(StateUpdate::message(Message::assistant(reply)))
}

fn route(state: &AgentState) -> String {
    match state.last_message() {
        Some(m) if m.content == "done" => "end".to_string(),
        _ => "interrupt".to_string(),
    }
}

fn echo_graph(checkpointer: Arc<dyn Checkpointer>) -> CompiledGraph {
    let mut graph = StateGraph::new();
    graph
        .add_node("agent", FnNode::new(echo_node))
        .add_node("interrupt", Passthrough)
        .add_conditional_edges("agent", route, [("end", END), ("interrupt", "interrupt")])
        .set_entry_point("agent");
    graph
        .compile(checkpointer, CompileOptions::default().with_interrupt_before(["interrupt"]))
        .unwrap()
}

fn user(text: &str) -> Option<StateUpdate> {
    Some(StateUpdate::message(Message::user(text)))
}

async fn collect(graph: &CompiledGraph, input: Option<StateUpdate>, thread: &str) -> Vec<GraphEvent> {
    graph
        .stream(input, RunConfig::new(thread))
        .map(|event| event.unwrap())
        .collect()
        .await
}

#[tokio::test]
async fn test_stream_yields_values_then_interrupt() {
    let graph = echo_graph(Arc::new(MemorySaver::new()));
    let events = collect(&graph, user("hello"), "t1").await;

    assert_eq!(events.len(), 3);
    match &events[0] {
        GraphEvent::Values(state) => assert_eq!(state.messages.len(), 1),
        other => panic!("unexpected event {:?}", other),
    }
    match &events[1] {
        GraphEvent::Values(state) => assert_eq!(state.messages[1].content, "echo: hello"),
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(
        events[2],
        GraphEvent::Interrupted {
            next: "interrupt".to_string()
        }
    );

    let checkpoint = graph.get_state("t1").await.unwrap().unwrap();
    assert_eq!(checkpoint.next.as_deref(), Some("interrupt"));
    assert_eq!(checkpoint.state.messages.len(), 2);
}

#[tokio::test]
async fn test_new_input_restarts_at_entry_and_accumulates() {
    let graph = echo_graph(Arc::new(MemorySaver::new()));
    graph.invoke(user("one"), RunConfig::new("t")).await.unwrap();
    let state = graph.invoke(user("two"), RunConfig::new("t")).await.unwrap();

    let contents: Vec<&str> = state.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "echo: one", "two", "echo: two"]);
}

#[tokio::test]
async fn test_finish_reaches_end() {
    let graph = echo_graph(Arc::new(MemorySaver::new()));
    let events = collect(&graph, user("please finish"), "t").await;

    assert_eq!(events.last(), Some(&GraphEvent::Finished));
    let checkpoint = graph.get_state("t").await.unwrap().unwrap();
    assert_eq!(checkpoint.next, None);
    assert_eq!(checkpoint.state.last_message().unwrap().content, "done");
}

#[tokio::test]
async fn test_resume_runs_pending_node() {
    let graph = echo_graph(Arc::new(MemorySaver::new()));
    graph.invoke(user("hi"), RunConfig::new("t")).await.unwrap();

    let events = collect(&graph, None, "t").await;
    // the identity node adds nothing and has no outgoing edge
    assert_eq!(events.len(), 2);
    assert_eq!(events[1], GraphEvent::Finished);
    assert_eq!(graph.get_state("t").await.unwrap().unwrap().next, None);

    let err = graph.resume(RunConfig::new("t")).await.unwrap_err();
    assert!(matches!(err, GraphError::NothingToResume(_)));
}

#[tokio::test]
async fn test_resume_unknown_thread_fails() {
    let graph = echo_graph(Arc::new(MemorySaver::new()));
    let err = graph.resume(RunConfig::new("missing")).await.unwrap_err();
    assert!(matches!(err, GraphError::NothingToResume(t) if t == "missing"));
}

#[tokio::test]
async fn test_threads_are_isolated() {
    let graph = echo_graph(Arc::new(MemorySaver::new()));
    graph.invoke(user("a"), RunConfig::new("x")).await.unwrap();
    let state = graph.invoke(user("b"), RunConfig::new("y")).await.unwrap();
    assert_eq!(state.messages.len(), 2);
}

#[tokio::test]
async fn test_recursion_limit() {
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&counter);

    let mut graph = StateGraph::new();
    graph
        .add_node(
            "loop",
            FnNode::new(move |_: &AgentState| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(StateUpdate::default())
            }),
        )
        .add_edge("loop", "loop")
        .set_entry_point("loop");
    let graph = graph
        .compile(Arc::new(MemorySaver::new()), CompileOptions::default().with_recursion_limit(5))
        .unwrap();

    let err = graph.invoke(user("go"), RunConfig::new("t")).await.unwrap_err();
    assert!(matches!(err, GraphError::RecursionLimit(5)));
    assert_eq!(counter.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_node_failure_is_reported() {
    let mut graph = StateGraph::new();
    graph
        .add_node("boom", FnNode::new(|_: &AgentState| Err(anyhow::anyhow!("exploded"))))
        .set_entry_point("boom");
    let graph = graph
        .compile(Arc::new(MemorySaver::new()), CompileOptions::default())
        .unwrap();

    let err = graph.invoke(user("go"), RunConfig::new("t")).await.unwrap_err();
    assert_eq!(err.to_string(), "node 'boom' failed: exploded");
}

#[tokio::test]
async fn test_unmapped_route() {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", Passthrough)
        .add_conditional_edges("a", |_: &AgentState| "elsewhere".to_string(), [("end", END)])
        .set_entry_point("a");
    let graph = graph
        .compile(Arc::new(MemorySaver::new()), CompileOptions::default())
        .unwrap();

    let err = graph.invoke(user("go"), RunConfig::new("t")).await.unwrap_err();
    assert!(matches!(err, GraphError::UnmappedRoute { key, .. } if key == "elsewhere"));
}

#[tokio::test]
async fn test_file_checkpoints_survive_new_graph() {
    let dir = tempfile::tempdir().unwrap();

    let first = echo_graph(Arc::new(JsonFileSaver::new(dir.path()).unwrap()));
    first.invoke(user("hello"), RunConfig::new("trip-1")).await.unwrap();

    let second = echo_graph(Arc::new(JsonFileSaver::new(dir.path()).unwrap()));
    let state = second.invoke(user("again"), RunConfig::new("trip-1")).await.unwrap();

    assert_eq!(state.messages.len(), 4);
    assert_eq!(state.messages[3].content, "echo: again");
    assert!(dir.path().join("trip-1.json").exists());
}

/// Records the thread id of every run it takes part in
#[derive(Clone, Default)]
struct ThreadRecorder {
    seen: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Node for ThreadRecorder {
    async fn run(&self, _state: &AgentState, config: &RunConfig) -> anyhow::Result<StateUpdate> {
        self.seen.lock().unwrap().push(config.thread_id.clone());
        Ok(StateUpdate::message(Message::assistant("noted")))
    }
}

#[tokio::test]
async fn test_nodes_receive_the_run_thread_id() {
    let recorder = ThreadRecorder::default();
    let mut graph = StateGraph::new();
    graph.add_node("agent", recorder.clone()).set_entry_point("agent");
    let graph = graph.compile(Arc::new(MemorySaver::new()), CompileOptions::default()).unwrap();

    graph.invoke(user("a"), RunConfig::new("thread-a")).await.unwrap();
    graph.invoke(user("b"), RunConfig::new("thread-b")).await.unwrap();

    assert_eq!(*recorder.seen.lock().unwrap(), vec!["thread-a".to_string(), "thread-b".to_string()]);
}
