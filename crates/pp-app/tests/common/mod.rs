#![allow(dead_code)]

use std::time::Duration;

use pp_app::{
    Completion, Operation, RecordingView, RemoteCompute, Request, Session, SessionConfig,
    TreeSchema, TreeSnapshot, UiEvent,
};
use serde_json::{Value, json};

/// Remote that only queues requests; tests resolve them by hand, in any order.
#[derive(Debug, Default)]
pub struct QueuedRemote {
    pub sent: Vec<Request>,
}

impl RemoteCompute for QueuedRemote {
    fn send(&mut self, request: Request) {
        self.sent.push(request);
    }
}

pub type TestSession = Session<QueuedRemote, RecordingView>;

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

pub fn config() -> SessionConfig {
    SessionConfig {
        tree: TreeSchema {
            model_field: "model".to_string(),
            identity_fields: vec!["name".to_string()],
            integrator_fields: Vec::new(),
        },
        ..SessionConfig::default()
    }
}

pub fn tree(v: Value) -> TreeSnapshot {
    match v {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

pub fn tree_event(v: Value) -> UiEvent {
    UiEvent::TreeChanged { snapshot: tree(v) }
}

pub fn schema_json() -> String {
    json!({
        "params": [
            {"name": "a", "min": -5.0, "max": 5.0, "step": 0.01, "default": 1.05},
            {"name": "tau", "min": 1.0, "max": 5.0, "step": 0.01, "default": 1.0}
        ],
        "graph_params": {
            "state_variables": [
                {"name": "V", "min": -4.0, "max": 4.0, "step": 0.008, "default": 0.0, "lo": -2.0, "hi": 4.0},
                {"name": "W", "min": -6.0, "max": 6.0, "step": 0.012, "default": 0.0, "lo": -6.0, "hi": 6.0},
                {"name": "Z", "min": -1.0, "max": 1.0, "step": 0.002, "default": 0.0, "lo": -1.0, "hi": 1.0}
            ],
            "default_sv": ["V", "W"],
            "default_mode": "0",
            "modes": ["0", "1"]
        }
    })
    .to_string()
}

pub fn plot_json(tag: &str) -> String {
    json!({ "field": tag }).to_string()
}

pub fn trajectory_json(tags: &[&str]) -> String {
    json!({
        "finite": true,
        "trajectories": tags.iter().map(|t| format!("traj-{t}")).collect::<Vec<_>>(),
        "signals": tags.iter().map(|t| format!("sig-{t}")).collect::<Vec<_>>(),
    })
    .to_string()
}

pub fn divergent_json() -> String {
    json!({ "finite": false, "trajectories": [], "signals": [] }).to_string()
}

pub fn take_requests(session: &mut TestSession) -> Vec<Request> {
    std::mem::take(&mut session.remote_mut().sent)
}

pub fn take_one(session: &mut TestSession) -> Request {
    let mut requests = take_requests(session);
    assert_eq!(requests.len(), 1, "expected exactly one request: {requests:?}");
    requests.remove(0)
}

pub fn ok(request: &Request, body: impl Into<String>) -> Completion {
    Completion::ok(request.id, body)
}

/// Session with model "A" loaded and its first plot drawn; queue and view are empty.
pub fn ready_session() -> TestSession {
    let mut session = Session::new(config(), QueuedRemote::default(), RecordingView::new());
    session.handle(tree_event(json!({"model": "A", "name": "n1"})), ms(0));

    let schema = take_one(&mut session);
    assert!(matches!(schema.operation, Operation::ModelChanged { ref model } if model == "A"));
    session.complete(ok(&schema, schema_json()));

    let fragment = take_one(&mut session);
    assert_eq!(fragment.operation, Operation::SlidersFragment);
    session.complete(ok(&fragment, "<div id='sliders'/>"));

    let params = take_one(&mut session);
    assert!(matches!(params.operation, Operation::ParametersChanged { .. }));
    session.complete(ok(&params, plot_json("initial")));

    session.view_mut().take_calls();
    session
}

/// Add one trajectory through `(x, y)` at `now` and resolve it with `tag`.
pub fn add_trajectory(session: &mut TestSession, x: f64, y: f64, now: Duration, tag: &str) {
    session.handle(UiEvent::Click { x, y }, now);
    let request = take_one(session);
    session.complete(ok(&request, trajectory_json(&[tag])));
}
