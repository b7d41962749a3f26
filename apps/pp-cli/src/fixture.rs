//! Canned compute service used by `replay`.

use std::collections::{BTreeMap, HashMap};

use pp_app::{ComputeBackend, Operation, RemoteError};
use pp_core::SessionId;
use pp_schema::{Curve, ModelSchema, StatePoint, TrajectoryReply};
use serde::Deserialize;
use serde_json::json;

/// Models the fixture can serve, plus a crude divergence rule for trajectories.
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub models: BTreeMap<String, ModelSchema>,
    /// Any starting coordinate with a larger magnitude yields a non-finite trajectory.
    #[serde(default)]
    pub diverge_above: Option<f64>,
}

/// Per-session state the real service keeps server-side.
#[derive(Debug, Default)]
struct SessionState {
    model: Option<String>,
    integrator: serde_json::Value,
}

#[derive(Debug)]
pub struct FixtureBackend {
    fixture: Fixture,
    sessions: HashMap<SessionId, SessionState>,
}

impl FixtureBackend {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture,
            sessions: HashMap::new(),
        }
    }

    fn current_model(&self, state: &SessionState) -> Result<&ModelSchema, RemoteError> {
        state
            .model
            .as_ref()
            .and_then(|m| self.fixture.models.get(m))
            .ok_or_else(|| RemoteError::new("no model selected for this session"))
    }

    fn diverges(&self, start: &StatePoint) -> bool {
        self.fixture
            .diverge_above
            .is_some_and(|limit| start.values().any(|v| v.abs() > limit))
    }

    fn trajectories(&self, starts: &[StatePoint], integrator: &serde_json::Value) -> TrajectoryReply {
        if starts.iter().any(|s| self.diverges(s)) {
            return TrajectoryReply {
                finite: false,
                trajectories: Vec::new(),
                signals: Vec::new(),
            };
        }
        TrajectoryReply {
            finite: true,
            trajectories: starts
                .iter()
                .map(|s| Curve(json!({ "start": s, "integrator": integrator })))
                .collect(),
            signals: starts.iter().map(|s| Curve(json!({ "signal_from": s }))).collect(),
        }
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, RemoteError> {
    serde_json::to_string(value).map_err(|e| RemoteError::new(e.to_string()))
}

impl ComputeBackend for FixtureBackend {
    fn call(&mut self, session: &SessionId, operation: &Operation) -> Result<String, RemoteError> {
        let mut state = self.sessions.remove(session).unwrap_or_default();
        let result = match operation {
            Operation::ModelChanged { model } => match self.fixture.models.get(model) {
                Some(schema) => {
                    state.model = Some(model.clone());
                    encode(schema)
                }
                None => Err(RemoteError::new(format!("unknown model '{model}'"))),
            },
            Operation::SlidersFragment => self.current_model(&state).map(|schema| {
                let sliders: Vec<String> = schema
                    .params
                    .iter()
                    .map(|p| {
                        format!(
                            "<input name=\"{}\" min=\"{}\" max=\"{}\" step=\"{}\" value=\"{}\"/>",
                            p.name, p.min, p.max, p.step, p.default
                        )
                    })
                    .collect();
                format!("<div class=\"sliders\">{}</div>", sliders.concat())
            }),
            Operation::GraphChanged { graph_state } => {
                encode(&json!({ "model": state.model, "graph": graph_state }))
            }
            Operation::ParametersChanged { params } => {
                encode(&json!({ "model": state.model, "params": params }))
            }
            Operation::Trajectories { starting_points } => {
                encode(&self.trajectories(starting_points, &state.integrator))
            }
            Operation::IntegratorChanged { state: integrator } => {
                state.integrator = integrator.clone();
                Ok(String::new())
            }
            Operation::Submit { name } => {
                tracing::info!(%name, model = ?state.model, "fixture stored configuration");
                Ok(String::new())
            }
        };
        self.sessions.insert(*session, state);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Fixture {
        serde_yaml::from_str(
            r#"
diverge_above: 10.0
models:
  linear:
    params:
      - { name: a, min: -1.0, max: 1.0, step: 0.01, default: 0.5 }
    graph_params:
      state_variables:
        - { name: x, min: -20.0, max: 20.0, step: 0.04, default: 0.0, lo: -5.0, hi: 5.0 }
        - { name: y, min: -20.0, max: 20.0, step: 0.04, default: 0.0, lo: -5.0, hi: 5.0 }
      default_sv: [x, y]
      default_mode: "0"
      modes: []
"#,
        )
        .unwrap()
    }

    #[test]
    fn fragment_requires_model_selection() {
        let mut backend = FixtureBackend::new(fixture());
        let session = SessionId::new_random();
        assert!(backend.call(&session, &Operation::SlidersFragment).is_err());

        backend
            .call(
                &session,
                &Operation::ModelChanged {
                    model: "linear".to_string(),
                },
            )
            .unwrap();
        let fragment = backend.call(&session, &Operation::SlidersFragment).unwrap();
        assert!(fragment.contains("name=\"a\""));
    }

    #[test]
    fn far_starts_diverge() {
        let mut backend = FixtureBackend::new(fixture());
        let session = SessionId::new_random();
        let start: StatePoint = [("x".to_string(), 50.0), ("y".to_string(), 0.0)].into();
        let body = backend
            .call(
                &session,
                &Operation::Trajectories {
                    starting_points: vec![start],
                },
            )
            .unwrap();
        let reply: TrajectoryReply = serde_json::from_str(&body).unwrap();
        assert!(!reply.finite);
    }
}
