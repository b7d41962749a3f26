//! Request/response contract with the compute service.
//!
//! Sending is fire-and-forget: [`RemoteCompute::send`] never blocks, and the
//! reply comes back later as a [`Completion`] carrying the request's id. The
//! session uses that id to decide whether the reply is still authoritative.

use std::collections::BTreeMap;

use pp_core::{RequestId, SessionId};
use pp_schema::{GraphState, StatePoint};
use serde::Serialize;
use serde_json::Value;

/// Route prefix shared by every operation.
pub const ROUTE_PREFIX: &str = "/burst/dynamic";

/// One call to the compute service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    /// Fetch the parameter and graph schema of a model.
    ModelChanged { model: String },
    /// Fetch the renderable slider fragment for the current model.
    SlidersFragment,
    /// Recompute the vector field for a new graph configuration.
    GraphChanged { graph_state: GraphState },
    /// Recompute the vector field for new model parameters.
    ParametersChanged { params: BTreeMap<String, f64> },
    /// Integrate trajectories from the given starting points.
    Trajectories { starting_points: Vec<StatePoint> },
    /// Store new integrator settings.
    IntegratorChanged { state: Value },
    /// Persist the current configuration under a name.
    Submit { name: String },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ModelChanged { .. } => "model_changed",
            Operation::SlidersFragment => "sliders_fragment",
            Operation::GraphChanged { .. } => "graph_changed",
            Operation::ParametersChanged { .. } => "parameters_changed",
            Operation::Trajectories { .. } => "trajectories",
            Operation::IntegratorChanged { .. } => "integrator_changed",
            Operation::Submit { .. } => "submit",
        }
    }

    /// Trailing route segment, if the operation has one.
    pub fn tail(&self) -> Option<&str> {
        match self {
            Operation::ModelChanged { model } => Some(model.as_str()),
            Operation::Submit { name } => Some(name.as_str()),
            _ => None,
        }
    }

    /// `/burst/dynamic/<operation>/<session>[/<tail>]`
    pub fn route(&self, session: &SessionId) -> String {
        let mut route = format!("{ROUTE_PREFIX}/{}/{session}", self.name());
        if let Some(tail) = self.tail() {
            route.push('/');
            route.push_str(tail);
        }
        route
    }
}

/// Outgoing request: the operation scoped to a session and tagged with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub id: RequestId,
    pub session: SessionId,
    pub operation: Operation,
}

impl Request {
    pub fn route(&self) -> String {
        self.operation.route(&self.session)
    }
}

/// Transport or service failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reply to a request: the raw (usually JSON-encoded) body or a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub id: RequestId,
    pub result: Result<String, RemoteError>,
}

impl Completion {
    pub fn ok(id: RequestId, body: impl Into<String>) -> Self {
        Self {
            id,
            result: Ok(body.into()),
        }
    }

    pub fn err(id: RequestId, message: impl Into<String>) -> Self {
        Self {
            id,
            result: Err(RemoteError::new(message)),
        }
    }
}

/// Non-blocking transport to the compute service.
pub trait RemoteCompute {
    fn send(&mut self, request: Request);
}
