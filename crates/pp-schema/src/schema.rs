//! Schema and wire definitions exchanged with the compute service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A state vector keyed by state-variable name.
pub type StatePoint = BTreeMap<String, f64>;

/// A named numeric control with bounds, step and default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlSpec {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl ControlSpec {
    pub fn new(name: impl Into<String>, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            step,
            default,
        }
    }
}

/// A state variable: a slider spec plus the default sub-range shown when the
/// variable is put on an axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateVariableSpec {
    #[serde(flatten)]
    pub control: ControlSpec,
    pub lo: f64,
    pub hi: f64,
}

impl StateVariableSpec {
    pub fn name(&self) -> &str {
        &self.control.name
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.control.min, self.control.max)
    }
}

/// Graph defaults returned by the service for one model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphSchema {
    pub state_variables: Vec<StateVariableSpec>,
    /// Default (x, y) axis variables.
    pub default_sv: [String; 2],
    pub default_mode: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modes: Vec<String>,
}

impl GraphSchema {
    pub fn state_variable(&self, name: &str) -> Option<&StateVariableSpec> {
        self.state_variables.iter().find(|sv| sv.name() == name)
    }

    pub fn state_variable_names(&self) -> Vec<String> {
        self.state_variables
            .iter()
            .map(|sv| sv.name().to_string())
            .collect()
    }
}

/// Reply of `model_changed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSchema {
    pub params: Vec<ControlSpec>,
    pub graph_params: GraphSchema,
}

/// Serialized graph configuration sent with `graph_changed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphState {
    pub mode: String,
    pub svx: String,
    pub svy: String,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub state_vars: StatePoint,
}

/// Vector-field plot data. Passed through to the renderer uninterpreted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct PlotData(pub serde_json::Value);

/// One trajectory or signal curve. Passed through to the renderer uninterpreted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Curve(pub serde_json::Value);

/// Reply of `trajectories`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrajectoryReply {
    /// `false` when the integration diverged; the curves must not be used.
    pub finite: bool,
    #[serde(default)]
    pub trajectories: Vec<Curve>,
    #[serde(default)]
    pub signals: Vec<Curve>,
}
