//! Graph configuration: the x/y axis pair, the display mode and the sliders
//! for the state variables that are not on an axis.
//!
//! An axis variable's value comes from its range, so its slider is kept
//! disabled. Selecting for one axis the variable already shown on the other
//! swaps the two axes instead of collapsing the plot.

use pp_schema::{GraphSchema, GraphState, StatePoint, validate_graph_schema};
use serde::{Deserialize, Serialize};

use crate::control_group::{ControlChange, ControlGroup};
use crate::error::{ControlError, ControlResult};
use crate::range_selector::{AxisValue, RangeSelector};

/// Plot axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphConfiguration {
    x: RangeSelector,
    y: RangeSelector,
    mode: String,
    default_mode: String,
    modes: Vec<String>,
    state_vars: ControlGroup,
    names: Vec<String>,
}

impl GraphConfiguration {
    pub fn new(schema: &GraphSchema) -> ControlResult<Self> {
        validate_graph_schema(schema)?;
        let specs: Vec<_> = schema
            .state_variables
            .iter()
            .map(|sv| sv.control.clone())
            .collect();
        let mut graph = Self {
            x: RangeSelector::new(&schema.state_variables, &schema.default_sv[0])?,
            y: RangeSelector::new(&schema.state_variables, &schema.default_sv[1])?,
            mode: schema.default_mode.clone(),
            default_mode: schema.default_mode.clone(),
            modes: schema.modes.clone(),
            state_vars: ControlGroup::new(&specs)?,
            names: schema.state_variable_names(),
        };
        graph.sync_axis_sliders();
        Ok(graph)
    }

    fn selector(&self, axis: Axis) -> &RangeSelector {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn selector_mut(&mut self, axis: Axis) -> &mut RangeSelector {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    pub fn axis(&self, axis: Axis) -> AxisValue {
        self.selector(axis).value()
    }

    pub fn axis_step(&self, axis: Axis) -> f64 {
        self.selector(axis).step()
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Names of all state variables, in schema order.
    pub fn variable_names(&self) -> &[String] {
        &self.names
    }

    pub fn state_variables(&self) -> &ControlGroup {
        &self.state_vars
    }

    /// Put `variable` on `axis`. If the other axis shows it, that axis takes
    /// over the variable previously shown on `axis`.
    pub fn select_variable(&mut self, axis: Axis, variable: &str) -> ControlResult<AxisValue> {
        let previous = self.selector(axis).variable().to_string();
        if previous != variable && self.selector(axis.other()).variable() == variable {
            self.selector_mut(axis.other()).select_variable(&previous)?;
        }
        let value = self.selector_mut(axis).select_variable(variable)?;
        self.sync_axis_sliders();
        Ok(value)
    }

    pub fn set_range(&mut self, axis: Axis, range: [f64; 2]) -> ControlResult<AxisValue> {
        self.selector_mut(axis).set_range(range)
    }

    pub fn set_mode(&mut self, mode: &str) -> ControlResult<()> {
        if !self.modes.is_empty() && !self.modes.iter().any(|m| m == mode) {
            return Err(ControlError::UnknownMode {
                mode: mode.to_string(),
            });
        }
        self.mode = mode.to_string();
        Ok(())
    }

    /// User drag of a state-variable slider.
    pub fn set_state_variable(&mut self, name: &str, value: f64) -> ControlResult<ControlChange> {
        self.state_vars.set(name, value)
    }

    pub fn set_state_variable_text(&mut self, name: &str, text: &str) -> ControlResult<ControlChange> {
        self.state_vars.set_text(name, text)
    }

    pub fn reset_state_variables(&mut self) -> Vec<ControlChange> {
        self.state_vars.reset()
    }

    /// Restore default mode and both default axes.
    pub fn reset_axes(&mut self) -> ControlResult<()> {
        self.mode = self.default_mode.clone();
        self.x.reset()?;
        self.y.reset()?;
        self.sync_axis_sliders();
        Ok(())
    }

    /// Disable the sliders of both axis variables, enable the rest.
    pub fn sync_axis_sliders(&mut self) {
        let (x, y) = (self.x.variable().to_string(), self.y.variable().to_string());
        self.state_vars.hide(&[x.as_str(), y.as_str()]);
    }

    /// Serialize the composite for `graph_changed`.
    pub fn graph_state(&self) -> GraphState {
        let x = self.x.value();
        let y = self.y.value();
        GraphState {
            mode: self.mode.clone(),
            svx: x.variable,
            svy: y.variable,
            x_range: x.range,
            y_range: y.range,
            state_vars: self.state_vars.values(),
        }
    }

    /// Starting state for a trajectory through plot point `(x, y)`: slider values
    /// with the axis variables overridden.
    pub fn start_point(&self, x: f64, y: f64) -> StatePoint {
        let mut point = self.state_vars.values();
        point.insert(self.x.variable().to_string(), x);
        point.insert(self.y.variable().to_string(), y);
        point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_schema::{ControlSpec, StateVariableSpec};

    fn sv(name: &str, min: f64, max: f64) -> StateVariableSpec {
        StateVariableSpec {
            control: ControlSpec::new(name, min, max, 0.1, 0.0),
            lo: min / 2.0,
            hi: max / 2.0,
        }
    }

    fn schema() -> GraphSchema {
        GraphSchema {
            state_variables: vec![sv("V", -4.0, 4.0), sv("W", -6.0, 6.0), sv("Z", -1.0, 1.0)],
            default_sv: ["V".to_string(), "W".to_string()],
            default_mode: "0".to_string(),
            modes: vec!["0".to_string(), "1".to_string()],
        }
    }

    #[test]
    fn axis_sliders_start_disabled() {
        let g = GraphConfiguration::new(&schema()).unwrap();
        let sliders = g.state_variables();
        assert!(!sliders.is_enabled("V").unwrap());
        assert!(!sliders.is_enabled("W").unwrap());
        assert!(sliders.is_enabled("Z").unwrap());
    }

    #[test]
    fn selecting_axis_moves_disabled_slider() {
        let mut g = GraphConfiguration::new(&schema()).unwrap();
        g.select_variable(Axis::Y, "Z").unwrap();
        let sliders = g.state_variables();
        assert!(sliders.is_enabled("W").unwrap());
        assert!(!sliders.is_enabled("Z").unwrap());
        assert_eq!(g.axis(Axis::Y).range, [-0.5, 0.5]);
        assert!((g.axis_step(Axis::Y) - 0.002).abs() < 1e-12);
    }

    #[test]
    fn selecting_other_axis_variable_swaps() {
        let mut g = GraphConfiguration::new(&schema()).unwrap();
        g.select_variable(Axis::X, "W").unwrap();
        assert_eq!(g.axis(Axis::X).variable, "W");
        assert_eq!(g.axis(Axis::Y).variable, "V");
        assert_eq!(g.axis(Axis::Y).range, [-2.0, 2.0]);
    }

    #[test]
    fn mode_must_be_offered() {
        let mut g = GraphConfiguration::new(&schema()).unwrap();
        g.set_mode("1").unwrap();
        assert_eq!(g.mode(), "1");
        assert!(matches!(g.set_mode("9"), Err(ControlError::UnknownMode { .. })));
    }

    #[test]
    fn reset_axes_restores_defaults() {
        let mut g = GraphConfiguration::new(&schema()).unwrap();
        g.set_mode("1").unwrap();
        g.select_variable(Axis::X, "Z").unwrap();
        g.set_range(Axis::Y, [0.0, 1.0]).unwrap();
        g.reset_axes().unwrap();
        assert_eq!(g.mode(), "0");
        assert_eq!(g.axis(Axis::X).variable, "V");
        assert_eq!(g.axis(Axis::Y).range, [-3.0, 3.0]);
        assert!(g.state_variables().is_enabled("Z").unwrap());
    }

    #[test]
    fn start_point_overrides_axis_variables() {
        let mut g = GraphConfiguration::new(&schema()).unwrap();
        g.set_state_variable("Z", 0.25).unwrap();
        let p = g.start_point(1.5, -2.5);
        assert_eq!(p["V"], 1.5);
        assert_eq!(p["W"], -2.5);
        assert_eq!(p["Z"], 0.25);
    }

    #[test]
    fn graph_state_reflects_configuration() {
        let mut g = GraphConfiguration::new(&schema()).unwrap();
        g.set_range(Axis::X, [-1.0, 1.0]).unwrap();
        let state = g.graph_state();
        assert_eq!(state.svx, "V");
        assert_eq!(state.svy, "W");
        assert_eq!(state.x_range, [-1.0, 1.0]);
        assert_eq!(state.mode, "0");
        assert_eq!(state.state_vars.len(), 3);
    }
}
