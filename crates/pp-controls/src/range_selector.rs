//! Axis controller: a "which variable" selector coupled with a `[lo, hi]` range.

use pp_core::{clamp_to, ensure_finite};
use pp_schema::{StateVariableSpec, validate_state_variable};

use crate::error::{ControlError, ControlResult};

/// Number of discrete steps across a variable's full span.
pub const RANGE_STEPS: f64 = 1000.0;

/// Current selection of one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisValue {
    pub variable: String,
    pub range: [f64; 2],
}

#[derive(Debug, Clone)]
pub struct RangeSelector {
    variables: Vec<StateVariableSpec>,
    default_variable: String,
    selected: usize,
    lo: f64,
    hi: f64,
    step: f64,
}

impl RangeSelector {
    /// Create a selector over `variables`, initially showing `default_variable`
    /// at its declared default range.
    pub fn new(variables: &[StateVariableSpec], default_variable: &str) -> ControlResult<Self> {
        for sv in variables {
            validate_state_variable(sv)?;
        }
        let mut selector = Self {
            variables: variables.to_vec(),
            default_variable: default_variable.to_string(),
            selected: 0,
            lo: 0.0,
            hi: 0.0,
            step: 0.0,
        };
        selector.select_variable(default_variable)?;
        Ok(selector)
    }

    fn position(&self, name: &str) -> ControlResult<usize> {
        self.variables
            .iter()
            .position(|sv| sv.name() == name)
            .ok_or_else(|| ControlError::UnknownVariable {
                name: name.to_string(),
            })
    }

    /// Select `name`, snapping the range to its declared default and
    /// recomputing the discretization step.
    pub fn select_variable(&mut self, name: &str) -> ControlResult<AxisValue> {
        let idx = self.position(name)?;
        let sv = &self.variables[idx];
        let (min, max) = sv.bounds();
        let lo = clamp_to(sv.lo, min, max);
        let hi = clamp_to(sv.hi, lo, max);
        self.selected = idx;
        self.lo = lo;
        self.hi = hi;
        self.step = (max - min) / RANGE_STEPS;
        Ok(self.value())
    }

    /// User drag of the range handles, clamped to the selected variable's bounds.
    /// Crossed handles are reordered; non-finite handles are rejected.
    pub fn set_range(&mut self, range: [f64; 2]) -> ControlResult<AxisValue> {
        let (min, max) = self.bounds();
        let a = clamp_to(ensure_finite(range[0], "range lo")?, min, max);
        let b = clamp_to(ensure_finite(range[1], "range hi")?, min, max);
        self.lo = a.min(b);
        self.hi = a.max(b);
        Ok(self.value())
    }

    /// Restore the originally configured variable and its default range.
    pub fn reset(&mut self) -> ControlResult<AxisValue> {
        let name = self.default_variable.clone();
        self.select_variable(&name)
    }

    pub fn value(&self) -> AxisValue {
        AxisValue {
            variable: self.variable().to_string(),
            range: [self.lo, self.hi],
        }
    }

    pub fn variable(&self) -> &str {
        self.variables[self.selected].name()
    }

    pub fn default_variable(&self) -> &str {
        &self.default_variable
    }

    pub fn bounds(&self) -> (f64, f64) {
        self.variables[self.selected].bounds()
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_schema::ControlSpec;

    fn sv(name: &str, min: f64, max: f64, lo: f64, hi: f64) -> StateVariableSpec {
        StateVariableSpec {
            control: ControlSpec::new(name, min, max, 0.1, lo),
            lo,
            hi,
        }
    }

    fn selector() -> RangeSelector {
        RangeSelector::new(
            &[sv("V", -4.0, 4.0, -2.0, 4.0), sv("W", -6.0, 6.0, -1.0, 1.0)],
            "V",
        )
        .unwrap()
    }

    #[test]
    fn starts_on_default_variable() {
        let s = selector();
        assert_eq!(
            s.value(),
            AxisValue {
                variable: "V".to_string(),
                range: [-2.0, 4.0]
            }
        );
        assert!((s.step() - 0.008).abs() < 1e-12);
    }

    #[test]
    fn selecting_snaps_range_and_step() {
        let mut s = selector();
        s.set_range([0.0, 1.0]).unwrap();
        let v = s.select_variable("W").unwrap();
        assert_eq!(v.range, [-1.0, 1.0]);
        assert!((s.step() - 0.012).abs() < 1e-12);
    }

    #[test]
    fn set_range_clamps_and_orders() {
        let mut s = selector();
        let v = s.set_range([10.0, -10.0]).unwrap();
        assert_eq!(v.range, [-4.0, 4.0]);
        assert!(s.set_range([f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn reset_restores_default_axis() {
        let mut s = selector();
        s.select_variable("W").unwrap();
        s.set_range([-5.0, 5.0]).unwrap();
        let v = s.reset().unwrap();
        assert_eq!(v.variable, "V");
        assert_eq!(v.range, [-2.0, 4.0]);
    }

    #[test]
    fn unknown_variable_is_an_error() {
        let mut s = selector();
        assert!(matches!(
            s.select_variable("Q"),
            Err(ControlError::UnknownVariable { .. })
        ));
        assert_eq!(s.variable(), "V");
        assert!(RangeSelector::new(&[sv("V", -1.0, 1.0, 0.0, 0.5)], "X").is_err());
    }
}
