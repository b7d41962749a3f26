//! Property checks for slider groups and axis selectors.

use pp_controls::{ControlGroup, RangeSelector};
use pp_schema::{ControlSpec, StateVariableSpec};
use proptest::prelude::*;

/// (min, max, default) with min <= default <= max.
fn bounds() -> impl Strategy<Value = (f64, f64, f64)> {
    (-1e3_f64..1e3, 0.0_f64..1e3, 0.0_f64..=1.0)
        .prop_map(|(min, span, t)| (min, min + span, min + span * t))
}

fn spec_list() -> impl Strategy<Value = Vec<ControlSpec>> {
    prop::collection::vec(bounds(), 1..8).prop_map(|list| {
        list.into_iter()
            .enumerate()
            .map(|(i, (min, max, default))| ControlSpec::new(format!("p{i}"), min, max, 0.01, default))
            .collect()
    })
}

fn state_variable(name: String) -> impl Strategy<Value = StateVariableSpec> {
    (bounds(), 0.0_f64..=1.0, 0.0_f64..=1.0).prop_map(move |((min, max, default), a, b)| {
        let span = max - min;
        let (lo, hi) = (min + span * a.min(b), min + span * a.max(b));
        StateVariableSpec {
            control: ControlSpec::new(name.clone(), min, max, 0.01, default),
            lo,
            hi,
        }
    })
}

proptest! {
    #[test]
    fn out_of_range_input_snaps_to_default(specs in spec_list(), excess in 1e-3_f64..1e6, above in any::<bool>()) {
        let mut group = ControlGroup::new(&specs).unwrap();
        for spec in &specs {
            let v = if above { spec.max + excess } else { spec.min - excess };
            let change = group.set(&spec.name, v).unwrap();
            prop_assert_eq!(change.value, spec.default);
            prop_assert_eq!(group.get(&spec.name).unwrap(), spec.default);

            let change = group.set(&spec.name, f64::NAN).unwrap();
            prop_assert_eq!(change.value, spec.default);
        }
    }

    #[test]
    fn reset_notifies_once_per_control(specs in spec_list(), t in 0.0_f64..=1.0) {
        let mut group = ControlGroup::new(&specs).unwrap();
        for spec in &specs {
            group.set(&spec.name, spec.min + (spec.max - spec.min) * t).unwrap();
        }
        let changes = group.reset();
        prop_assert_eq!(changes.len(), specs.len());
        for (change, spec) in changes.iter().zip(&specs) {
            prop_assert_eq!(&change.name, &spec.name);
            prop_assert_eq!(change.value, spec.default);
        }
    }

    #[test]
    fn selecting_a_variable_yields_range_within_bounds(
        a in state_variable("A".to_string()),
        b in state_variable("B".to_string()),
        drag in (-1e4_f64..1e4, -1e4_f64..1e4),
    ) {
        let mut selector = RangeSelector::new(&[a.clone(), b.clone()], "A").unwrap();
        selector.set_range([drag.0, drag.1]).unwrap();
        for spec in [&b, &a] {
            let value = selector.select_variable(spec.name()).unwrap();
            let (min, max) = spec.bounds();
            prop_assert!(value.range[0] <= value.range[1]);
            prop_assert!(value.range[0] >= min && value.range[1] <= max);
            prop_assert!(selector.step() >= 0.0);
        }
    }
}
