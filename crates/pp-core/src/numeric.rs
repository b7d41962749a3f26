use crate::{CoreError, CoreResult};

/// Pass `v` through if it is finite.
pub fn ensure_finite(v: f64, what: &'static str) -> CoreResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// `true` when `v` is finite and lies in the closed interval `[min, max]`.
pub fn within(v: f64, min: f64, max: f64) -> bool {
    v.is_finite() && v >= min && v <= max
}

/// Clamp into `[min, max]`; NaN maps to `min`.
pub fn clamp_to(v: f64, min: f64, max: f64) -> f64 {
    if v.is_nan() { min } else { v.max(min).min(max) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn within_rejects_infinities() {
        assert!(within(0.5, 0.0, 1.0));
        assert!(within(1.0, 0.0, 1.0));
        assert!(!within(f64::INFINITY, 0.0, f64::INFINITY));
        assert!(!within(-0.1, 0.0, 1.0));
    }

    #[test]
    fn clamp_to_handles_nan() {
        assert_eq!(clamp_to(f64::NAN, -1.0, 1.0), -1.0);
        assert_eq!(clamp_to(5.0, -1.0, 1.0), 1.0);
        assert_eq!(clamp_to(-5.0, -1.0, 1.0), -1.0);
    }

    proptest! {
        #[test]
        fn clamp_to_lands_within_bounds(v in proptest::num::f64::ANY, lo in -1e6_f64..0.0, hi in 0.0_f64..1e6) {
            let c = clamp_to(v, lo, hi);
            prop_assert!(within(c, lo, hi));
        }
    }
}
