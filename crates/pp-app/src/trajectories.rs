//! Tracked trajectory starting points and their computed curves.

use pp_schema::{Curve, StatePoint, TrajectoryReply};

use crate::error::{AppError, AppResult};

/// Starting points paired 1:1 with trajectory and signal curves.
///
/// Every mutation either succeeds completely or leaves the set untouched, so
/// `starts`, `trajectories` and `signals` always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectorySet {
    starts: Vec<StatePoint>,
    trajectories: Vec<Curve>,
    signals: Vec<Curve>,
}

fn check_reply(reply: &TrajectoryReply, expected: usize) -> AppResult<()> {
    if !reply.finite {
        return Err(AppError::DivergentComputation);
    }
    if reply.trajectories.len() != expected || reply.signals.len() != expected {
        return Err(AppError::MalformedReply {
            operation: "trajectories",
            message: format!(
                "expected {expected} curves, got {} trajectories and {} signals",
                reply.trajectories.len(),
                reply.signals.len()
            ),
        });
    }
    Ok(())
}

impl TrajectorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn starts(&self) -> &[StatePoint] {
        &self.starts
    }

    pub fn trajectories(&self) -> &[Curve] {
        &self.trajectories
    }

    pub fn signals(&self) -> &[Curve] {
        &self.signals
    }

    pub fn clear(&mut self) {
        self.starts.clear();
        self.trajectories.clear();
        self.signals.clear();
    }

    /// Track a new starting point together with its single computed curve.
    pub fn append(&mut self, start: StatePoint, reply: TrajectoryReply) -> AppResult<()> {
        check_reply(&reply, 1)?;
        let TrajectoryReply {
            trajectories,
            signals,
            ..
        } = reply;
        self.starts.push(start);
        self.trajectories.extend(trajectories);
        self.signals.extend(signals);
        Ok(())
    }

    /// Replace the curves of the first `sent` starting points with a recomputation.
    pub fn refresh(&mut self, sent: usize, reply: TrajectoryReply) -> AppResult<()> {
        if sent > self.starts.len() {
            return Err(AppError::MalformedReply {
                operation: "trajectories",
                message: format!("{sent} curves for {} tracked starts", self.starts.len()),
            });
        }
        check_reply(&reply, sent)?;
        self.trajectories.splice(..sent, reply.trajectories);
        self.signals.splice(..sent, reply.signals);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn start(v: f64) -> StatePoint {
        StatePoint::from([("V".to_string(), v)])
    }

    fn reply(tags: &[&str]) -> TrajectoryReply {
        TrajectoryReply {
            finite: true,
            trajectories: tags.iter().map(|t| Curve(json!(format!("t-{t}")))).collect(),
            signals: tags.iter().map(|t| Curve(json!(format!("s-{t}")))).collect(),
        }
    }

    fn assert_paired(set: &TrajectorySet) {
        assert_eq!(set.starts().len(), set.trajectories().len());
        assert_eq!(set.starts().len(), set.signals().len());
    }

    #[test]
    fn append_keeps_pairs() {
        let mut set = TrajectorySet::new();
        set.append(start(0.0), reply(&["a"])).unwrap();
        set.append(start(1.0), reply(&["b"])).unwrap();
        assert_eq!(set.len(), 2);
        assert_paired(&set);
    }

    #[test]
    fn divergent_append_changes_nothing() {
        let mut set = TrajectorySet::new();
        set.append(start(0.0), reply(&["a"])).unwrap();
        let mut bad = reply(&["b"]);
        bad.finite = false;
        assert!(matches!(
            set.append(start(1.0), bad),
            Err(AppError::DivergentComputation)
        ));
        assert_eq!(set.len(), 1);
        assert_paired(&set);
    }

    #[test]
    fn append_rejects_wrong_curve_count() {
        let mut set = TrajectorySet::new();
        assert!(set.append(start(0.0), reply(&["a", "b"])).is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn refresh_replaces_prefix_only() {
        let mut set = TrajectorySet::new();
        for (i, t) in ["a", "b", "c"].into_iter().enumerate() {
            set.append(start(i as f64), reply(&[t])).unwrap();
        }
        set.refresh(2, reply(&["x", "y"])).unwrap();
        assert_eq!(
            set.trajectories(),
            &[Curve(json!("t-x")), Curve(json!("t-y")), Curve(json!("t-c"))]
        );
        assert_paired(&set);
        assert!(set.refresh(4, reply(&["1", "2", "3", "4"])).is_err());
    }

    #[test]
    fn clear_empties_everything() {
        let mut set = TrajectorySet::new();
        set.append(start(0.0), reply(&["a"])).unwrap();
        set.clear();
        assert!(set.is_empty());
        assert!(set.trajectories().is_empty());
        assert!(set.signals().is_empty());
    }
}
