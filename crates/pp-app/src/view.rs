//! Rendering surface contract.

use pp_schema::{Curve, PlotData};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// What the session asks of the surface that paints the phase plane.
pub trait PhasePlaneView {
    fn draw(&mut self, plot: &PlotData);
    fn draw_trajectories(&mut self, curves: &[Curve]);
    fn draw_signal(&mut self, curves: &[Curve]);
    fn set_labels(&mut self, x: &str, y: &str);
    fn set_plot_labels(&mut self, names: &[String]);
    /// Replace the parameter slider markup after a model switch.
    fn install_fragment(&mut self, _fragment: &str) {}
    fn show_message(&mut self, level: MessageLevel, text: &str);
}

/// A single call made on a [`RecordingView`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum ViewCall {
    Draw { plot: PlotData },
    DrawTrajectories { curves: Vec<Curve> },
    DrawSignal { curves: Vec<Curve> },
    SetLabels { x: String, y: String },
    SetPlotLabels { names: Vec<String> },
    InstallFragment { fragment: String },
    ShowMessage { level: MessageLevel, text: String },
}

/// View that only records what it was asked to do.
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    calls: Vec<ViewCall>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[ViewCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<ViewCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn last_plot(&self) -> Option<&PlotData> {
        self.calls.iter().rev().find_map(|c| match c {
            ViewCall::Draw { plot } => Some(plot),
            _ => None,
        })
    }

    pub fn last_trajectories(&self) -> Option<&[Curve]> {
        self.calls.iter().rev().find_map(|c| match c {
            ViewCall::DrawTrajectories { curves } => Some(curves.as_slice()),
            _ => None,
        })
    }

    pub fn last_signals(&self) -> Option<&[Curve]> {
        self.calls.iter().rev().find_map(|c| match c {
            ViewCall::DrawSignal { curves } => Some(curves.as_slice()),
            _ => None,
        })
    }

    pub fn messages(&self) -> Vec<(MessageLevel, &str)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ViewCall::ShowMessage { level, text } => Some((*level, text.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ViewCall::Draw { .. }))
            .count()
    }
}

impl PhasePlaneView for RecordingView {
    fn draw(&mut self, plot: &PlotData) {
        self.calls.push(ViewCall::Draw { plot: plot.clone() });
    }

    fn draw_trajectories(&mut self, curves: &[Curve]) {
        self.calls.push(ViewCall::DrawTrajectories {
            curves: curves.to_vec(),
        });
    }

    fn draw_signal(&mut self, curves: &[Curve]) {
        self.calls.push(ViewCall::DrawSignal {
            curves: curves.to_vec(),
        });
    }

    fn set_labels(&mut self, x: &str, y: &str) {
        self.calls.push(ViewCall::SetLabels {
            x: x.to_string(),
            y: y.to_string(),
        });
    }

    fn set_plot_labels(&mut self, names: &[String]) {
        self.calls.push(ViewCall::SetPlotLabels {
            names: names.to_vec(),
        });
    }

    fn install_fragment(&mut self, fragment: &str) {
        self.calls.push(ViewCall::InstallFragment {
            fragment: fragment.to_string(),
        });
    }

    fn show_message(&mut self, level: MessageLevel, text: &str) {
        self.calls.push(ViewCall::ShowMessage {
            level,
            text: text.to_string(),
        });
    }
}
