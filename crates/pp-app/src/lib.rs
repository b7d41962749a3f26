//! Interaction and state-synchronization engine for the phase-plane explorer.
//!
//! The [`Session`] turns user events into requests to a remote compute service,
//! shapes bursts of events with debounce/throttle policies, and merges replies
//! back into visible state, discarding replies that a newer request superseded.
//! Rendering and transport are collaborators behind the [`PhasePlaneView`] and
//! [`RemoteCompute`] traits.

pub mod change_detect;
pub mod config;
pub mod error;
pub mod remote;
pub mod session;
pub mod trajectories;
pub mod view;
pub mod worker;

// Re-export key types for convenience
pub use change_detect::{ChangeDetector, TreeChange, TreeSnapshot};
pub use config::{SessionConfig, TreeSchema};
pub use error::{AppError, AppResult};
pub use remote::{Completion, Operation, RemoteCompute, RemoteError, Request};
pub use session::{Session, SessionPhase, UiEvent};
pub use trajectories::TrajectorySet;
pub use view::{MessageLevel, PhasePlaneView, RecordingView, ViewCall};
pub use worker::{ComputeBackend, RemoteWorker};

pub use pp_controls::Axis;
