//! Interactive controls for the phase-plane explorer.
//!
//! This crate holds the UI-side state that feeds remote recomputation:
//! - parameter and state-variable slider groups with bounds and defaults
//! - axis range selectors and the combined graph configuration
//! - debounce/throttle policies used to shape bursts of control events
//!
//! Nothing here performs I/O. Value changes are returned to the caller, which
//! decides when and how to talk to the compute service.

pub mod control_group;
pub mod error;
pub mod graph_config;
pub mod range_selector;
pub mod rate_limit;

pub use control_group::{ControlChange, ControlGroup};
pub use error::{ControlError, ControlResult};
pub use graph_config::{Axis, GraphConfiguration};
pub use range_selector::{AxisValue, RANGE_STEPS, RangeSelector};
pub use rate_limit::{Debounce, Throttle};
