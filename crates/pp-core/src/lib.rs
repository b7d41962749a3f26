//! pp-core: stable foundation for the phase-plane explorer.
//!
//! Contains:
//! - numeric (finiteness and bounds helpers)
//! - ids (session and request identifiers)
//! - timing (virtual clock + latency timer)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use timing::{Timer, VirtualClock};
