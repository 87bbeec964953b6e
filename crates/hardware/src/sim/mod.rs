//! Trace-driven simulation.
//!
//! Provides the trace format, trace-file loading, and the [`Simulator`] that
//! replays a trace through a cache hierarchy.

/// Trace-file loading.
pub mod loader;

/// Simulation engine owning the hierarchy and its statistics.
pub mod simulator;

/// Trace records and line parsing.
pub mod trace;

pub use self::simulator::Simulator;
pub use self::trace::{TraceReader, TraceRecord};
