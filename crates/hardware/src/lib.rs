//! Multi-level cache hierarchy simulator library.
//!
//! This crate replays memory-access traces through a set-associative cache
//! hierarchy with the following:
//! 1. **Core:** Address decoding, sets, cache levels, and the hierarchy walk.
//! 2. **Policies:** LRU, FIFO and Belady-optimal replacement; inclusive, exclusive and non-inclusive levels.
//! 3. **Simulation:** Trace parsing and loading, and the engine that owns the run.
//! 4. **Statistics:** Per-level counters, miss rates, memory traffic, and report writers.
//!
//! ```
//! use cachesim_core::{AccessType, Config, InclusionPolicy, ReplacementPolicy, Simulator};
//!
//! let geometry = Config::new(
//!     16,
//!     &[(1024, 1), (8192, 4)],
//!     ReplacementPolicy::Lru,
//!     InclusionPolicy::Inclusive,
//! )
//! .validate()
//! .unwrap();
//!
//! let mut sim = Simulator::new(&geometry);
//! let _ = sim.access(AccessType::Read, 0x0);
//! let _ = sim.access(AccessType::Read, 0x10);
//! assert!(sim.access(AccessType::Read, 0x0).is_l1_hit());
//! assert_eq!(sim.stats().memory_traffic, 2);
//! ```

/// Common types (address decoding, access types, errors).
pub mod common;
/// Simulator configuration (defaults, policy tags, validation).
pub mod config;
/// Cache hierarchy (levels, sets, replacement policies, inclusion).
pub mod core;
/// Trace parsing, loading, and the simulation engine.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Access operation of a trace record.
pub use crate::common::AccessType;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::{Config, HierarchyGeometry, InclusionPolicy, ReplacementPolicy};
/// Hierarchy and per-access result.
pub use crate::core::{AccessOutcome, CacheHierarchy};
/// Simulation engine; construct from a validated [`HierarchyGeometry`].
pub use crate::sim::{Simulator, TraceRecord};
/// Run statistics.
pub use crate::stats::{LevelStats, SimStats};
