//! Cache hierarchy implementation.
//!
//! This module contains the per-level cache units and the hierarchy that
//! coordinates lookups, fills, evictions and inclusion enforcement between them.

/// Multi-level hierarchy and cross-level propagation.
pub mod hierarchy;

/// Cache units (blocks, sets, levels, replacement policies).
pub mod units;

pub use self::hierarchy::{AccessOutcome, CacheHierarchy};
