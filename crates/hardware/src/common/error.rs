//! Configuration and trace error definitions.
//!
//! This module defines the error types surfaced by the simulator's collaborators. It provides:
//! 1. **Configuration Errors:** Rejections raised while validating cache geometry and policy names.
//! 2. **Trace Errors:** I/O failures and malformed lines reported by the trace reader.
//!
//! The engine itself never returns an error: it is only constructible from a
//! validated geometry and consumes already-parsed accesses.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A rejected simulator configuration.
///
/// Every validation failure is reported through this single type so the
/// front-end can print one categorized message.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A size, associativity or set count that must be a positive power of two is not.
    #[error("{field} must be a positive power of two, got {value}")]
    NotPowerOfTwo {
        /// Which quantity was rejected.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// A present level is smaller than one set (`size < associativity × block_size`).
    #[error(
        "L{level}: cache size {size} is smaller than associativity {associativity} x block size {block_size}"
    )]
    ZeroSets {
        /// 1-based level number.
        level: usize,
        /// Configured level size in bytes.
        size: u64,
        /// Configured associativity.
        associativity: u64,
        /// Hierarchy-wide block size.
        block_size: u64,
    },

    /// A level needs more sets than the simulator will allocate.
    #[error("L{level}: {num_sets} sets exceeds the limit of {max}")]
    TooManySets {
        /// 1-based level number.
        level: usize,
        /// Set count implied by the level's geometry.
        num_sets: u64,
        /// Largest accepted set count.
        max: u64,
    },

    /// No level survived validation.
    #[error("the hierarchy needs at least one cache level with a non-zero size")]
    NoLevels,

    /// A replacement policy name that is not LRU, FIFO or OPTIMAL.
    #[error("unknown replacement policy '{0}' (expected LRU, FIFO or OPTIMAL)")]
    UnknownReplacementPolicy(String),

    /// An inclusion policy name that is not inclusive, exclusive or non-inclusive.
    #[error("unknown inclusion policy '{0}' (expected inclusive, exclusive or non-inclusive)")]
    UnknownInclusionPolicy(String),

    /// A level given on the command line that is not `SIZE:ASSOC`.
    #[error("invalid level '{0}' (expected SIZE:ASSOC, e.g. 32768:8)")]
    InvalidLevelSpec(String),

    /// A configuration document that failed to deserialize.
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A failure while reading a memory-access trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be opened or read.
    #[error("could not read trace '{}': {source}", path.display())]
    Io {
        /// Path of the trace file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A line is not `<r|w> <hex address>`.
    #[error("trace line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
}
