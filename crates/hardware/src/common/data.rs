//! Memory Access Types.
//!
//! This module defines the classification of trace accesses used throughout the simulator.
//! These types are used for the following:
//! 1. **Hit Path:** A write hit marks the resident block dirty.
//! 2. **Miss Path:** A write fill installs a dirty block.
//! 3. **Statistics Tracking:** Reads and writes are counted separately at every level.

use std::fmt;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read access (`r` in a trace).
    Read,

    /// Data write access (`w` in a trace).
    Write,
}

impl AccessType {
    /// Returns `true` for [`AccessType::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }

    /// Single-letter trace mnemonic.
    pub const fn mnemonic(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}
