//! Cache units.
//!
//! This module contains the building blocks of a cache level: blocks, sets,
//! and the replacement policies that order them.

/// Set-associative cache level with replacement policies.
pub mod cache;
