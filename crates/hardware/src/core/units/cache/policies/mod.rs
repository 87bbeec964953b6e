//! Cache Replacement Policies.
//!
//! Implements the algorithms that order the blocks of a set and select victim
//! blocks when a fill pushes a set past its associativity.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used.
//! - `Fifo`: First-In, First-Out.
//! - `Optimal`: Belady's furthest-next-use, driven by a [`NextUseTable`].
//!
//! Every policy works on a [`CacheSet`] whose front (position 0) is the newest
//! end. A fill always lands at position 0 before the victim is chosen, and no
//! policy may nominate position 0.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Belady's optimal replacement policy and its next-use table.
pub mod optimal;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use optimal::{NextUseTable, OptimalPolicy};

use super::set::CacheSet;
use crate::common::AddressDecoder;

/// Where the engine stands in the trace and what it knows about the rest of it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lookahead<'a> {
    /// 0-based index of the access currently being simulated.
    pub position: usize,
    /// Future block references, when the whole trace was supplied up front.
    pub table: Option<&'a NextUseTable>,
}

/// Inputs available to a policy while it picks a victim.
#[derive(Clone, Copy, Debug)]
pub struct VictimContext<'a> {
    /// Decoder of the level owning the set, to rebuild block numbers.
    pub decoder: &'a AddressDecoder,
    /// Trace position and look-ahead.
    pub lookahead: Lookahead<'a>,
}

/// Trait for cache replacement policies.
///
/// Defines the interface for reordering a set on a hit and selecting victim blocks.
pub trait ReplacementPolicy: Send + Sync {
    /// Updates the set order when the block at `pos` is hit.
    ///
    /// # Arguments
    ///
    /// * `set` - The set containing the hit block.
    /// * `pos` - Position of the hit block, counted from the newest end.
    fn update(&mut self, set: &mut CacheSet, pos: usize);

    /// Selects the block to evict from an over-capacity set.
    ///
    /// # Arguments
    ///
    /// * `set` - A set holding `capacity + 1` blocks, the newest at position 0.
    /// * `ctx` - Decoder and look-ahead for policies that need them.
    ///
    /// # Returns
    ///
    /// The position of the victim, in `1..set.len()`.
    fn get_victim(&mut self, set: &CacheSet, ctx: &VictimContext<'_>) -> usize;
}
