//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the oldest cache block in a set, regardless of how recently
//! it was accessed. Blocks enter at the front of the set when filled and are
//! never reordered afterwards, so the back of the set is always the oldest fill.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(1)
//!   - `get_victim()`: O(1)
//! - **Space Complexity:** No state beyond the set order
//! - **Best Case:** Streaming accesses where all blocks have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (may evict frequently-used blocks)

use super::{ReplacementPolicy, VictimContext};
use crate::core::units::cache::set::CacheSet;

/// FIFO Policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct FifoPolicy;

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for FifoPolicy {
    /// Hits are order-neutral under FIFO.
    fn update(&mut self, _set: &mut CacheSet, _pos: usize) {}

    /// Identifies the victim block to evict.
    ///
    /// Returns the position at the back of the set (first in).
    fn get_victim(&mut self, set: &CacheSet, _ctx: &VictimContext<'_>) -> usize {
        set.len().saturating_sub(1)
    }
}
