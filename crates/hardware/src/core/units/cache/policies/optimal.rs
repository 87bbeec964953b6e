//! Belady's Optimal Replacement Policy.
//!
//! Evicts the block whose next reference lies furthest in the future, or that is
//! never referenced again. The policy needs the whole trace up front, which the
//! simulator supplies as a [`NextUseTable`] keyed by block number.
//!
//! Hits still promote the block to the front of the set. Recency never changes
//! which block is furthest, but it decides ties: among blocks with the same
//! next use (typically "never"), the one nearest the back of the set goes.
//!
//! Without a table every block looks unused, so the tie-break alone applies and
//! the policy behaves exactly like LRU.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(W)
//!   - `get_victim()`: O(W log R) where R is the reference count of a block
//! - **Space Complexity:** O(N) for the table, N being the trace length

use std::collections::HashMap;

use super::{ReplacementPolicy, VictimContext};
use crate::core::units::cache::set::CacheSet;

/// Positions at which each block number is referenced.
#[derive(Debug, Clone, Default)]
pub struct NextUseTable {
    positions: HashMap<u64, Vec<usize>>,
}

impl NextUseTable {
    /// Builds the table from the block numbers of a trace, in trace order.
    pub fn new(blocks: impl IntoIterator<Item = u64>) -> Self {
        let mut positions: HashMap<u64, Vec<usize>> = HashMap::new();
        for (pos, block) in blocks.into_iter().enumerate() {
            positions.entry(block).or_default().push(pos);
        }
        Self { positions }
    }

    /// First position at or after `from` referencing `block`.
    ///
    /// The access at `from` itself counts, so the block being filled by the
    /// current access always reports `Some(from)`.
    pub fn next_use(&self, block: u64, from: usize) -> Option<usize> {
        let refs = self.positions.get(&block)?;
        let idx = refs.partition_point(|&p| p < from);
        refs.get(idx).copied()
    }

    /// Number of distinct blocks referenced by the trace.
    pub fn distinct_blocks(&self) -> usize {
        self.positions.len()
    }
}

/// Optimal Policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptimalPolicy;

impl OptimalPolicy {
    /// Creates a new Optimal policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for OptimalPolicy {
    fn update(&mut self, set: &mut CacheSet, pos: usize) {
        set.promote(pos);
    }

    /// Scans from the back so the oldest block wins ties.
    fn get_victim(&mut self, set: &CacheSet, ctx: &VictimContext<'_>) -> usize {
        let Some(table) = ctx.lookahead.table else {
            return set.len().saturating_sub(1);
        };
        let from = ctx.lookahead.position;

        let mut victim = set.len().saturating_sub(1);
        let mut furthest = None;
        for pos in (1..set.len()).rev() {
            let Some(block) = set.get(pos) else {
                continue;
            };
            let key = table
                .next_use(ctx.decoder.block_number(block.tag, block.set_index), from)
                .unwrap_or(usize::MAX);
            if furthest.is_none_or(|best| key > best) {
                furthest = Some(key);
                victim = pos;
            }
        }
        victim
    }
}
