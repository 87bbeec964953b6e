//! Set-Associative Cache Level.
//!
//! This module implements one level of a set-associative cache. A level owns
//! its sets, its address decoder and a boxed replacement policy. It knows
//! nothing about the levels around it: the hierarchy decides what happens to
//! the victims a level hands back.
//!
//! # Operations
//!
//! - `touch()`: hit path. Reorders the set and marks writes dirty.
//! - `install()`: fill path. Inserts a block, evicts if needed and returns the victim.
//! - `invalidate()` / `take()`: removal on behalf of inclusion enforcement.

/// Cache replacement policy implementations (LRU, FIFO, Optimal).
pub mod policies;

/// Bounded, ordered set of blocks.
pub mod set;

use tracing::trace;

use self::policies::{
    FifoPolicy, Lookahead, LruPolicy, OptimalPolicy, ReplacementPolicy, VictimContext,
};
use self::set::CacheSet;
use crate::common::{AccessType, AddressDecoder};
use crate::config::{LevelGeometry, ReplacementPolicy as PolicyType};

/// Cache block entry containing tag, validity, and dirty bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Tag under the owning level's decoder.
    pub tag: u64,
    /// Modified since it was fetched; must be written back on eviction.
    pub dirty: bool,
    /// Cleared by back-invalidation; the slot is reclaimed on the next fill.
    pub valid: bool,
    /// Set the block lives in.
    pub set_index: usize,
}

impl Block {
    /// Creates a valid block.
    pub const fn new(tag: u64, set_index: usize, dirty: bool) -> Self {
        Self {
            tag,
            dirty,
            valid: true,
            set_index,
        }
    }
}

/// One level of the hierarchy.
pub struct CacheLevel {
    geometry: LevelGeometry,
    sets: Vec<CacheSet>,
    policy: Box<dyn ReplacementPolicy>,
}

impl std::fmt::Debug for CacheLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLevel")
            .field("geometry", &self.geometry)
            .field("sets", &self.sets.len())
            .finish_non_exhaustive()
    }
}

impl CacheLevel {
    /// Creates an empty level.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Validated size, associativity and decoder of the level.
    /// * `policy` - Replacement policy shared by every set of the level.
    pub fn new(geometry: &LevelGeometry, policy: PolicyType) -> Self {
        let policy: Box<dyn ReplacementPolicy> = match policy {
            PolicyType::Lru => Box::new(LruPolicy::new()),
            PolicyType::Fifo => Box::new(FifoPolicy::new()),
            PolicyType::Optimal => Box::new(OptimalPolicy::new()),
        };

        Self {
            geometry: *geometry,
            sets: (0..geometry.num_sets)
                .map(|_| CacheSet::new(geometry.associativity))
                .collect(),
            policy,
        }
    }

    /// 1-based level number (L1 = 1).
    #[inline]
    pub const fn level(&self) -> usize {
        self.geometry.level
    }

    /// Geometry the level was built from.
    #[inline]
    pub const fn geometry(&self) -> &LevelGeometry {
        &self.geometry
    }

    /// Decoder for this level's set count.
    #[inline]
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.geometry.decoder
    }

    /// Sets in index order.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// Returns the valid block holding `addr`, if resident.
    pub fn lookup(&self, addr: u64) -> Option<&Block> {
        let d = self.geometry.decoder.decode(addr);
        let set = self.sets.get(d.index)?;
        set.position(d.tag).and_then(|pos| set.get(pos))
    }

    /// Checks if the level holds a valid copy of `addr`.
    pub fn contains(&self, addr: u64) -> bool {
        self.lookup(addr).is_some()
    }

    /// Performs the hit path for `addr`.
    ///
    /// On a hit the policy reorders the set and a write marks the block dirty.
    /// A miss leaves the level untouched.
    ///
    /// # Returns
    ///
    /// `true` on a hit.
    pub fn touch(&mut self, addr: u64, op: AccessType) -> bool {
        let d = self.geometry.decoder.decode(addr);
        let Some(set) = self.sets.get_mut(d.index) else {
            return false;
        };
        let Some(pos) = set.position(d.tag) else {
            return false;
        };
        if op.is_write()
            && let Some(block) = set.get_mut(pos)
        {
            block.dirty = true;
        }
        self.policy.update(set, pos);
        true
    }

    /// Installs the block holding `addr`.
    ///
    /// Invalid slots in the target set are reclaimed first. If the block is
    /// already resident it is treated as a hit and `dirty` is merged into it.
    /// Otherwise it enters at the newest end and, if the set overflows, the
    /// policy picks a victim which is removed and returned.
    ///
    /// # Panics
    ///
    /// Panics if the set is still over capacity after eviction.
    pub fn install(&mut self, addr: u64, dirty: bool, lookahead: Lookahead<'_>) -> Option<Block> {
        let d = self.geometry.decoder.decode(addr);
        let level = self.geometry.level;
        let set = self.sets.get_mut(d.index)?;
        set.reclaim_invalid();

        if let Some(pos) = set.position(d.tag) {
            if let Some(block) = set.get_mut(pos) {
                block.dirty |= dirty;
            }
            self.policy.update(set, pos);
            return None;
        }

        set.push_newest(Block::new(d.tag, d.index, dirty));
        if !set.is_over_capacity() {
            return None;
        }

        let ctx = VictimContext {
            decoder: &self.geometry.decoder,
            lookahead,
        };
        let pos = self.policy.get_victim(set, &ctx);
        assert_ne!(pos, 0, "L{level} policy nominated the block being installed");
        let victim = set.remove(pos);
        assert!(
            !set.is_over_capacity(),
            "L{} set {} holds {} blocks after eviction (associativity {})",
            level,
            d.index,
            set.len(),
            set.capacity()
        );
        if let Some(v) = &victim {
            trace!(
                level,
                set = d.index,
                tag = v.tag,
                dirty = v.dirty,
                "victim selected"
            );
        }
        victim
    }

    /// Marks the copy of `addr` invalid, returning what it held.
    pub fn invalidate(&mut self, addr: u64) -> Option<Block> {
        let d = self.geometry.decoder.decode(addr);
        self.sets.get_mut(d.index)?.invalidate(d.tag)
    }

    /// Removes the copy of `addr` outright, returning it.
    pub fn take(&mut self, addr: u64) -> Option<Block> {
        let d = self.geometry.decoder.decode(addr);
        self.sets.get_mut(d.index)?.take(d.tag)
    }

    /// Byte address of the first byte of `block`.
    #[inline]
    pub fn block_addr(&self, block: &Block) -> u64 {
        self.geometry.decoder.compose(block.tag, block.set_index, 0)
    }

    /// Number of valid blocks across all sets.
    pub fn valid_count(&self) -> usize {
        self.sets.iter().map(CacheSet::valid_count).sum()
    }
}
