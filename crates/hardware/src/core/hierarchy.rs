//! Multi-level cache hierarchy.
//!
//! Owns the cache levels (L1 first) and drives one access through them:
//! 1. **Lookup:** Levels are consulted in order until one hits.
//! 2. **Fill:** The block is installed where the inclusion policy wants it.
//! 3. **Eviction:** Victims are written back, demoted or back-invalidated.
//!
//! Everything that happens between levels after the lookup is expressed as
//! `Pending` work items on a LIFO worklist. The list is drained before
//! [`CacheHierarchy::access`] returns, so an access is fully committed before
//! the next one starts and no level ever calls into another.

use std::io::{self, Write};

use tracing::{debug, info, trace};

use crate::common::AccessType;
use crate::config::{HierarchyGeometry, InclusionPolicy, ReplacementPolicy};
use crate::core::units::cache::policies::Lookahead;
use crate::core::units::cache::{Block, CacheLevel};
use crate::stats::SimStats;

/// Result of a single access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessOutcome {
    /// 0-based level that satisfied the access, `None` if it went to memory.
    pub hit_level: Option<usize>,
}

impl AccessOutcome {
    /// Returns `true` if some level held the block.
    pub const fn is_hit(&self) -> bool {
        self.hit_level.is_some()
    }

    /// Returns `true` if L1 held the block.
    pub const fn is_l1_hit(&self) -> bool {
        matches!(self.hit_level, Some(0))
    }
}

/// Cross-level work queued while an access is processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    /// Install a block at `level` on behalf of a demand access.
    Fill { level: usize, addr: u64, dirty: bool },
    /// Write a dirty victim from `level - 1` into `level`.
    WriteBack { level: usize, addr: u64 },
    /// Place an exclusive victim from `level - 1` into `level`.
    Demote { level: usize, addr: u64, dirty: bool },
}

/// Ordered list of cache levels under one replacement and inclusion policy.
#[derive(Debug)]
pub struct CacheHierarchy {
    levels: Vec<CacheLevel>,
    block_size: u64,
    replacement: ReplacementPolicy,
    inclusion: InclusionPolicy,
}

impl CacheHierarchy {
    /// Builds empty levels from a validated geometry.
    pub fn new(geometry: &HierarchyGeometry) -> Self {
        let levels: Vec<CacheLevel> = geometry
            .levels()
            .iter()
            .map(|g| {
                info!(
                    level = g.level,
                    size = g.size,
                    associativity = g.associativity,
                    sets = g.num_sets,
                    offset_bits = g.decoder.offset_bits(),
                    index_bits = g.decoder.index_bits(),
                    "cache level initialized"
                );
                CacheLevel::new(g, geometry.replacement())
            })
            .collect();

        Self {
            levels,
            block_size: geometry.block_size(),
            replacement: geometry.replacement(),
            inclusion: geometry.inclusion(),
        }
    }

    /// Levels, L1 first.
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// Number of present levels.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Block size shared by every level.
    pub const fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Replacement policy of every level.
    pub const fn replacement(&self) -> ReplacementPolicy {
        self.replacement
    }

    /// Inclusion policy between levels.
    pub const fn inclusion(&self) -> InclusionPolicy {
        self.inclusion
    }

    /// Checks if the 0-based `level` holds a valid copy of `addr`.
    pub fn contains(&self, level: usize, addr: u64) -> bool {
        self.levels.get(level).is_some_and(|l| l.contains(addr))
    }

    /// `(tag, dirty)` of the valid blocks in one set, newest first.
    pub fn set_contents(&self, level: usize, index: usize) -> Vec<(u64, bool)> {
        self.levels
            .get(level)
            .and_then(|l| l.sets().get(index))
            .map(|set| {
                set.iter()
                    .filter(|b| b.valid)
                    .map(|b| (b.tag, b.dirty))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Simulates one access and commits all of its side effects.
    ///
    /// # Arguments
    ///
    /// * `op` - Read or write.
    /// * `addr` - Byte address.
    /// * `lookahead` - Trace position and next-use table for the Optimal policy.
    /// * `stats` - Counters to update; must have one entry per level.
    pub fn access(
        &mut self,
        op: AccessType,
        addr: u64,
        lookahead: Lookahead<'_>,
        stats: &mut SimStats,
    ) -> AccessOutcome {
        stats.accesses += 1;

        let mut hit_level = None;
        for (i, level) in self.levels.iter_mut().enumerate() {
            let hit = level.touch(addr, op);
            if let Some(s) = stats.levels.get_mut(i) {
                match (op, hit) {
                    (AccessType::Read, true) => s.reads += 1,
                    (AccessType::Read, false) => {
                        s.reads += 1;
                        s.read_misses += 1;
                    }
                    (AccessType::Write, true) => s.writes += 1,
                    (AccessType::Write, false) => {
                        s.writes += 1;
                        s.write_misses += 1;
                    }
                }
            }
            if hit {
                hit_level = Some(i);
                break;
            }
        }
        if hit_level.is_none() {
            stats.memory_traffic += 1;
        }
        trace!(op = %op, addr, hit_level = ?hit_level, "access");

        let dirty = op.is_write();
        let mut work = Vec::new();
        match self.inclusion {
            InclusionPolicy::Inclusive | InclusionPolicy::NonInclusive => {
                // Pushed top first so the deepest fill runs first.
                let missed = hit_level.unwrap_or(self.levels.len());
                work.extend((0..missed).map(|level| Pending::Fill { level, addr, dirty }));
            }
            InclusionPolicy::Exclusive => match hit_level {
                Some(0) => {}
                Some(l) => {
                    let moved = self.levels.get_mut(l).and_then(|lvl| lvl.take(addr));
                    let dirty = moved.is_some_and(|b| b.dirty) || dirty;
                    debug!(from = l + 1, addr, dirty, "exclusive relocation to L1");
                    work.push(Pending::Fill {
                        level: 0,
                        addr,
                        dirty,
                    });
                }
                None => work.push(Pending::Fill {
                    level: 0,
                    addr,
                    dirty,
                }),
            },
        }
        self.drain(work, lookahead, stats);

        AccessOutcome { hit_level }
    }

    fn drain(&mut self, mut work: Vec<Pending>, lookahead: Lookahead<'_>, stats: &mut SimStats) {
        while let Some(item) = work.pop() {
            match item {
                Pending::Fill { level, addr, dirty } | Pending::Demote { level, addr, dirty } => {
                    let victim = self
                        .levels
                        .get_mut(level)
                        .and_then(|l| l.install(addr, dirty, lookahead));
                    if let Some(victim) = victim {
                        self.evict(level, victim, &mut work, stats);
                    }
                }
                Pending::WriteBack { level, addr } => {
                    let Some(target) = self.levels.get_mut(level) else {
                        continue;
                    };
                    let hit = target.touch(addr, AccessType::Write);
                    if let Some(s) = stats.levels.get_mut(level) {
                        s.writes += 1;
                        if !hit {
                            s.write_misses += 1;
                        }
                    }
                    if !hit {
                        work.push(Pending::Fill {
                            level,
                            addr,
                            dirty: true,
                        });
                    }
                }
            }
        }
    }

    /// Disposes of a block evicted from the 0-based `level`.
    ///
    /// A dirty victim always counts as a writeback at `level`, but only a
    /// writeback out of the last level reaches memory and counts as memory
    /// traffic. Writebacks and demotions into a deeper level stay inside the
    /// hierarchy.
    fn evict(&mut self, level: usize, victim: Block, work: &mut Vec<Pending>, stats: &mut SimStats) {
        let Some(owner) = self.levels.get(level) else {
            return;
        };
        let addr = owner.block_addr(&victim);
        let mut dirty = victim.dirty;
        debug!(level = level + 1, addr, dirty, "evicted");

        if self.inclusion == InclusionPolicy::Inclusive {
            for upper in 0..level {
                let Some(copy) = self.levels.get_mut(upper).and_then(|l| l.invalidate(addr))
                else {
                    continue;
                };
                debug!(level = upper + 1, addr, dirty = copy.dirty, "back-invalidated");
                dirty |= copy.dirty;
                if let Some(s) = stats.levels.get_mut(upper) {
                    s.invalidations += 1;
                }
            }
        }

        let last = level + 1 == self.levels.len();
        if dirty && let Some(s) = stats.levels.get_mut(level) {
            s.writebacks += 1;
        }

        if self.inclusion == InclusionPolicy::Exclusive && !last {
            work.push(Pending::Demote {
                level: level + 1,
                addr,
                dirty,
            });
        } else if dirty {
            if last {
                debug!(level = level + 1, addr, "writeback to memory");
                stats.memory_traffic += 1;
            } else {
                work.push(Pending::WriteBack {
                    level: level + 1,
                    addr,
                });
            }
        }
    }

    /// Writes every level's contents, one line per set, newest block first.
    ///
    /// Each block is printed as its tag in hex, followed by `D` when dirty.
    ///
    /// # Errors
    ///
    /// Propagates failures of `out`.
    pub fn write_contents<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for level in &self.levels {
            writeln!(out, "===== L{} contents =====", level.level())?;
            for (i, set) in level.sets().iter().enumerate() {
                write!(out, "Set {i}:")?;
                for block in set.iter().filter(|b| b.valid) {
                    write!(out, " {:x}", block.tag)?;
                    if block.dirty {
                        write!(out, " D")?;
                    }
                }
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
