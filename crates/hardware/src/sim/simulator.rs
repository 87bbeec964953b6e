//! Simulator: owns the cache hierarchy and its statistics side-by-side.
//!
//! Keeping both in one value lets each access borrow the hierarchy mutably and
//! the counters mutably at the same time, without globals or shared handles.

use tracing::warn;

use super::trace::TraceRecord;
use crate::common::AccessType;
use crate::config::{HierarchyGeometry, ReplacementPolicy};
use crate::core::hierarchy::{AccessOutcome, CacheHierarchy};
use crate::core::units::cache::policies::{Lookahead, NextUseTable};
use crate::stats::SimStats;

/// Top-level simulator: cache hierarchy + statistics + optional look-ahead.
#[derive(Debug)]
pub struct Simulator {
    hierarchy: CacheHierarchy,
    stats: SimStats,
    next_use: Option<NextUseTable>,
    position: usize,
}

impl Simulator {
    /// Creates a simulator that sees accesses one at a time.
    ///
    /// The Optimal policy has no future to look at in this mode and degrades
    /// to LRU; a warning is logged.
    pub fn new(geometry: &HierarchyGeometry) -> Self {
        if geometry.replacement() == ReplacementPolicy::Optimal {
            warn!("OPTIMAL replacement without look-ahead; victims are chosen as under LRU");
        }
        Self::build(geometry, None)
    }

    /// Creates a simulator that knows the whole trace in advance.
    ///
    /// `records` must be the trace later replayed through [`Simulator::run`] or
    /// [`Simulator::access`], in the same order.
    pub fn with_lookahead(geometry: &HierarchyGeometry, records: &[TraceRecord]) -> Self {
        let offset_bits = geometry.block_size().trailing_zeros();
        let table = NextUseTable::new(
            records
                .iter()
                .map(|r| r.addr.checked_shr(offset_bits).unwrap_or(0)),
        );
        Self::build(geometry, Some(table))
    }

    fn build(geometry: &HierarchyGeometry, next_use: Option<NextUseTable>) -> Self {
        let hierarchy = CacheHierarchy::new(geometry);
        let stats = SimStats::new(hierarchy.depth());
        Self {
            hierarchy,
            stats,
            next_use,
            position: 0,
        }
    }

    /// Simulates one access.
    pub fn access(&mut self, op: AccessType, addr: u64) -> AccessOutcome {
        let lookahead = Lookahead {
            position: self.position,
            table: self.next_use.as_ref(),
        };
        let outcome = self
            .hierarchy
            .access(op, addr, lookahead, &mut self.stats);
        self.position += 1;
        outcome
    }

    /// Simulates every record in order.
    pub fn run(&mut self, records: impl IntoIterator<Item = TraceRecord>) {
        for record in records {
            let _ = self.access(record.op, record.addr);
        }
    }

    /// Accumulated statistics.
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Consumes the simulator, keeping its statistics.
    pub fn into_stats(self) -> SimStats {
        self.stats
    }

    /// Cache hierarchy in its current state.
    pub fn hierarchy(&self) -> &CacheHierarchy {
        &self.hierarchy
    }

    /// Number of accesses simulated so far.
    pub const fn position(&self) -> usize {
        self.position
    }
}
