//! Cache Level Unit Tests.
//!
//! Verifies a single `CacheLevel` in isolation: hit detection, dirty marking,
//! fills with victim selection, and removal on behalf of inclusion handling.
//!
//! The level is built directly from a validated geometry; no hierarchy needed.

use cachesim_core::common::AccessType;
use cachesim_core::config::{InclusionPolicy, LevelGeometry, ReplacementPolicy};
use cachesim_core::core::units::cache::CacheLevel;
use cachesim_core::core::units::cache::policies::Lookahead;

use crate::common::harness::geometry;

/// One level of `size` bytes with 16-byte blocks.
///
/// With size 32 and 2 ways there is a single set, so 0x00, 0x10 and 0x20 all
/// collide with tags 0, 1 and 2.
fn level_geometry(size: u64, associativity: u64) -> LevelGeometry {
    geometry(
        16,
        &[(size, associativity)],
        ReplacementPolicy::Lru,
        InclusionPolicy::NonInclusive,
    )
    .levels()[0]
}

fn level(policy: ReplacementPolicy) -> CacheLevel {
    CacheLevel::new(&level_geometry(32, 2), policy)
}

#[test]
fn cold_access_misses() {
    let mut cache = level(ReplacementPolicy::Lru);
    assert!(!cache.touch(0x0, AccessType::Read));
    assert!(!cache.contains(0x0));
    assert_eq!(cache.valid_count(), 0);
}

#[test]
fn installed_block_hits() {
    let mut cache = level(ReplacementPolicy::Lru);
    assert!(cache.install(0x4, false, Lookahead::default()).is_none());
    // Any byte of the block hits.
    assert!(cache.touch(0xc, AccessType::Read));
    assert!(cache.contains(0x0));
}

#[test]
fn write_hit_marks_dirty() {
    let mut cache = level(ReplacementPolicy::Lru);
    let _ = cache.install(0x0, false, Lookahead::default());
    assert!(cache.touch(0x0, AccessType::Write));
    assert!(cache.lookup(0x0).is_some_and(|b| b.dirty));
    // A later read hit keeps the flag.
    assert!(cache.touch(0x0, AccessType::Read));
    assert!(cache.lookup(0x0).is_some_and(|b| b.dirty));
}

#[test]
fn full_set_returns_lru_victim() {
    let mut cache = level(ReplacementPolicy::Lru);
    let _ = cache.install(0x00, true, Lookahead::default());
    let _ = cache.install(0x10, false, Lookahead::default());

    let victim = cache
        .install(0x20, false, Lookahead::default())
        .expect("set is full");
    assert_eq!(victim.tag, 0);
    assert!(victim.dirty);
    assert_eq!(cache.block_addr(&victim), 0x00);
    assert!(!cache.contains(0x00));
    assert!(cache.contains(0x10) && cache.contains(0x20));
}

#[test]
fn fifo_ignores_hits_when_evicting() {
    let mut cache = level(ReplacementPolicy::Fifo);
    let _ = cache.install(0x00, false, Lookahead::default());
    let _ = cache.install(0x10, false, Lookahead::default());
    assert!(cache.touch(0x00, AccessType::Read));

    let victim = cache
        .install(0x20, false, Lookahead::default())
        .expect("set is full");
    assert_eq!(victim.tag, 0);
}

#[test]
fn reinstall_merges_dirty_without_eviction() {
    let mut cache = level(ReplacementPolicy::Lru);
    let _ = cache.install(0x00, false, Lookahead::default());
    let _ = cache.install(0x10, false, Lookahead::default());

    assert!(cache.install(0x00, true, Lookahead::default()).is_none());
    assert!(cache.lookup(0x00).is_some_and(|b| b.dirty));
    assert!(cache.install(0x00, false, Lookahead::default()).is_none());
    assert!(cache.lookup(0x00).is_some_and(|b| b.dirty));
    assert_eq!(cache.valid_count(), 2);
}

#[test]
fn invalidated_slot_is_reclaimed_on_next_fill() {
    let mut cache = level(ReplacementPolicy::Lru);
    let _ = cache.install(0x00, false, Lookahead::default());
    let _ = cache.install(0x10, false, Lookahead::default());

    assert!(cache.invalidate(0x00).is_some());
    assert!(!cache.contains(0x00));
    assert_eq!(cache.sets()[0].len(), 2);

    // The invalid slot absorbs the fill; nothing valid is evicted.
    assert!(cache.install(0x20, false, Lookahead::default()).is_none());
    assert_eq!(cache.sets()[0].len(), 2);
    assert!(cache.contains(0x10) && cache.contains(0x20));
}

#[test]
fn take_removes_outright() {
    let mut cache = level(ReplacementPolicy::Lru);
    let _ = cache.install(0x10, true, Lookahead::default());
    let taken = cache.take(0x10).expect("block resident");
    assert!(taken.dirty);
    assert!(cache.sets()[0].is_empty());
    assert!(cache.take(0x10).is_none());
}

#[test]
fn block_addr_reassembles_across_sets() {
    // 4 sets of 2 ways.
    let mut cache = CacheLevel::new(&level_geometry(128, 2), ReplacementPolicy::Lru);
    let _ = cache.install(0x1234, false, Lookahead::default());
    let block = cache.lookup(0x1234).expect("block resident").clone();
    assert_eq!(block.set_index, 3);
    assert_eq!(cache.block_addr(&block), 0x1230);
    assert_eq!(cache.level(), 1);
    assert_eq!(cache.decoder().index_bits(), 2);
}
