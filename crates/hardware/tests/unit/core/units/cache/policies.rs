//! Cache Replacement Policy Tests.
//!
//! Verifies the victim selection logic for LRU, FIFO and Optimal.
//! Each policy implements `ReplacementPolicy` with `update(set, pos)` and
//! `get_victim(set, ctx) -> usize`. Tests exercise them on hand-built sets.
//!
//! Sets are ordered newest first, so in every scenario below the block just
//! filled sits at position 0 and the oldest block at the back.

use cachesim_core::common::AddressDecoder;
use cachesim_core::core::units::cache::Block;
use cachesim_core::core::units::cache::policies::{
    FifoPolicy, Lookahead, LruPolicy, NextUseTable, OptimalPolicy, ReplacementPolicy,
    VictimContext,
};
use cachesim_core::core::units::cache::set::CacheSet;

/// Single-set decoder, so a block's number equals its tag.
fn decoder() -> AddressDecoder {
    AddressDecoder::new(16, 1).expect("valid geometry")
}

/// Capacity-4 set filled with tags 1..=4 (4 newest).
fn full_set() -> CacheSet {
    let mut set = CacheSet::new(4);
    for t in 1..=4 {
        set.push_newest(Block::new(t, 0, false));
    }
    set
}

fn tags(set: &CacheSet) -> Vec<u64> {
    set.iter().map(|b| b.tag).collect()
}

fn victim_tag(policy: &mut dyn ReplacementPolicy, set: &CacheSet, lookahead: Lookahead<'_>) -> u64 {
    let dec = decoder();
    let ctx = VictimContext {
        decoder: &dec,
        lookahead,
    };
    let pos = policy.get_victim(set, &ctx);
    assert!(pos >= 1, "the block just filled must never be the victim");
    set.get(pos).map(|b| b.tag).expect("victim position in range")
}

// ══════════════════════════════════════════════════════════
// 1. LRU Policy
// ══════════════════════════════════════════════════════════

/// k+1 distinct tags in a k-way set evict exactly the first one.
#[test]
fn lru_evicts_first_accessed() {
    let mut set = full_set();
    set.push_newest(Block::new(5, 0, false));
    assert_eq!(victim_tag(&mut LruPolicy::new(), &set, Lookahead::default()), 1);
}

/// A hit promotes the block to the MRU end; the next-oldest becomes the victim.
#[test]
fn lru_hit_reorders() {
    let mut policy = LruPolicy::new();
    let mut set = full_set();

    let pos = set.position(1).expect("tag 1 resident");
    policy.update(&mut set, pos);
    assert_eq!(tags(&set), vec![1, 4, 3, 2]);

    set.push_newest(Block::new(5, 0, false));
    assert_eq!(victim_tag(&mut policy, &set, Lookahead::default()), 2);
}

// ══════════════════════════════════════════════════════════
// 2. FIFO Policy
// ══════════════════════════════════════════════════════════

/// Repeated hits never change the order; the first insertion is evicted.
#[test]
fn fifo_hits_are_order_neutral() {
    let mut policy = FifoPolicy::new();
    let mut set = full_set();

    for _ in 0..3 {
        let pos = set.position(1).expect("tag 1 resident");
        policy.update(&mut set, pos);
    }
    assert_eq!(tags(&set), vec![4, 3, 2, 1]);

    set.push_newest(Block::new(5, 0, false));
    assert_eq!(victim_tag(&mut policy, &set, Lookahead::default()), 1);
}

// ══════════════════════════════════════════════════════════
// 3. Optimal Policy
// ══════════════════════════════════════════════════════════

/// Trace of block numbers where only positions 11..=13 matter.
fn future(uses: &[(usize, u64)]) -> NextUseTable {
    let mut blocks = vec![99u64; 14];
    for &(pos, block) in uses {
        blocks[pos] = block;
    }
    NextUseTable::new(blocks)
}

/// A block never used again is evicted before any block with a future use.
#[test]
fn optimal_prefers_never_used() {
    let table = future(&[(11, 2), (12, 1), (13, 4)]);
    let mut set = full_set();
    set.push_newest(Block::new(5, 0, false));

    let lookahead = Lookahead {
        position: 10,
        table: Some(&table),
    };
    assert_eq!(victim_tag(&mut OptimalPolicy::new(), &set, lookahead), 3);
}

/// With every block used again, the furthest next use loses.
#[test]
fn optimal_evicts_furthest_next_use() {
    let table = future(&[(11, 2), (12, 1), (13, 4), (10, 3)]);
    let mut set = full_set();
    set.push_newest(Block::new(5, 0, false));

    let lookahead = Lookahead {
        position: 10,
        table: Some(&table),
    };
    assert_eq!(victim_tag(&mut OptimalPolicy::new(), &set, lookahead), 4);
}

/// Equal next use (here: none) goes to the block nearest the old end.
#[test]
fn optimal_ties_go_to_oldest() {
    let table = future(&[(11, 2), (13, 4)]);
    let mut set = full_set();
    set.push_newest(Block::new(5, 0, false));

    let lookahead = Lookahead {
        position: 10,
        table: Some(&table),
    };
    assert_eq!(victim_tag(&mut OptimalPolicy::new(), &set, lookahead), 1);
}

/// The block being filled is protected even if it is never used again.
#[test]
fn optimal_never_evicts_new_block() {
    let table = future(&[(10, 1), (11, 2), (12, 3), (13, 4)]);
    let mut set = full_set();
    set.push_newest(Block::new(5, 0, false));

    let lookahead = Lookahead {
        position: 10,
        table: Some(&table),
    };
    assert_eq!(victim_tag(&mut OptimalPolicy::new(), &set, lookahead), 4);
}

/// Without a next-use table the policy behaves as LRU.
#[test]
fn optimal_without_table_is_lru() {
    let mut policy = OptimalPolicy::new();
    let mut set = full_set();
    let pos = set.position(1).expect("tag 1 resident");
    policy.update(&mut set, pos);
    set.push_newest(Block::new(5, 0, false));
    assert_eq!(victim_tag(&mut policy, &set, Lookahead::default()), 2);
}

#[test]
fn next_use_table_lookup() {
    let table = NextUseTable::new([7, 8, 7, 9, 7]);
    assert_eq!(table.next_use(7, 0), Some(0));
    assert_eq!(table.next_use(7, 1), Some(2));
    assert_eq!(table.next_use(7, 3), Some(4));
    assert_eq!(table.next_use(8, 2), None);
    assert_eq!(table.next_use(42, 0), None);
    assert_eq!(table.distinct_blocks(), 3);
}
