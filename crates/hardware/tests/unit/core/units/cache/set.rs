//! Cache Set Tests.
//!
//! Verifies ordering, lookup by tag, removal, and the capacity invariant when
//! fills are paired with policy-driven eviction.

use cachesim_core::common::AddressDecoder;
use cachesim_core::core::units::cache::Block;
use cachesim_core::core::units::cache::policies::{
    Lookahead, LruPolicy, ReplacementPolicy, VictimContext,
};
use cachesim_core::core::units::cache::set::CacheSet;
use proptest::prelude::*;

fn tags(set: &CacheSet) -> Vec<u64> {
    set.iter().map(|b| b.tag).collect()
}

#[test]
fn position_skips_invalid_blocks() {
    let mut set = CacheSet::new(2);
    set.push_newest(Block::new(3, 0, false));
    assert_eq!(set.position(3), Some(0));
    let _ = set.invalidate(3);
    assert_eq!(set.position(3), None);
    assert!(!set.is_empty());
}

#[test]
fn take_removes_block() {
    let mut set = CacheSet::new(4);
    for t in [1, 2, 3] {
        set.push_newest(Block::new(t, 0, t == 2));
    }
    let taken = set.take(2).expect("tag 2 is resident");
    assert!(taken.dirty);
    assert_eq!(tags(&set), vec![3, 1]);
    assert!(set.take(2).is_none());
}

#[test]
fn get_mut_updates_dirty() {
    let mut set = CacheSet::new(1);
    set.push_newest(Block::new(9, 5, false));
    if let Some(block) = set.get_mut(0) {
        block.dirty = true;
    }
    assert_eq!(set.get(0), Some(&Block::new(9, 5, true)));
}

proptest! {
    #[test]
    fn fill_and_evict_never_exceeds_capacity(
        capacity in 1usize..8,
        stream in prop::collection::vec(0u64..16, 1..64),
    ) {
        let decoder = AddressDecoder::new(16, 1).expect("valid geometry");
        let mut policy = LruPolicy::new();
        let mut set = CacheSet::new(capacity);

        for tag in stream {
            if let Some(pos) = set.position(tag) {
                policy.update(&mut set, pos);
            } else {
                set.push_newest(Block::new(tag, 0, false));
                if set.is_over_capacity() {
                    let ctx = VictimContext { decoder: &decoder, lookahead: Lookahead::default() };
                    let victim = policy.get_victim(&set, &ctx);
                    prop_assert!(victim >= 1);
                    let _ = set.remove(victim);
                }
            }
            prop_assert!(set.len() <= capacity);
            prop_assert_eq!(set.get(0).map(|b| b.tag), Some(tag));

            let mut seen = tags(&set);
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), set.len());
        }
    }
}
