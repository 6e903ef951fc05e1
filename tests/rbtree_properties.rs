//! Invariant and lifecycle properties of `RBTree` over arbitrary insert and
//! erase sequences.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use fnv::FnvHashMap;
use proptest::prelude::*;
use rbmap::{Callbacks, RBTree};
use rstest::rstest;

const INSERT_ORDER: [u32; 32] = [31, 32, 21, 12, 25, 16, 9, 13, 11, 27, 26, 7, 5, 6, 28, 18, 17,
                                 22, 19, 29, 30, 2, 23, 15, 20, 3, 1, 10, 14, 8, 24, 4];
const ERASE_ORDER: [u32; 32] = [27, 32, 15, 19, 26, 1, 9, 22, 3, 21, 29, 28, 13, 23, 7, 11, 17,
                                31, 14, 5, 12, 4, 6, 20, 30, 10, 16, 18, 8, 25, 24, 2];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Reference counted fixtures
// =============================================================================

/// Live instances per id plus how often each id went through a release hook
#[derive(Default)]
struct Ledger {
    live: FnvHashMap<u32, usize>,
    tag_releases: FnvHashMap<u32, usize>,
    value_releases: FnvHashMap<u32, usize>,
}

type SharedLedger = Rc<RefCell<Ledger>>;

struct Tracked {
    id: u32,
    ledger: SharedLedger,
}

impl Tracked {
    fn new(id: u32, ledger: &SharedLedger) -> Self {
        *ledger.borrow_mut().live.entry(id).or_insert(0) += 1;
        Tracked { id, ledger: ledger.clone() }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        let mut ledger = self.ledger.borrow_mut();
        let gone = match ledger.live.get_mut(&self.id) {
            Some(n) => {
                *n -= 1;
                *n == 0
            }
            None => panic!("{} dropped twice", self.id),
        };
        if gone {
            ledger.live.remove(&self.id);
        }
    }
}

impl Ledger {
    fn live_count(&self) -> usize {
        self.live.values().sum()
    }

    fn total(counts: &FnvHashMap<u32, usize>) -> usize {
        counts.values().sum()
    }
}

/// Tags ordered by id; values carry a serial number so every overwritten
/// value is a distinct instance
fn tracked_map(ledger: &SharedLedger) -> RBTree<Tracked, Tracked> {
    let tags = ledger.clone();
    let values = ledger.clone();
    let cb = Callbacks::with_comparator(|a: &Tracked, b: &Tracked| a.id.cmp(&b.id))
        .on_release_tag(move |t: Tracked| {
            *tags.borrow_mut().tag_releases.entry(t.id).or_insert(0) += 1;
        })
        .on_release_value(move |v: Tracked| {
            *values.borrow_mut().value_releases.entry(v.id).or_insert(0) += 1;
        });
    RBTree::with_callbacks(cb)
}

fn key(id: u32, ledger: &SharedLedger) -> Tracked {
    Tracked::new(id, ledger)
}

// =============================================================================
// Fixed sequences
// =============================================================================

#[rstest]
#[case::ascending((1..=32).collect(), (1..=32).collect())]
#[case::descending((1..=32).rev().collect(), (1..=32).rev().collect())]
#[case::ascending_then_descending((1..=32).collect(), (1..=32).rev().collect())]
#[case::permutations(INSERT_ORDER.to_vec(), ERASE_ORDER.to_vec())]
fn test_check_after_every_operation(#[case] inserts: Vec<u32>, #[case] erases: Vec<u32>) {
    init_logging();
    let mut map = RBTree::new();
    for &tag in &inserts {
        assert!(map.insert(tag, tag * 10));
        map.check().unwrap_or_else(|v| panic!("after inserting {}: {}", tag, v));
    }
    assert_eq!(map.keys().cloned().collect::<Vec<_>>(), (1..=32).collect::<Vec<_>>());

    for &tag in &erases {
        assert!(map.erase_tag(&tag));
        map.check().unwrap_or_else(|v| panic!("after erasing {}: {}", tag, v));
    }
    assert!(map.is_empty());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(100)]
fn test_in_order_iteration_yields_every_tag_once(#[case] n: u32) {
    let map: RBTree<u32, u32> = (0..n).rev().map(|i| (i * 7 % (n.max(1)), i)).collect();
    let keys: Vec<u32> = map.keys().cloned().collect();
    assert_eq!(map.len(), n as usize);
    assert_eq!(keys.len(), map.len());
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_move_into_empty_map() {
    let ledger = SharedLedger::default();
    let mut src = tracked_map(&ledger);
    for &id in INSERT_ORDER.iter() {
        src.insert(key(id, &ledger), key(1000 + id, &ledger));
    }
    let before: Vec<u32> = src.keys().map(|k| k.id).collect();

    let mut dst = RBTree::with_callbacks(Callbacks::with_comparator(|a: &Tracked, b: &Tracked| {
        a.id.cmp(&b.id)
    }));
    dst.move_from(&mut src);

    assert_eq!(dst.len(), 32);
    assert_eq!(dst.keys().map(|k| k.id).collect::<Vec<_>>(), before);
    dst.check().unwrap();
    assert!(src.is_empty());
    assert!(src.front().tag().is_none());

    // dst now owns the hooks that count releases
    dst.clear();
    let l = ledger.borrow();
    assert_eq!(Ledger::total(&l.tag_releases), 32);
    assert_eq!(Ledger::total(&l.value_releases), 32);
    assert_eq!(l.live_count(), 0);
}

#[test]
fn test_drop_releases_everything() {
    let ledger = SharedLedger::default();
    {
        let mut map = tracked_map(&ledger);
        for id in 0..64 {
            map.insert(key(id, &ledger), key(id, &ledger));
        }
        assert_eq!(ledger.borrow().live_count(), 128);
    }
    let l = ledger.borrow();
    assert_eq!(l.live_count(), 0);
    assert!(l.tag_releases.values().all(|&n| n == 1));
    assert!(l.value_releases.values().all(|&n| n == 1));
    assert_eq!(l.tag_releases.len(), 64);
}

// =============================================================================
// Properties
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, u16),
    Erase(u8),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<u8>(), any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => any::<u8>().prop_map(Op::Erase),
    ]
}

proptest! {
    #[test]
    fn prop_invariants_hold_after_every_operation(ops in prop::collection::vec(arbitrary_op(), 0..400)) {
        let mut map = RBTree::new();
        let mut model = BTreeMap::new();
        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(map.insert(k, v), model.insert(k, v).is_none());
                }
                Op::Erase(k) => {
                    prop_assert_eq!(map.erase_tag(&k), model.remove(&k).is_some());
                }
            }
            prop_assert!(map.check().is_ok(), "{:?}", map.check());
            prop_assert_eq!(map.len(), model.len());
        }
        let ours: Vec<(u8, u16)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let theirs: Vec<(u8, u16)> = model.into_iter().collect();
        prop_assert_eq!(ours, theirs);
    }
}

proptest! {
    #[test]
    fn prop_duplicate_inserts_release_overwritten_values(tags in prop::collection::vec(0u32..32, 0..200)) {
        let ledger = SharedLedger::default();
        let mut map = tracked_map(&ledger);
        for (serial, &tag) in tags.iter().enumerate() {
            map.insert(key(tag, &ledger), key(10_000 + serial as u32, &ledger));
        }
        let distinct = tags.iter().collect::<BTreeSet<_>>().len();
        prop_assert_eq!(map.len(), distinct);
        prop_assert_eq!(Ledger::total(&ledger.borrow().value_releases), tags.len() - distinct);
        prop_assert_eq!(Ledger::total(&ledger.borrow().tag_releases), tags.len() - distinct);

        map.clear();
        let l = ledger.borrow();
        prop_assert_eq!(Ledger::total(&l.value_releases), tags.len());
        prop_assert!(l.value_releases.values().all(|&n| n == 1));
        prop_assert_eq!(l.live_count(), 0);
    }
}

proptest! {
    #[test]
    fn prop_erasing_every_tag_drains_the_map(
        order in Just((0u32..64).collect::<Vec<_>>()).prop_shuffle(),
        erase_order in Just((0u32..64).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let ledger = SharedLedger::default();
        let mut map = tracked_map(&ledger);
        for &id in &order {
            prop_assert!(map.insert(key(id, &ledger), key(id, &ledger)));
        }
        for (n, &id) in erase_order.iter().enumerate() {
            let pos = map.find(&key(id, &ledger)).position();
            prop_assert!(pos.is_some());
            prop_assert!(map.erase(pos.unwrap()));
            prop_assert_eq!(map.len(), 63 - n);
            prop_assert!(map.check().is_ok());
        }
        let l = ledger.borrow();
        prop_assert_eq!(l.tag_releases.len(), 64);
        prop_assert!(l.tag_releases.values().all(|&n| n == 1));
        prop_assert!(l.value_releases.values().all(|&n| n == 1));
        prop_assert_eq!(l.live_count(), 0);
    }
}

proptest! {
    #[test]
    fn prop_cursor_walks_match_iteration(tags in prop::collection::btree_set(any::<i16>(), 0..100)) {
        let map: RBTree<i16, ()> = tags.iter().map(|&t| (t, ())).collect();

        let mut forward = vec![];
        let mut cursor = map.front();
        while let Some(t) = cursor.tag() {
            forward.push(*t);
            cursor.move_next();
        }
        let mut backward = vec![];
        let mut cursor = map.back();
        while let Some(t) = cursor.tag() {
            backward.push(*t);
            cursor.move_prev();
        }
        backward.reverse();

        let expected: Vec<i16> = tags.into_iter().collect();
        prop_assert_eq!(&forward, &expected);
        prop_assert_eq!(&backward, &expected);
    }
}
