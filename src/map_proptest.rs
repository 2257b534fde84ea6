#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// bucket-level invariants alongside the public behavior.

use crate::key_ops::KeyOps;
use crate::map::{ChainedHashMap, PutResult};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::ops::ControlFlow;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    Mutate(usize, i32),
    Contains(String),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            12 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            4 => idx.clone().prop_map(OpI::Remove),
            4 => idx.clone().prop_map(OpI::Get),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            2 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            2 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Collaborator whose digest ignores the key entirely.
struct ConstHash;

impl KeyOps<String> for ConstHash {
    fn hash(&self, _key: &String) -> i32 {
        0
    }
    fn equals(&self, a: &String, b: &String) -> bool {
        a == b
    }
}

/// Drive `sut` through `ops`, mirroring each step into a `HashMap` model.
///
/// Invariants exercised after every operation:
/// - `put` reports `Inserted` iff the model lacked the key, else the model's
///   previous value.
/// - `get`/`contains_key`/`remove` agree with the model.
/// - `for_each` enumerates exactly the model's entries; `len` matches.
/// - Bucket count is a power of two and, below the ceiling, at most one
///   entry over three quarters load.
fn run_state_machine<O: KeyOps<String>>(
    mut sut: ChainedHashMap<String, i32, O>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = pool[i].clone();
                let expected = model.insert(k.clone(), v);
                match sut.put(k, v) {
                    PutResult::Inserted => prop_assert!(expected.is_none()),
                    PutResult::Replaced { previous } => prop_assert_eq!(Some(previous), expected),
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                prop_assert!(sut.get(k).is_none());
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Some(s), Some(m)) => {
                        *s = s.wrapping_add(d);
                        *m = m.wrapping_add(d);
                    }
                    (None, None) => {}
                    (s, m) => prop_assert!(false, "get_mut disagreement: {:?} vs {:?}", s, m),
                }
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Iterate => {
                let mut seen = BTreeMap::new();
                let _ = sut.for_each(|k, v| {
                    seen.insert(k.clone(), *v);
                    ControlFlow::Continue(())
                });
                let expected: BTreeMap<_, _> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(seen, expected);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.iter().count(), model.len());
        let buckets = sut.bucket_count();
        prop_assert!(buckets.is_power_of_two());
        if buckets < crate::MAX_BUCKETS {
            prop_assert!(sut.len() <= buckets * 3 / 4 + 1);
        }
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(ChainedHashMap::new(), pool, ops)?;
    }
}

// Property: same invariants under worst-case collisions. Every key shares a
// digest, so matching relies on the equality predicate alone.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine(ChainedHashMap::with_key_ops(ConstHash), pool, ops)?;
    }
}

// Property: the entry set survives any number of growths, and the bucket
// count settles at the smallest power of two the 3/4 rule allows.
proptest! {
    #[test]
    fn prop_growth_preserves_entries(keys in proptest::collection::btree_set(any::<u32>(), 0..300)) {
        let mut m: ChainedHashMap<u32, u32> = ChainedHashMap::new();
        for &k in &keys {
            prop_assert_eq!(m.put(k, k ^ 0xa5a5), PutResult::Inserted);
        }
        let got: BTreeMap<u32, u32> = m.iter().map(|(k, v)| (*k, *v)).collect();
        let want: BTreeMap<u32, u32> = keys.iter().map(|&k| (k, k ^ 0xa5a5)).collect();
        prop_assert_eq!(got, want);

        let mut buckets = 1usize;
        for n in 0..keys.len() {
            if n > buckets * 3 / 4 {
                buckets *= 2;
            }
        }
        prop_assert_eq!(m.bucket_count(), buckets);
    }
}
