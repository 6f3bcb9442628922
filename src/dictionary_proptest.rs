#![cfg(test)]

// Property tests for Dictionary kept inside the crate so they can check the
// structural invariants that the public API does not expose.

use crate::config::DictionaryConfig;
use crate::dictionary::Dictionary;
use crate::error::DictError;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations shrink toward earlier keys and shorter programs.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Mutate(usize, i32),
    Rehash,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,9}", 1..=40).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Rehash),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: state-machine equivalence against std::collections::HashMap.
// - insert returns the previous value and updates duplicates in place.
// - get/remove agree with the model; misses never change len.
// - len matches the model after every step.
// - every entry stays in its candidate bucket under the live hash family,
//   including across growth and explicit rehashes.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), seed in any::<u64>()) {
        let cfg = DictionaryConfig::default().with_capacity(1).with_seed(seed);
        let mut sut: Dictionary<String, i32> = Dictionary::with_config(cfg).unwrap();
        let mut model: HashMap<String, i32> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(i, v) => {
                    let k = pool[i].clone();
                    let prev = sut.insert(k.clone(), v).expect("insert");
                    prop_assert_eq!(prev, model.insert(k, v));
                }
                Op::Remove(i) => {
                    let k = &pool[i];
                    match model.remove(k) {
                        Some(v) => {
                            prop_assert_eq!(sut.remove(k.as_str()), Ok(v));
                        }
                        None => {
                            let before = sut.len();
                            prop_assert_eq!(sut.remove(k.as_str()), Err(DictError::KeyNotFound));
                            prop_assert_eq!(sut.len(), before);
                        }
                    }
                }
                Op::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.get(k.as_str()), model.get(k));
                    prop_assert_eq!(sut.contains_key(k.as_str()), model.contains_key(k));
                }
                Op::Mutate(i, d) => {
                    let k = &pool[i];
                    if let Some(v) = sut.get_mut(k.as_str()) {
                        *v = v.wrapping_add(d);
                    }
                    if let Some(v) = model.get_mut(k) {
                        *v = v.wrapping_add(d);
                    }
                }
                Op::Rehash => {
                    sut.rehash().expect("rehash");
                }
                Op::Iterate => {
                    let seen: BTreeSet<(String, i32)> =
                        sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    let expected: BTreeSet<(String, i32)> =
                        model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    prop_assert_eq!(seen, expected);
                }
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert!(sut.table_size().is_power_of_two());
            sut.assert_invariants();
        }

        for (k, v) in &model {
            prop_assert_eq!(sut.get(k.as_str()), Some(v));
        }
    }
}

// Property: integer keys inserted past the initial capacity all remain
// retrievable at every step, and len counts unique keys.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_no_false_negatives(keys in proptest::collection::vec(any::<u64>(), 1..400), cap in 1usize..16) {
        let cfg = DictionaryConfig::default().with_capacity(cap).with_seed(7);
        let mut sut: Dictionary<u64, usize> = Dictionary::with_config(cfg).unwrap();
        let mut unique = BTreeSet::new();
        for (i, &k) in keys.iter().enumerate() {
            sut.insert(k, i).expect("insert");
            unique.insert(k);
            prop_assert_eq!(sut.len(), unique.len());
            prop_assert!(sut.get(&k).is_some());
        }
        for k in &unique {
            prop_assert!(sut.contains_key(k));
        }
        sut.assert_invariants();
    }
}
