// ByteMap property tests.
//
// Property 1: model equivalence.
//  - Model: std HashMap<String, u32>.
//  - Operations: insert, delete, get, remove.
//  - Invariant after each step: len() matches the model, and every key of
//    the pool is present exactly when the model holds it, with the same value.
//  - Runs under every resize policy that may grow.
//
// Property 2: capacity bounds.
//  - Capacity is a power of two, never below MIN_CAPACITY, and the load
//    factor never reaches 0.75 after an insert.
//
// Property 3: case folding.
//  - With ignore_case set, keys differing only in ASCII case share an entry.
use std::collections::HashMap;

use proptest::prelude::*;
use robin_hash::ByteMap;
use robin_hash::Error;
use robin_hash::Key;
use robin_hash::MIN_CAPACITY;
use robin_hash::Ownership;
use robin_hash::ResizePolicy;
use robin_hash::Settings;

fn policy() -> impl Strategy<Value = ResizePolicy> {
    prop_oneof![Just(ResizePolicy::GrowOnly), Just(ResizePolicy::GrowAndShrink)]
}

fn ops() -> impl Strategy<Value = Vec<(u8, usize, u32)>> {
    proptest::collection::vec((0u8..4, 0usize..64, any::<u32>()), 1..400)
}

proptest! {
    #[test]
    fn prop_matches_std_hashmap(policy in policy(), ops in ops()) {
        let pool: Vec<String> = (0..64).map(|i| format!("key-{i}")).collect();
        let mut map = ByteMap::with_settings(Settings::default().with_resize(policy));
        let mut model: HashMap<&str, u32> = HashMap::new();

        for (op, k, v) in ops {
            let key = pool[k].as_str();
            match op {
                0 => {
                    prop_assert_eq!(map.insert(key.as_bytes(), v), Ok(model.insert(key, v)));
                }
                1 => {
                    let expected = model.remove(key).ok_or(Error::NotFound);
                    prop_assert_eq!(map.delete(key.as_bytes()), expected.map(Some));
                }
                2 => {
                    let expected = model.remove(key).ok_or(Error::NotFound);
                    prop_assert_eq!(map.remove(key.as_bytes()), expected);
                }
                3 => {
                    prop_assert_eq!(map.get(key.as_bytes()), model.get(key));
                }
                _ => unreachable!(),
            }
            prop_assert_eq!(map.len(), model.len());
        }

        for key in &pool {
            prop_assert_eq!(map.get(key.as_bytes()), model.get(key.as_str()));
        }
        prop_assert_eq!(map.iter().count(), model.len());
    }

    #[test]
    fn prop_capacity_bounds(policy in policy(), ops in ops()) {
        let mut map = ByteMap::with_settings(
            Settings::default()
                .with_resize(policy)
                .with_ownership(Ownership::KeyAndValue),
        );

        for (op, k, v) in ops {
            let key = format!("{k}");
            if op < 2 {
                map.insert_key(Key::Owned(key.as_bytes().into()), v).unwrap();
                prop_assert!(map.len() * 4 < map.capacity() * 3);
            } else {
                let _ = map.delete(key.as_bytes());
            }
            prop_assert!(map.capacity().is_power_of_two());
            prop_assert!(map.capacity() >= MIN_CAPACITY);
        }
    }

    #[test]
    fn prop_ignore_case_shares_entries(words in proptest::collection::vec("[a-zA-Z]{1,12}", 1..50)) {
        let mut map = ByteMap::with_settings(
            Settings::default()
                .with_ignore_case(true)
                .with_ownership(Ownership::KeyAndValue),
        );
        let mut model: HashMap<String, usize> = HashMap::new();

        for (i, word) in words.iter().enumerate() {
            map.insert(word.as_bytes(), i).unwrap();
            model.insert(word.to_ascii_lowercase(), i);
        }

        prop_assert_eq!(map.len(), model.len());
        for (word, i) in &model {
            prop_assert_eq!(map.get(word.to_ascii_uppercase().as_bytes()), Some(i));
        }
    }
}

#[cfg(feature = "stats")]
#[test]
fn histogram_counts_every_entry() {
    let keys: Vec<String> = (0..1000).map(|i| format!("stat-{i}")).collect();
    let mut map = ByteMap::new();
    for key in &keys {
        map.insert(key.as_bytes(), ()).unwrap();
    }

    let hist = map.probe_histogram();
    assert_eq!(hist.iter().sum::<usize>(), 1000);

    let stats = map.debug_stats();
    assert_eq!(stats.populated, 1000);
    assert_eq!(stats.capacity, 2048);
    assert_eq!(stats.max_probe_length, hist.len() - 1);
}
