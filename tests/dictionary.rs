use cuckoo_dict::{DictError, Dictionary, DictionaryConfig, Hashable, BUCKET_CAPACITY};
use test_log::test;

fn seeded<K: cuckoo_dict::DictKey, V>(capacity: usize, seed: u64) -> Dictionary<K, V> {
    Dictionary::with_config(
        DictionaryConfig::default()
            .with_capacity(capacity)
            .with_seed(seed),
    )
    .expect("valid config")
}

#[test]
fn default_table_size_is_power_of_two() {
    let d: Dictionary<String, i32> = Dictionary::new();
    assert!(d.table_size().is_power_of_two());
    assert!(d.is_empty());
}

#[test]
fn requested_capacity_rounds_to_next_power_of_two() {
    for n in 0..600usize {
        let d: Dictionary<u32, ()> = Dictionary::with_capacity(n);
        let size = d.table_size();
        assert!(size.is_power_of_two());
        assert!(size >= n.max(1));
        assert!(size / 2 < n.max(1), "{size} is not the smallest power >= {n}");
    }
}

#[test]
fn small_table_holds_permuted_keys() {
    let mut d = seeded(2, 17);
    assert_eq!(d.table_size(), 2);
    d.insert("bob", 3).unwrap();
    d.insert("bbo", 5).unwrap();
    d.insert("obb", 2).unwrap();
    assert_eq!(d.len(), 3);
    assert_eq!(d.get("bob"), Some(&3));
    assert_eq!(d.get("bbo"), Some(&5));
    assert_eq!(d.get("obb"), Some(&2));
}

#[test]
fn get_missing_returns_none() {
    let mut d = Dictionary::new();
    d.insert("bob".to_string(), 3).unwrap();
    assert_eq!(d.get("obb"), None);
}

#[test]
fn remove_existing_and_missing() {
    let mut d = Dictionary::new();
    d.insert("bob".to_string(), 5).unwrap();
    let before = d.len();
    assert_eq!(d.remove("bob"), Ok(5));
    assert_eq!(d.len(), before - 1);

    d.insert("bob".to_string(), 5).unwrap();
    let err = d.remove("obb").unwrap_err();
    assert_eq!(err, DictError::KeyNotFound);
    assert_eq!(err.to_string(), "key not found");
    assert_eq!(d.len(), 1);
}

#[test]
fn duplicate_key_keeps_size_and_takes_second_value() {
    let mut d = seeded(8, 3);
    d.insert(10u64, "first").unwrap();
    let size = d.len();
    assert_eq!(d.insert(10u64, "second").unwrap(), Some("first"));
    assert_eq!(d.len(), size);
    assert_eq!(d.get(&10), Some(&"second"));
}

#[test]
fn size_accounting_after_inserts_and_removes() {
    let mut d = seeded(4, 5);
    let n = 1500i64;
    for i in 0..n {
        d.insert(i, i).unwrap();
    }
    let mut removed = 0;
    for i in (0..n).step_by(3) {
        d.remove(&i).unwrap();
        removed += 1;
    }
    assert_eq!(d.len() as i64, n - removed);
    for i in 0..n {
        assert_eq!(d.contains_key(&i), i % 3 != 0);
    }
}

#[test]
fn keys_survive_repeated_growth() {
    let mut d = seeded(1, 11);
    let keys: Vec<String> = (0..5000).map(|i| format!("k{:016x}", i * 7919)).collect();
    for (i, k) in keys.iter().enumerate() {
        d.insert(k.clone(), i).unwrap();
        assert_eq!(d.get(k.as_str()), Some(&i));
    }
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(d.get(k.as_str()), Some(&i), "lost {k}");
    }
    let stats = d.stats();
    assert_eq!(stats.len, 5000);
    assert!(stats.resizes > 0);
    assert!(stats.len <= stats.capacity);
    assert_eq!(stats.capacity, 2 * stats.table_size * BUCKET_CAPACITY);
}

#[test]
fn mixed_width_integer_keys() {
    let mut d: Dictionary<i32, i32> = seeded(1, 23);
    for i in -500..500 {
        d.insert(i, -i).unwrap();
    }
    for i in -500..500 {
        assert_eq!(d.get(&i), Some(&-i));
    }
    let mut e: Dictionary<u64, ()> = seeded(1, 29);
    for shift in 0..64 {
        e.insert(1u64 << shift, ()).unwrap();
    }
    assert_eq!(e.len(), 64);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Coord {
    x: i32,
    y: i32,
}

impl Hashable for Coord {
    fn hash_code(&self) -> u64 {
        ((self.x as u32 as u64) << 32) | self.y as u32 as u64
    }
}

#[test]
fn hashable_keys_round_trip() {
    let mut d = seeded(4, 31);
    for x in -20..20 {
        for y in -20..20 {
            d.insert(Coord { x, y }, x * y).unwrap();
        }
    }
    assert_eq!(d.len(), 1600);
    assert_eq!(d.get(&Coord { x: -3, y: 7 }), Some(&-21));
    assert_eq!(d.remove(&Coord { x: 0, y: 0 }), Ok(0));
    assert!(d.get(&Coord { x: 0, y: 0 }).is_none());
}

#[test]
fn explicit_rehash_and_reserve() {
    let mut d = seeded(64, 37);
    for i in 0..100u32 {
        d.insert(i, i).unwrap();
    }
    let generation = d.stats().generation;
    d.rehash().unwrap();
    assert_eq!(d.stats().generation, generation + 1);
    d.reserve(10_000).unwrap();
    assert!(d.capacity() >= 10_100);
    for i in 0..100u32 {
        assert_eq!(d.get(&i), Some(&i));
    }
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = DictionaryConfig::default().with_max_load_factor(1.5);
    let err = Dictionary::<u32, u32>::with_config(cfg).unwrap_err();
    assert!(matches!(err, DictError::InvalidConfig { .. }));
}

#[test]
fn debug_prints_as_map() {
    let mut d = seeded(1, 41);
    d.insert(1u32, "one").unwrap();
    assert_eq!(format!("{d:?}"), r#"{1: "one"}"#);
}

#[test]
fn into_iterator_for_references() {
    let mut d = seeded(4, 43);
    for i in 0..10u32 {
        d.insert(i, i).unwrap();
    }
    for (_, v) in &mut d {
        *v += 1;
    }
    let total: u32 = (&d).into_iter().map(|(_, v)| *v).sum();
    assert_eq!(total, (1..=10).sum());
}
