use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use cuckoo_dict::{Dictionary, DictionaryConfig};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn seeded<V>(capacity: usize) -> Dictionary<String, V> {
    Dictionary::with_config(DictionaryConfig::default().with_capacity(capacity).with_seed(1))
        .unwrap()
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("dictionary_insert_10k_growing", |b| {
        b.iter_batched(
            || seeded::<u64>(1),
            |mut d| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    d.insert(key(x), i as u64).unwrap();
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("dictionary_insert_10k_reserved", |b| {
        b.iter_batched(
            || {
                let mut d = seeded::<u64>(1);
                d.reserve(10_000).unwrap();
                d
            },
            |mut d| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    d.insert(key(x), i as u64).unwrap();
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("dictionary_get_hit", |b| {
        let mut d = seeded(1);
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            d.insert(k.clone(), i as u64).unwrap();
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(d.get(k.as_str()));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("dictionary_get_miss", |b| {
        let mut d = seeded(1);
        for (i, x) in lcg(11).take(10_000).enumerate() {
            d.insert(key(x), i as u64).unwrap();
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            let k = key(miss.next().unwrap());
            black_box(d.get(k.as_str()));
        })
    });
}

fn bench_int_keys(c: &mut Criterion) {
    c.bench_function("dictionary_u64_insert_remove", |b| {
        let mut d: Dictionary<u64, u64> =
            Dictionary::with_config(DictionaryConfig::default().with_seed(3)).unwrap();
        let mut it = lcg(5);
        b.iter(|| {
            let k = it.next().unwrap();
            d.insert(k, k).unwrap();
            black_box(d.remove(&k).unwrap());
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_get_hit, bench_get_miss, bench_int_keys
}
criterion_main!(benches);
