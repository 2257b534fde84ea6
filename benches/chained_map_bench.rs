use chained_hashmap::ChainedHashMap;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::ops::ControlFlow;
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

// Stays below the growth ceiling: 3072 entries fit in 4096 buckets.
const N: usize = 3_000;

fn filled(seed: u64) -> (ChainedHashMap<String, u64>, Vec<String>) {
    let mut m = ChainedHashMap::new();
    let keys: Vec<_> = lcg(seed).take(N).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        let _ = m.put(k.clone(), i as u64);
    }
    (m, keys)
}

fn bench_put_fresh(c: &mut Criterion) {
    c.bench_function("chained::put_fresh_3k", |b| {
        b.iter_batched(
            || lcg(1).take(N).map(key).collect::<Vec<_>>(),
            |keys| {
                let mut m = ChainedHashMap::new();
                for (i, k) in keys.into_iter().enumerate() {
                    let _ = m.put(k, i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_put_overwrite(c: &mut Criterion) {
    c.bench_function("chained::put_overwrite_3k", |b| {
        b.iter_batched(
            || filled(2),
            |(mut m, keys)| {
                for (i, k) in keys.into_iter().enumerate() {
                    let _ = m.put(k, i as u64 + 1);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    let (m, keys) = filled(7);
    c.bench_function("chained::get_hit_3k", |b| {
        b.iter(|| {
            for k in &keys {
                black_box(m.get(k));
            }
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    let (m, _) = filled(11);
    let misses: Vec<_> = lcg(0xdead_beef).take(N).map(key).collect();
    c.bench_function("chained::get_miss_3k", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(m.get(k));
            }
        })
    });
}

fn bench_remove_all(c: &mut Criterion) {
    c.bench_function("chained::remove_all_3k", |b| {
        b.iter_batched(
            || filled(5),
            |(mut m, keys)| {
                for k in &keys {
                    black_box(m.remove(k));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_for_each(c: &mut Criterion) {
    let (m, _) = filled(13);
    c.bench_function("chained::for_each_3k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            let _ = m.for_each(|_, v| {
                sum = sum.wrapping_add(*v);
                ControlFlow::Continue(())
            });
            black_box(sum)
        })
    });
}

// Past the ceiling chains lengthen; this tracks how lookups degrade.
fn bench_get_hit_overloaded(c: &mut Criterion) {
    let mut m = ChainedHashMap::new();
    let keys: Vec<_> = lcg(17).take(N * 8).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        let _ = m.put(k.clone(), i as u64);
    }
    c.bench_function("chained::get_hit_24k_at_ceiling", |b| {
        b.iter(|| {
            for k in keys.iter().step_by(8) {
                black_box(m.get(k));
            }
        })
    });
}

fn config() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(3))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = config();
    targets = bench_put_fresh,
        bench_put_overwrite,
        bench_get_hit,
        bench_get_miss,
        bench_remove_all,
        bench_for_each,
        bench_get_hit_overloaded
}
criterion_main!(benches);
