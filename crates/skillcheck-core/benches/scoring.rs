use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skillcheck_core::scoring::score_steps;

fn bench_score_steps(c: &mut Criterion) {
    let mut scores: HashMap<usize, u8> = HashMap::new();
    for i in 0..50 {
        scores.insert(i, (i % 3) as u8);
    }

    c.bench_function("score_steps_50", |b| {
        b.iter(|| score_steps(black_box(&scores), black_box(50)))
    });

    let sparse: HashMap<usize, u8> = [(3, 2), (17, 1), (41, 2)].into_iter().collect();
    c.bench_function("score_steps_sparse", |b| {
        b.iter(|| score_steps(black_box(&sparse), black_box(50)))
    });
}

criterion_group!(benches, bench_score_steps);
criterion_main!(benches);
