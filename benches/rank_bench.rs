use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use probsim::search::rank;

// Simple LCG so the benchmark is reproducible without extra dependencies.
fn synthetic_rows(count: usize, dimension: usize) -> Vec<Vec<f32>> {
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    (0..count)
        .map(|_| {
            (0..dimension)
                .map(|_| {
                    state = state
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    ((state >> 33) as f32 / u32::MAX as f32) - 0.5
                })
                .collect()
        })
        .collect()
}

fn benchmark_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for &corpus_size in &[100usize, 1000, 5000] {
        let rows = synthetic_rows(corpus_size, 384);
        let query = rows[corpus_size / 2].clone();

        group.bench_with_input(
            BenchmarkId::from_parameter(corpus_size),
            &corpus_size,
            |b, _| {
                b.iter(|| black_box(rank(&query, &rows, 10)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_rank);
criterion_main!(benches);
