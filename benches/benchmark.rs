use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use phylo2vec::newick::utils::remove_parent_labels;
use phylo2vec::{newick_to_vector, newick_to_vector_no_parents, vector_to_newick};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const TREE_SIZES: &[usize] = &[10, 100, 1_000, 5_000];

fn random_vector(rng: &mut StdRng, num_leaves: usize) -> Vec<usize> {
    (0..num_leaves - 1).map(|i| rng.gen_range(0..=2 * i)).collect()
}

fn decoding(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut group = c.benchmark_group("vector_to_newick");
    for &n in TREE_SIZES {
        let v = random_vector(&mut rng, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &v, |b, v| {
            b.iter(|| vector_to_newick(black_box(v)).unwrap());
        });
    }
    group.finish();
}

fn encoding(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut group = c.benchmark_group("newick_to_vector");
    for &n in TREE_SIZES {
        let newick = vector_to_newick(&random_vector(&mut rng, n)).unwrap();
        group.bench_with_input(BenchmarkId::new("parent_labels", n), &newick, |b, newick| {
            b.iter(|| newick_to_vector(black_box(newick)).unwrap());
        });

        let stripped = remove_parent_labels(&newick);
        group.bench_with_input(BenchmarkId::new("no_parent_labels", n), &stripped, |b, newick| {
            b.iter(|| newick_to_vector_no_parents(black_box(newick)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, decoding, encoding);
criterion_main!(benches);
