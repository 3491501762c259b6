use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use wordtree::WordTree;

const N: usize = 100_000;

pub fn benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let words: Vec<String> = (1..=N)
        .map(|_| format!("{:x}", rng.gen_range(0..N as u32 / 4)))
        .collect();

    c.bench_function("tree_insert", |b| {
        b.iter(|| {
            let mut tree = WordTree::new();
            for word in &words {
                tree.insert(word);
            }
            tree
        })
    });

    let tree: WordTree = words.iter().collect();

    c.bench_function("tree_count", |b| {
        b.iter(|| {
            for word in &words {
                black_box(tree.count(word));
            }
        })
    });

    c.bench_function("tree_iter", |b| {
        b.iter(|| {
            for (word, count) in &tree {
                black_box((word, count));
            }
        })
    });

    c.bench_function("tree_most_frequent", |b| {
        b.iter(|| black_box(tree.most_frequent()))
    });

    c.bench_function("tree_remove", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            for word in &words {
                tree.remove(word);
            }
            tree
        })
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
