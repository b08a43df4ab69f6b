//! Criterion benchmarks for the u-evolve engine.
//!
//! Uses the built-in problems (OneMax, random euclidean tours) to measure
//! engine overhead: operators, evaluation barriers and bookkeeping.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_evolve::genotype::{GenotypeShape, PermutationDecoder, SegmentShape};
use u_evolve::problems::{Graph, InsertionDecoder, OneMax, TourLength};
use u_evolve::random::create_rng;
use u_evolve::{GaConfig, Objective, Scheduler};

fn bench_onemax(c: &mut Criterion) {
    let mut group = c.benchmark_group("onemax");
    group.sample_size(10);

    for (bits, pop, gen) in [(20usize, 50usize, 50usize), (100, 100, 30), (500, 100, 20)] {
        let config = GaConfig {
            population_size: pop,
            max_generations: gen,
            stagnation_limit: 0,
            seed: Some(42),
            ..GaConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new(format!("b{}_p{}_g{}", bits, pop, gen), bits),
            &config,
            |b, c| {
                b.iter(|| {
                    let mut scheduler =
                        Scheduler::standard(c.clone(), OneMax::shape(bits), OneMax).unwrap();
                    black_box(scheduler.run().unwrap())
                })
            },
        );
    }
    group.finish();
}

fn bench_tour(c: &mut Criterion) {
    let mut group = c.benchmark_group("tour");
    group.sample_size(10);

    for &n in &[20, 50] {
        let graph = Graph::random(n, 2, &mut create_rng(n as u64));
        let config = GaConfig::balanced()
            .with_objective(Objective::Minimize)
            .with_max_generations(30)
            .with_seed(42);

        group.bench_with_input(BenchmarkId::new("permutation", n), &graph, |b, g| {
            b.iter(|| {
                let eval = TourLength::new(g.clone(), PermutationDecoder);
                let shape = GenotypeShape::single(SegmentShape::permutation(n));
                let mut scheduler = Scheduler::standard(config.clone(), shape, eval).unwrap();
                black_box(scheduler.run().unwrap())
            })
        });
        group.bench_with_input(BenchmarkId::new("insertion", n), &graph, |b, g| {
            b.iter(|| {
                let eval = TourLength::new(g.clone(), InsertionDecoder);
                let shape = InsertionDecoder::integer_shape(n);
                let mut scheduler = Scheduler::standard(config.clone(), shape, eval).unwrap();
                black_box(scheduler.run().unwrap())
            })
        });
    }
    group.finish();
}

fn bench_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("onemax_workers");
    group.sample_size(10);

    for &workers in &[1usize, 4] {
        let config = GaConfig::default()
            .with_population_size(200)
            .with_max_generations(20)
            .with_workers(workers)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(workers), &config, |b, c| {
            b.iter(|| {
                let mut scheduler =
                    Scheduler::standard(c.clone(), OneMax::shape(200), OneMax).unwrap();
                black_box(scheduler.run().unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_onemax, bench_tour, bench_workers);
criterion_main!(benches);
