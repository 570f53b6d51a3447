use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use edgesim_core::router::SchedulerKind;
use edgesim_core::{CacheStore, EvictionPolicy, Position, Request, Simulation, SimulationConfig};

const POLICIES: [EvictionPolicy; 5] = [
    EvictionPolicy::FIFO,
    EvictionPolicy::LRU,
    EvictionPolicy::LFU,
    EvictionPolicy::ARC,
    EvictionPolicy::Random,
];

fn catalog(size: usize) -> Vec<String> {
    (0..size).map(|i| format!("item{}", i)).collect()
}

// Skewed workload: low ids are requested far more often
fn workload(len: usize, catalog_size: usize, seed: u64) -> Vec<Request> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..len)
        .map(|i| {
            let a = rng.usize(..catalog_size);
            let b = rng.usize(..catalog_size);
            let position = Position::new(rng.f64() * 5000.0, rng.f64() * 5000.0);
            Request::new(format!("user{}", i % 50), format!("item{}", a.min(b)), position)
        })
        .collect()
}

fn edge_positions(count: usize) -> Vec<Position> {
    (0..count)
        .map(|i| Position::new((i % 4) as f64 * 1250.0, (i / 4) as f64 * 1250.0))
        .collect()
}

fn bench_policy_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_access");
    let keys = catalog(1000);

    for policy in POLICIES {
        group.bench_with_input(
            BenchmarkId::new(policy.as_str(), 100),
            &policy,
            |b, &policy| {
                b.iter(|| {
                    let mut store = CacheStore::with_seed(policy, 100, Some(7)).unwrap();
                    for i in 0..keys.len() {
                        // Stride over the catalog so some keys repeat
                        let key = &keys[(i * 31) % 300];
                        if !store.access(key) {
                            store.add(black_box(key));
                        }
                    }
                    store.len()
                });
            },
        );
    }

    group.finish();
}

fn bench_resolve_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_sequential");
    let requests = workload(2000, 500, 42);

    for scheduler in [
        SchedulerKind::DistanceAdaptive,
        SchedulerKind::Nearest,
        SchedulerKind::RoundRobin,
    ] {
        group.bench_function(scheduler.as_str(), |b| {
            b.iter(|| {
                let config = SimulationConfig {
                    capacity: 50,
                    scheduler,
                    seed: Some(1),
                    ..Default::default()
                };
                let sim =
                    Simulation::build(&config, catalog(500), &edge_positions(8), catalog(10))
                        .unwrap();
                black_box(sim.run(requests.clone()))
            });
        });
    }

    group.finish();
}

fn bench_resolve_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_parallel");

    for nodes in [4, 16].iter() {
        let requests = workload(4000, 500, 7);
        group.bench_with_input(BenchmarkId::new("LRU", nodes), nodes, |b, &nodes| {
            b.iter(|| {
                let config = SimulationConfig {
                    capacity: 50,
                    seed: Some(3),
                    ..Default::default()
                };
                let sim = Simulation::build(
                    &config,
                    catalog(500),
                    &edge_positions(nodes),
                    Vec::<String>::new(),
                )
                .unwrap();
                black_box(sim.run_parallel(&requests))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_policy_access,
    bench_resolve_sequential,
    bench_resolve_parallel
);
criterion_main!(benches);
