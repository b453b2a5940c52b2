// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_interaction::{
    Capacity, Interactable, InteractableConfig, InteractableFilter, InteractableRegistry,
    InteractorId,
};

fn populated(n: u32, config: InteractableConfig) -> InteractableRegistry<u32> {
    let mut registry = InteractableRegistry::new();
    for i in 0..n {
        let id = registry.insert(i, config);
        registry.enable(id).unwrap();
    }
    registry
}

fn bench_list_for(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_for");
    let me = InteractorId::next();
    for &n in &[64_u32, 1024, 16384] {
        let registry = populated(n, InteractableConfig::default());
        group.throughput(Throughput::Elements(u64::from(n)));
        group.bench_function(format!("unfiltered_n{n}"), |b| {
            b.iter(|| black_box(registry.list_for(me, &[]).count()));
        });

        let even: Vec<Box<dyn InteractableFilter<u32>>> =
            vec![Box::new(|it: &Interactable<u32>| it.data() % 2 == 0)];
        group.bench_function(format!("filtered_half_n{n}"), |b| {
            b.iter(|| black_box(registry.list_for(me, &even).count()));
        });
    }
    group.finish();
}

fn bench_capacity_pruning(c: &mut Criterion) {
    let mut group = c.benchmark_group("capacity");
    let n = 4096_u32;
    let single = InteractableConfig::limited(Capacity::Limited(1), Capacity::Limited(1));
    let mut registry = populated(n, single);
    // Every interactable is already held by someone else.
    let holder = InteractorId::next();
    let ids: Vec<_> = registry.list().to_vec();
    for id in &ids {
        if let Some(it) = registry.get_mut(*id) {
            it.add_interactor(holder);
        }
    }
    let me = InteractorId::next();
    group.throughput(Throughput::Elements(u64::from(n)));
    group.bench_function("all_full", |b| {
        b.iter(|| black_box(registry.list_for(me, &[]).count()));
    });
    group.bench_function("holder_sees_all", |b| {
        b.iter(|| black_box(registry.list_for(holder, &[]).count()));
    });
    group.finish();
}

fn bench_enable_disable(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");
    let n = 1024_u32;
    group.throughput(Throughput::Elements(u64::from(n)));
    group.bench_function("disable_enable_churn", |b| {
        b.iter_batched(
            || populated(n, InteractableConfig::default()),
            |mut registry| {
                let ids: Vec<_> = registry.list().to_vec();
                for id in ids.iter().step_by(2) {
                    registry.disable(*id).unwrap();
                }
                for id in ids.iter().step_by(2) {
                    registry.enable(*id).unwrap();
                }
                black_box(registry.list().len());
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("insert_remove_reuse", |b| {
        b.iter_batched(
            || populated(n, InteractableConfig::default()),
            |mut registry| {
                let ids: Vec<_> = registry.list().to_vec();
                for id in &ids {
                    black_box(registry.remove(*id).unwrap());
                }
                for i in 0..n {
                    black_box(registry.insert(i, InteractableConfig::default()));
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_list_for,
    bench_capacity_pruning,
    bench_enable_disable,
);
criterion_main!(benches);
