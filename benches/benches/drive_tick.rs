// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_interaction::adapters::proximity::ProximityBehavior;
use understory_interaction::{
    Driver, InteractableConfig, InteractableRegistry, Interactor, InteractorGroup,
    InteractorGroupMulti, LeafInteractor, LowerScoreFirst, SharedRegistry,
};

fn knobs(n: usize) -> SharedRegistry<Point> {
    let registry = InteractableRegistry::shared();
    for i in 0..n {
        let x = (i % 32) as f64;
        let y = (i / 32) as f64;
        let id = registry
            .borrow_mut()
            .insert(Point::new(x, y), InteractableConfig::default());
        registry.borrow_mut().enable(id).unwrap();
    }
    registry
}

fn leaf(registry: &SharedRegistry<Point>, x: f64, radius: f64) -> Box<dyn Interactor> {
    Box::new(LeafInteractor::new(
        registry.clone(),
        ProximityBehavior::new(Point::new(x, 0.0), radius),
    ))
}

fn bench_leaves(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaf_tick");
    for &(interactors, interactables) in &[(2_usize, 64_usize), (8, 1024), (32, 1024)] {
        let registry = knobs(interactables);
        let mut driver = Driver::new();
        for i in 0..interactors {
            driver.add(leaf(&registry, i as f64, 4.0)).unwrap();
        }
        group.throughput(Throughput::Elements(interactors as u64));
        group.bench_function(format!("i{interactors}_n{interactables}"), |b| {
            b.iter(|| {
                driver.tick();
                black_box(driver.ticks());
            });
        });
    }
    group.finish();
}

fn bench_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_tick");
    let registry = knobs(1024);

    let children = vec![leaf(&registry, 0.0, 1.0), leaf(&registry, 0.0, 16.0)];
    let single = InteractorGroup::new(children)
        .unwrap()
        .with_comparer(LowerScoreFirst);
    let mut driver = Driver::new();
    driver.add(Box::new(single)).unwrap();
    group.bench_function("single_two_children", |b| {
        b.iter(|| driver.tick());
    });

    let children = vec![
        leaf(&registry, 0.0, 1.0),
        leaf(&registry, 4.0, 2.0),
        leaf(&registry, 8.0, 4.0),
        leaf(&registry, 12.0, 8.0),
    ];
    let multi = InteractorGroupMulti::new(children)
        .unwrap()
        .with_comparer(LowerScoreFirst);
    let mut driver = Driver::new();
    driver.add(Box::new(multi)).unwrap();
    group.bench_function("multi_four_children", |b| {
        b.iter(|| driver.tick());
    });
    group.finish();
}

criterion_group!(benches, bench_leaves, bench_groups);
criterion_main!(benches);
