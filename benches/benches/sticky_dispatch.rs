// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use understory_sticky::{
    DEFAULT_CONTENT_SELECTOR, DEFAULT_WRAPPER_SELECTOR, Document, EventKind, Geometry,
    StickyOptions, StickyTracker,
};

const SPACING: f64 = 200.0;
const HEIGHT: f64 = 40.0;

/// Even elements are wrappers spaced `SPACING` apart; `n + 1` is the content of `n`.
struct Column;

impl Geometry for Column {
    type Element = u32;

    fn top(&self, element: &u32) -> Option<f64> {
        Some(f64::from(element / 2) * SPACING)
    }

    fn height(&self, _element: &u32) -> Option<f64> {
        Some(HEIGHT)
    }
}

impl Document for Column {
    fn matches(&self, element: &u32, selector: &str) -> bool {
        match element % 2 {
            0 => selector == DEFAULT_WRAPPER_SELECTOR,
            _ => selector == DEFAULT_CONTENT_SELECTOR,
        }
    }

    fn first_descendant(&self, element: &u32, selector: &str) -> Option<u32> {
        (element % 2 == 0 && selector == DEFAULT_CONTENT_SELECTOR).then_some(element + 1)
    }

    fn closest_ancestor(&self, element: &u32, selector: &str) -> Option<u32> {
        (element % 2 == 1 && selector == DEFAULT_WRAPPER_SELECTOR).then_some(element - 1)
    }
}

fn tracker(regions: u32) -> StickyTracker<Column> {
    let mut tracker = StickyTracker::new(Column, 0.0);
    for i in 0..regions {
        let id = tracker.register(i * 2, StickyOptions::default()).unwrap();
        tracker.on(id, EventKind::StateChanged, |_| {}).unwrap();
        tracker.on(id, EventKind::DirectionChanged, |_| {}).unwrap();
    }
    tracker
}

fn bench_steady_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("sticky/steady_scroll");

    // Small steps mostly produce no flips: this is the per-frame cost.
    for regions in [8_u32, 64, 512] {
        group.throughput(Throughput::Elements(u64::from(regions)));
        group.bench_with_input(BenchmarkId::from_parameter(regions), &regions, |b, &n| {
            let mut tracker = tracker(n);
            let mut y = 0.0;
            b.iter(|| {
                y = (y + 3.0) % (f64::from(n) * SPACING);
                black_box(tracker.on_scroll(black_box(y)));
            });
        });
    }

    group.finish();
}

fn bench_jump(c: &mut Criterion) {
    let mut group = c.benchmark_group("sticky/jump");

    // Jumping end to end flips every region and recomputes every threshold.
    for regions in [8_u32, 64, 512] {
        group.throughput(Throughput::Elements(u64::from(regions)));
        group.bench_with_input(BenchmarkId::from_parameter(regions), &regions, |b, &n| {
            let end = f64::from(n) * SPACING;
            b.iter_batched(
                || tracker(n),
                |mut tracker| {
                    black_box(tracker.on_scroll(end));
                    black_box(tracker.on_scroll(0.0));
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("sticky/refresh");

    for regions in [64_u32, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(regions), &regions, |b, &n| {
            let mut tracker = tracker(n);
            tracker.on_scroll(f64::from(n) * SPACING / 2.0);
            b.iter(|| tracker.refresh());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_steady_scroll, bench_jump, bench_refresh);
criterion_main!(benches);
