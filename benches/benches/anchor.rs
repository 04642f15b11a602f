// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_sticky::anchor::{AnchorTarget, AnchorTracker};

fn targets(len: u32) -> impl DoubleEndedIterator<Item = AnchorTarget<u32, ()>> {
    (0..len).map(|i| {
        let top = f64::from(i) * 300.0;
        AnchorTarget::new(i, top, top + 300.0, ())
    })
}

fn bench_on_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchor/on_scroll");

    for len in [16_u32, 256, 4_096] {
        group.throughput(Throughput::Elements(u64::from(len)));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let mut anchors = AnchorTracker::new();
            anchors.refresh(targets(len));
            let end = f64::from(len) * 300.0;
            let mut y = 0.0;
            b.iter(|| {
                y = (y + 7.0) % end;
                black_box(anchors.on_scroll(black_box(y), 800.0).map(|t| t.id));
            });
        });
    }

    group.finish();
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchor/refresh");

    for len in [256_u32, 4_096] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let mut anchors = AnchorTracker::new();
            b.iter(|| anchors.refresh(targets(len).rev()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_on_scroll, bench_refresh);
criterion_main!(benches);
