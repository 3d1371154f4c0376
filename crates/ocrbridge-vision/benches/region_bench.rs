// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the region filter and aggregation path in the
// ocrbridge-vision crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ocrbridge_core::{NormalizedRect, TextObservation};
use ocrbridge_vision::collect_text;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// A dense receipt-like page: 400 short lines stacked top to bottom in two
/// columns.
fn dense_page() -> Vec<TextObservation> {
    (0..400)
        .map(|i| {
            let column = f64::from(i % 2) * 0.5;
            let row = f64::from(i / 2) / 200.0;
            TextObservation::new(
                format!("item {i:03} ........ {}.99", i % 50),
                NormalizedRect::new(column + 0.02, row, 0.45, 0.004),
            )
        })
        .collect()
}

/// Filter then join with a band region covering a fifth of the page.
fn bench_region_filter(c: &mut Criterion) {
    let page = dense_page();
    let region = NormalizedRect::new(0.0, 0.4, 1.0, 0.2);

    c.bench_function("collect_text with region (400 lines)", |b| {
        b.iter(|| {
            let text = collect_text(black_box(page.clone()), Some(black_box(&region)));
            black_box(text);
        });
    });

    c.bench_function("collect_text without region (400 lines)", |b| {
        b.iter(|| {
            let text = collect_text(black_box(page.clone()), None);
            black_box(text);
        });
    });
}

criterion_group!(benches, bench_region_filter);
criterion_main!(benches);
