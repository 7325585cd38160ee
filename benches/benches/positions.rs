// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use understory_positions::{ListWindow, Positions, WindowOptions};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }
}

fn row_heights(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    (0..len)
        .map(|_| 16.0 + f64::from(rng.next_u32() % 48))
        .collect()
}

fn bench_scroll_to_bottom(c: &mut Criterion) {
    let mut group = c.benchmark_group("positions/scroll_to_bottom");

    // Hypothesis: cost is dominated by measuring every row once; the buffer
    // length only changes how many `calc_heights` calls that takes.
    for len in [1_000usize, 10_000, 100_000] {
        let heights = row_heights(len, 1);
        let total: f64 = heights.iter().sum();
        group.throughput(Throughput::Elements(len as u64));

        for buffer_len in [20usize, 200] {
            group.bench_with_input(
                BenchmarkId::new(format!("buffer_{buffer_len}"), len),
                &heights,
                |b, heights| {
                    b.iter_batched(
                        || {
                            let mut positions = Positions::<f64>::new(buffer_len);
                            positions.profile_data(heights.len());
                            positions
                        },
                        |mut positions| {
                            let mut y = 0.0;
                            while y < total {
                                black_box(positions.find_floor_index(y, |i| heights[i]).ok());
                                y += 600.0;
                            }
                            black_box(positions);
                        },
                        BatchSize::LargeInput,
                    );
                },
            );
        }
    }

    group.finish();
}

fn bench_confirm_height(c: &mut Criterion) {
    let mut group = c.benchmark_group("positions/confirm_height");

    // A height change near the top shifts every later known offset, so the
    // cost grows with the measured territory.
    for len in [1_000usize, 10_000, 100_000] {
        let mut heights = row_heights(len, 2);
        let mut positions = Positions::new(200);
        positions.profile_data(len);
        positions.calc_heights(len, |i| heights[i]);

        group.bench_function(BenchmarkId::from_parameter(len), |b| {
            let mut toggle = false;
            b.iter(|| {
                toggle = !toggle;
                heights[3] = if toggle { 80.0 } else { 20.0 };
                black_box(positions.confirm_height(3, |i| heights[i]));
            });
        });
    }

    group.finish();
}

fn bench_window_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_window/scroll");

    let len = 100_000usize;
    let heights = row_heights(len, 3);
    let mut window = ListWindow::new(WindowOptions::default());
    window.set_data_len(len);
    window.record_heights(heights.iter().copied().enumerate(), |_| 24.0);

    group.bench_function("update_view_every_10px", |b| {
        let mut scroll_top = 0.0;
        b.iter(|| {
            scroll_top = (scroll_top + 10.0) % 1_000_000.0;
            black_box(window.update_view(scroll_top, 800.0, |_| 24.0).ok());
            black_box(window.realized_range());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_scroll_to_bottom,
    bench_confirm_height,
    bench_window_scroll
);
criterion_main!(benches);
