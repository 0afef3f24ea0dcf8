//! Link search throughput: exhaustive pair scan against the grid.
//!
//! Run with: `cargo bench --bench links`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use driftfield::links::{find_links, LinkStrategy, LinkStyle};
use driftfield::physics::Bounds;
use driftfield::{Color, ParticleSet};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn bench_links(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_links");
    let bounds = Bounds::new(1920, 1080).unwrap();
    let palette = [Color::from_rgb8(107, 33, 182)];

    for count in [80, 400, 2000] {
        let mut rng = SmallRng::seed_from_u64(count as u64);
        let set = ParticleSet::initialize(count, bounds, &palette, 0.5, &mut rng)
            .unwrap();

        for strategy in [LinkStrategy::Exhaustive, LinkStrategy::Grid] {
            let style = LinkStyle {
                strategy,
                ..LinkStyle::default()
            };
            group.bench_with_input(
                BenchmarkId::new(format!("{strategy:?}"), count),
                set.as_slice(),
                |b, particles| b.iter(|| find_links(black_box(particles), 120.0, &style)),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_links);
criterion_main!(benches);
