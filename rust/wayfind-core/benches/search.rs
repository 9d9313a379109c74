use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wayfind_core::{
    AccessibilityFeature, AccessibilityIndex, CostModel, FeatureKind, GridArtifact, GridCoord, PathSearch,
    WalkabilityGrid,
};

/// Serpentine corridors: every fourth row is a wall with a gap at alternating ends.
fn serpentine(size: usize) -> WalkabilityGrid {
    let mut rows = vec![vec![0u8; size]; size];
    for y in (3..size).step_by(4) {
        rows[y].fill(1);
        let gap = if (y / 4) % 2 == 0 { size - 1 } else { 0 };
        rows[y][gap] = 0;
    }
    WalkabilityGrid::from_artifact(GridArtifact { cell_size: 10, width: size, height: size, grid: rows }).unwrap()
}

fn bench_search(c: &mut Criterion) {
    let grid = serpentine(200);
    let cm = CostModel::default();
    let ramps: Vec<AccessibilityFeature> = (0..20)
        .map(|i| AccessibilityFeature::new(format!("ramp_{}", i), FeatureKind::Ramp, None, (i * 90 + 5) as f64, 15.0))
        .collect();
    let index = AccessibilityIndex::build(&grid, &ramps, 3);
    let search = PathSearch::new(&grid, &cm).with_accessibility(&index);
    let (start, goal) = (GridCoord::new(0, 0), GridCoord::new(199, 198));

    let mut group = c.benchmark_group("serpentine_200");
    group.bench_function("dijkstra", |b| b.iter(|| search.dijkstra(black_box(start), black_box(goal), false)));
    group.bench_function("astar", |b| b.iter(|| search.astar(black_box(start), black_box(goal), false)));
    group.bench_function("astar_accessible", |b| b.iter(|| search.astar(black_box(start), black_box(goal), true)));
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
