use std::collections::VecDeque;

use bitvec::prelude::*;
use serde::Serialize;
use tracing::warn;
use wayfind_core::WalkabilityGrid;

#[derive(Debug, Serialize)]
pub struct GridReport {
    pub width: i32,
    pub height: i32,
    pub cell_size: u32,
    pub walkable: usize,
    pub walls: usize,
    /// Orthogonally connected walkable regions.
    pub regions: usize,
    pub largest_region: usize,
}

pub fn run(grid: &WalkabilityGrid) -> GridReport {
    let sizes = region_sizes(grid);
    if sizes.len() > 1 {
        warn!(regions = sizes.len(), "walkable area is split; some destinations are unreachable from others");
    }
    GridReport {
        width: grid.width(),
        height: grid.height(),
        cell_size: grid.cell_size(),
        walkable: grid.walkable_count(),
        walls: grid.wall_count(),
        regions: sizes.len(),
        largest_region: sizes.iter().copied().max().unwrap_or(0),
    }
}

/// Flood fill over the same 4-neighbourhood the search uses.
fn region_sizes(grid: &WalkabilityGrid) -> Vec<usize> {
    let mut seen: BitVec = bitvec![0; grid.cell_count()];
    let mut sizes = Vec::new();
    let mut queue = VecDeque::new();
    for seed in grid.walkable_cells() {
        let si = grid.cell_index(seed);
        if seen[si] {
            continue;
        }
        seen.set(si, true);
        queue.push_back(seed);
        let mut size = 0;
        while let Some(c) = queue.pop_front() {
            size += 1;
            for n in grid.neighbors(c) {
                let ni = grid.cell_index(n);
                if !seen[ni] {
                    seen.set(ni, true);
                    queue.push_back(n);
                }
            }
        }
        sizes.push(size);
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::split_grid;
    use wayfind_core::grid::{GridArtifact, WALKABLE, WALL};

    #[test]
    fn split_grid_is_one_region_through_the_gap() {
        let r = run(&split_grid());
        assert_eq!((r.width, r.height, r.cell_size), (10, 10, 10));
        assert_eq!(r.walkable, 91);
        assert_eq!(r.walls, 9);
        assert_eq!(r.regions, 1);
        assert_eq!(r.largest_region, 91);
    }

    #[test]
    fn closed_wall_splits_regions() {
        let rows = vec![vec![WALKABLE, WALL, WALKABLE, WALKABLE]; 3];
        let g = WalkabilityGrid::from_artifact(GridArtifact { cell_size: 5, width: 4, height: 3, grid: rows }).unwrap();
        let r = run(&g);
        assert_eq!(r.regions, 2);
        assert_eq!(r.largest_region, 6);
        assert_eq!(r.walkable, 9);
    }
}
