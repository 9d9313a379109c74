use rustc_hash::FxHashSet;

use crate::grid::WalkabilityGrid;
use crate::models::GridCoord;

/// Grid neighbors with an optional hard exclusion set (stair buffers in accessibility mode).
#[derive(Clone, Copy)]
pub struct NeighborProvider<'a> {
    grid: &'a WalkabilityGrid,
    blocked: Option<&'a FxHashSet<GridCoord>>,
}

impl<'a> NeighborProvider<'a> {
    pub fn new(grid: &'a WalkabilityGrid, blocked: Option<&'a FxHashSet<GridCoord>>) -> Self {
        Self { grid, blocked }
    }

    pub fn is_blocked(&self, c: GridCoord) -> bool {
        self.blocked.is_some_and(|b| b.contains(&c))
    }

    pub fn neighbors(&self, c: GridCoord) -> impl Iterator<Item = GridCoord> + 'a {
        let (grid, blocked) = (self.grid, self.blocked);
        grid.neighbors(c)
            .filter(move |n| !blocked.is_some_and(|b| b.contains(n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridArtifact, WALKABLE};

    #[test]
    fn blocked_cells_are_never_yielded() {
        let g = WalkabilityGrid::from_artifact(GridArtifact {
            cell_size: 10,
            width: 3,
            height: 3,
            grid: vec![vec![WALKABLE; 3]; 3],
        })
        .unwrap();
        let mut blocked = FxHashSet::default();
        blocked.insert(GridCoord::new(2, 1));
        blocked.insert(GridCoord::new(1, 0));
        let open = NeighborProvider::new(&g, None);
        assert_eq!(open.neighbors(GridCoord::new(1, 1)).count(), 4);
        let np = NeighborProvider::new(&g, Some(&blocked));
        let n: Vec<GridCoord> = np.neighbors(GridCoord::new(1, 1)).collect();
        assert_eq!(n, vec![GridCoord::new(0, 1), GridCoord::new(1, 2)]);
        assert!(np.is_blocked(GridCoord::new(1, 0)));
    }
}
