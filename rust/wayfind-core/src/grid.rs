//! Walkability grid loaded from the offline grid artifact.
//!
//! The artifact is produced by thresholding a floor-plan raster; this crate only
//! consumes it. Once loaded the grid is read-only and can be shared between
//! concurrent requests without coordination.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bitvec::vec::BitVec;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CoreError, Result};
use crate::models::{GridCoord, PixelPoint};

pub const WALKABLE: u8 = 0;
pub const WALL: u8 = 1;

/// Neighbor order is east, west, south, north. Search tie-breaking depends on it.
pub const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// On-disk grid artifact: `grid[y][x]`, 0 = walkable, 1 = wall.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridArtifact {
    pub cell_size: u32,
    pub width: usize,
    pub height: usize,
    pub grid: Vec<Vec<u8>>,
}

impl GridArtifact {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(CoreError::MalformedGrid("cell_size must be positive".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::MalformedGrid(format!("empty grid {}x{}", self.width, self.height)));
        }
        if self.width > i32::MAX as usize || self.height > i32::MAX as usize {
            return Err(CoreError::MalformedGrid("grid dimensions overflow".into()));
        }
        if self.grid.len() != self.height {
            return Err(CoreError::MalformedGrid(format!(
                "expected {} rows, found {}",
                self.height,
                self.grid.len()
            )));
        }
        for (y, row) in self.grid.iter().enumerate() {
            if row.len() != self.width {
                return Err(CoreError::MalformedGrid(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    self.width
                )));
            }
            if let Some(x) = row.iter().position(|&v| v != WALKABLE && v != WALL) {
                return Err(CoreError::MalformedGrid(format!("cell ({}, {}) holds {}", x, y, row[x])));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct WalkabilityGrid {
    width: i32,
    height: i32,
    cell_size: u32,
    /// Row-major, bit set means wall.
    walls: BitVec,
}

impl WalkabilityGrid {
    pub fn from_artifact(artifact: GridArtifact) -> Result<Self> {
        artifact.validate()?;
        let mut walls = BitVec::repeat(false, artifact.width * artifact.height);
        for (y, row) in artifact.grid.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v == WALL {
                    walls.set(y * artifact.width + x, true);
                }
            }
        }
        Ok(Self {
            width: artifact.width as i32,
            height: artifact.height as i32,
            cell_size: artifact.cell_size,
            walls,
        })
    }

    /// Load and validate the artifact. Any structural problem is fatal for the caller.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let grid = Self::from_artifact(GridArtifact::from_path(path)?)?;
        info!(
            path=%path.display(),
            width=grid.width,
            height=grid.height,
            cell_size=grid.cell_size,
            walkable=grid.walkable_count(),
            "grid loaded"
        );
        Ok(grid)
    }

    pub fn width(&self) -> i32 { self.width }
    pub fn height(&self) -> i32 { self.height }
    pub fn cell_size(&self) -> u32 { self.cell_size }

    #[inline]
    pub fn contains(&self, c: GridCoord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    /// Row-major index of an in-bounds cell.
    #[inline]
    pub fn cell_index(&self, c: GridCoord) -> usize {
        c.y as usize * self.width as usize + c.x as usize
    }

    #[inline]
    pub fn cell_at(&self, index: usize) -> GridCoord {
        let w = self.width as usize;
        GridCoord::new((index % w) as i32, (index / w) as i32)
    }

    pub fn cell_count(&self) -> usize {
        self.walls.len()
    }

    /// False for out-of-bounds coordinates and for walls.
    #[inline]
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        let c = GridCoord::new(x, y);
        self.contains(c) && !self.walls[self.cell_index(c)]
    }

    #[inline]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        let c = GridCoord::new(x, y);
        self.contains(c) && self.walls[self.cell_index(c)]
    }

    /// Walkable orthogonal neighbors in east, west, south, north order.
    pub fn neighbors(&self, c: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        ORTHOGONAL
            .iter()
            .map(move |&(dx, dy)| GridCoord::new(c.x + dx, c.y + dy))
            .filter(move |n| self.is_walkable(n.x, n.y))
    }

    /// Number of in-bounds wall cells among the 8 cells surrounding `c`.
    pub fn adjacent_walls(&self, c: GridCoord) -> usize {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx, dy) != (0, 0) && self.is_wall(c.x + dx, c.y + dy) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Floor division of pixel coordinates by the cell size.
    pub fn pixel_to_grid(&self, px: f64, py: f64) -> GridCoord {
        let cs = self.cell_size as f64;
        GridCoord::new((px / cs).floor() as i32, (py / cs).floor() as i32)
    }

    /// Pixel centre of a cell. Lossy inverse of [`Self::pixel_to_grid`].
    pub fn grid_to_pixel_center(&self, c: GridCoord) -> PixelPoint {
        let cs = self.cell_size as f64;
        PixelPoint::new(c.x as f64 * cs + cs / 2.0, c.y as f64 * cs + cs / 2.0)
    }

    pub fn walkable_count(&self) -> usize {
        self.walls.len() - self.walls.count_ones()
    }

    pub fn wall_count(&self) -> usize {
        self.walls.count_ones()
    }

    /// Walkable cells in row-major order.
    pub fn walkable_cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.walls.iter_zeros().map(move |i| self.cell_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(rows: &[&str]) -> GridArtifact {
        let grid: Vec<Vec<u8>> = rows
            .iter()
            .map(|r| r.chars().map(|c| if c == '#' { WALL } else { WALKABLE }).collect())
            .collect();
        GridArtifact { cell_size: 10, width: grid[0].len(), height: grid.len(), grid }
    }

    #[test]
    fn walkability_and_bounds() {
        let g = WalkabilityGrid::from_artifact(artifact(&["..#", "...", "#.."])).unwrap();
        assert!(g.is_walkable(0, 0));
        assert!(!g.is_walkable(2, 0));
        assert!(!g.is_walkable(-1, 0));
        assert!(!g.is_walkable(3, 0));
        assert!(!g.is_walkable(0, 3));
        assert_eq!(g.walkable_count(), 7);
        assert_eq!(g.wall_count(), 2);
    }

    #[test]
    fn neighbors_follow_east_west_south_north() {
        let g = WalkabilityGrid::from_artifact(artifact(&["...", "...", "..."])).unwrap();
        let n: Vec<GridCoord> = g.neighbors(GridCoord::new(1, 1)).collect();
        assert_eq!(n, vec![GridCoord::new(2, 1), GridCoord::new(0, 1), GridCoord::new(1, 2), GridCoord::new(1, 0)]);
    }

    #[test]
    fn neighbors_skip_walls_and_edges() {
        let g = WalkabilityGrid::from_artifact(artifact(&[".#", ".."])).unwrap();
        let n: Vec<GridCoord> = g.neighbors(GridCoord::new(0, 0)).collect();
        assert_eq!(n, vec![GridCoord::new(0, 1)]);
    }

    #[test]
    fn adjacent_walls_counts_diagonals_in_bounds_only() {
        let g = WalkabilityGrid::from_artifact(artifact(&["#.#", "...", "##."])).unwrap();
        assert_eq!(g.adjacent_walls(GridCoord::new(1, 1)), 4);
        assert_eq!(g.adjacent_walls(GridCoord::new(0, 1)), 3);
        assert_eq!(g.adjacent_walls(GridCoord::new(2, 2)), 1);
    }

    #[test]
    fn pixel_round_trip_is_stable_at_cell_centres() {
        let g = WalkabilityGrid::from_artifact(artifact(&["....", "...."])).unwrap();
        for c in g.walkable_cells() {
            let p = g.grid_to_pixel_center(c);
            assert_eq!(g.pixel_to_grid(p.x, p.y), c);
        }
        assert_eq!(g.pixel_to_grid(19.0, 9.99), GridCoord::new(1, 0));
        assert_eq!(g.grid_to_pixel_center(GridCoord::new(1, 1)), PixelPoint::new(15.0, 15.0));
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut a = artifact(&["...", "..."]);
        a.grid[1].pop();
        assert!(matches!(WalkabilityGrid::from_artifact(a), Err(CoreError::MalformedGrid(_))));
    }

    #[test]
    fn rejects_bad_header_and_values() {
        let mut a = artifact(&["..", ".."]);
        a.height = 3;
        assert!(matches!(a.validate(), Err(CoreError::MalformedGrid(_))));
        let mut b = artifact(&["..", ".."]);
        b.grid[0][0] = 7;
        assert!(matches!(b.validate(), Err(CoreError::MalformedGrid(_))));
        let mut c = artifact(&[".."]);
        c.cell_size = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn missing_fields_fail_to_parse() {
        let err = GridArtifact::from_json_str(r#"{"cell_size": 10, "width": 1, "grid": [[0]]}"#).unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
        let ok = GridArtifact::from_json_str(r#"{"cell_size": 10, "width": 2, "height": 1, "grid": [[0, 1]]}"#).unwrap();
        let g = WalkabilityGrid::from_artifact(ok).unwrap();
        assert!(g.is_wall(1, 0));
    }
}
