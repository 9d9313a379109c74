//! Ramp and stair cell sets derived from accessibility-tagged features.
//!
//! The index is a snapshot of the feature store at build time. Holders cache
//! it for the life of the process, so feature edits made after the first
//! build are not seen until restart. That staleness window is intentional and
//! operators should restart the service after editing ramps or stairs.

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::features::{AccessibilityFeature, FeatureClass, FeatureSource};
use crate::grid::WalkabilityGrid;
use crate::models::{GridCoord, PixelPoint};

pub const DEFAULT_BUFFER_SIZE: i32 = 3;

#[derive(Clone, Debug, Serialize)]
pub struct ClassifiedFeature {
    pub id: String,
    pub name: String,
    pub class: FeatureClass,
    pub cell: GridCoord,
    /// Walkable cells this feature contributed, overlaps included.
    pub cells_marked: usize,
}

#[derive(Clone, Debug, Default)]
pub struct AccessibilityIndex {
    buffer_size: i32,
    ramp_cells: FxHashSet<GridCoord>,
    stair_blocked_cells: FxHashSet<GridCoord>,
    ramp_locations: Vec<GridCoord>,
    stair_locations: Vec<GridCoord>,
    classified: Vec<ClassifiedFeature>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AccessibilitySummary {
    pub buffer_size: i32,
    pub ramp_features: usize,
    pub stair_features: usize,
    pub ramp_cells: usize,
    pub stair_blocked_cells: usize,
    pub features: Vec<ClassifiedFeature>,
}

impl AccessibilityIndex {
    /// No ramps, no stairs. Accessibility mode over this index behaves like standard mode.
    pub fn empty(buffer_size: i32) -> Self {
        Self { buffer_size, ..Self::default() }
    }

    pub fn build(grid: &WalkabilityGrid, features: &[AccessibilityFeature], buffer_size: i32) -> Self {
        let buffer_size = buffer_size.max(0);
        let mut index = Self::empty(buffer_size);
        for feature in features.iter().filter(|f| !f.archived) {
            let Some(class) = feature.classify() else { continue };
            let PixelPoint { x, y } = feature.coordinates;
            if !x.is_finite() || !y.is_finite() {
                warn!(id = %feature.id, x, y, "feature has non-finite coordinates; skipped");
                continue;
            }
            let cell = grid.pixel_to_grid(x, y);
            if !grid.contains(cell) {
                warn!(id = %feature.id, x, y, "feature lies outside the grid; skipped");
                continue;
            }
            let target = match class {
                FeatureClass::Ramp => {
                    index.ramp_locations.push(cell);
                    &mut index.ramp_cells
                }
                FeatureClass::StairBlocker => {
                    index.stair_locations.push(cell);
                    &mut index.stair_blocked_cells
                }
            };
            let cells_marked = mark_buffer(grid, cell, buffer_size, target);
            index.classified.push(ClassifiedFeature {
                id: feature.id.clone(),
                name: feature.name.clone(),
                class,
                cell,
                cells_marked,
            });
        }

        if index.ramp_locations.is_empty() {
            warn!("no ramp features found; accessibility mode will not prefer any cells");
        }
        if index.stair_locations.is_empty() {
            warn!("no stair features found; accessibility mode will not block any cells");
        }
        info!(
            ramps = index.ramp_locations.len(),
            stairs = index.stair_locations.len(),
            ramp_cells = index.ramp_cells.len(),
            stair_blocked_cells = index.stair_blocked_cells.len(),
            buffer_size,
            "accessibility index built"
        );
        index
    }

    /// Query the source once and build. Called at most once per process by the owner of the cache.
    pub fn from_source<S: FeatureSource + ?Sized>(
        grid: &WalkabilityGrid,
        source: &S,
        buffer_size: i32,
    ) -> Result<Self> {
        let features = source.features()?;
        Ok(Self::build(grid, &features, buffer_size))
    }

    pub fn buffer_size(&self) -> i32 { self.buffer_size }

    pub fn is_ramp(&self, c: GridCoord) -> bool {
        self.ramp_cells.contains(&c)
    }

    pub fn is_stair_blocked(&self, c: GridCoord) -> bool {
        self.stair_blocked_cells.contains(&c)
    }

    pub fn ramp_cells(&self) -> &FxHashSet<GridCoord> { &self.ramp_cells }
    pub fn stair_blocked_cells(&self) -> &FxHashSet<GridCoord> { &self.stair_blocked_cells }
    pub fn ramp_locations(&self) -> &[GridCoord] { &self.ramp_locations }
    pub fn stair_locations(&self) -> &[GridCoord] { &self.stair_locations }
    pub fn classified(&self) -> &[ClassifiedFeature] { &self.classified }

    pub fn has_ramps(&self) -> bool {
        !self.ramp_cells.is_empty()
    }

    pub fn summary(&self) -> AccessibilitySummary {
        AccessibilitySummary {
            buffer_size: self.buffer_size,
            ramp_features: self.ramp_locations.len(),
            stair_features: self.stair_locations.len(),
            ramp_cells: self.ramp_cells.len(),
            stair_blocked_cells: self.stair_blocked_cells.len(),
            features: self.classified.clone(),
        }
    }
}

/// Add the in-bounds walkable cells of the square `[-b, b]^2` around `center`.
/// `center` must be inside the grid; the square is clipped to the grid first.
fn mark_buffer(grid: &WalkabilityGrid, center: GridCoord, b: i32, set: &mut FxHashSet<GridCoord>) -> usize {
    let (x0, x1) = (center.x.saturating_sub(b).max(0), center.x.saturating_add(b).min(grid.width() - 1));
    let (y0, y1) = (center.y.saturating_sub(b).max(0), center.y.saturating_add(b).min(grid.height() - 1));
    let mut marked = 0;
    for x in x0..=x1 {
        for y in y0..=y1 {
            if grid.is_walkable(x, y) {
                set.insert(GridCoord::new(x, y));
                marked += 1;
            }
        }
    }
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureKind;
    use crate::grid::{GridArtifact, WALKABLE, WALL};

    fn grid(rows: &[&str]) -> WalkabilityGrid {
        let g: Vec<Vec<u8>> = rows
            .iter()
            .map(|r| r.chars().map(|c| if c == '#' { WALL } else { WALKABLE }).collect())
            .collect();
        WalkabilityGrid::from_artifact(GridArtifact { cell_size: 10, width: g[0].len(), height: g.len(), grid: g })
            .unwrap()
    }

    #[test]
    fn buffers_skip_walls_and_out_of_bounds() {
        let g = grid(&["....", ".#..", "....", "...."]);
        let stairs = AccessibilityFeature::new("s", FeatureKind::Stairs, None, 5.0, 5.0);
        let idx = AccessibilityIndex::build(&g, &[stairs], 1);
        // 3x3 around (0,0) clipped to 2x2, minus the wall at (1,1)
        assert_eq!(idx.stair_blocked_cells().len(), 3);
        assert!(idx.is_stair_blocked(GridCoord::new(0, 0)));
        assert!(!idx.is_stair_blocked(GridCoord::new(1, 1)));
        assert!(!idx.has_ramps());
        assert_eq!(idx.stair_locations(), &[GridCoord::new(0, 0)]);
        assert_eq!(idx.classified()[0].cells_marked, 3);
    }

    #[test]
    fn ramps_and_stairs_land_in_separate_sets() {
        let g = grid(&["........"; 8]);
        let feats = vec![
            AccessibilityFeature::new("ramp_a", FeatureKind::Room, None, 15.0, 15.0),
            AccessibilityFeature::new("st", FeatureKind::StairsEntry, None, 65.0, 65.0),
            AccessibilityFeature::new("cafe", FeatureKind::Room, None, 35.0, 35.0),
        ];
        let idx = AccessibilityIndex::build(&g, &feats, 0);
        assert!(idx.is_ramp(GridCoord::new(1, 1)));
        assert!(idx.is_stair_blocked(GridCoord::new(6, 6)));
        assert_eq!(idx.ramp_cells().len(), 1);
        assert_eq!(idx.stair_blocked_cells().len(), 1);
        assert_eq!(idx.classified().len(), 2);
    }

    #[test]
    fn archived_features_are_skipped() {
        let g = grid(&["...", "...", "..."]);
        let mut s = AccessibilityFeature::new("s", FeatureKind::Stairs, None, 15.0, 15.0);
        s.archived = true;
        let idx = AccessibilityIndex::build(&g, &[s], 1);
        assert!(idx.stair_blocked_cells().is_empty());
    }

    #[test]
    fn summary_reports_counts() {
        let g = grid(&["....."; 5]);
        let feats = vec![AccessibilityFeature::new("r", FeatureKind::Ramp, None, 25.0, 25.0)];
        let s = AccessibilityIndex::build(&g, &feats, DEFAULT_BUFFER_SIZE).summary();
        assert_eq!(s.ramp_features, 1);
        assert_eq!(s.ramp_cells, 25);
        assert_eq!(s.stair_blocked_cells, 0);
        assert_eq!(s.buffer_size, DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn features_off_the_grid_are_skipped() {
        let g = grid(&["....", "....", "...."]);
        let feats = vec![
            AccessibilityFeature::new("far", FeatureKind::Stairs, None, -1.0e12, 5.0),
            AccessibilityFeature::new("east", FeatureKind::Stairs, None, 40.0, 5.0),
            AccessibilityFeature::new("nan", FeatureKind::Stairs, None, f64::NAN, f64::NAN),
            AccessibilityFeature::new("inf", FeatureKind::Ramp, None, 5.0, f64::INFINITY),
        ];
        let idx = AccessibilityIndex::build(&g, &feats, 3);
        assert!(idx.stair_blocked_cells().is_empty());
        assert!(idx.ramp_cells().is_empty());
        assert!(idx.classified().is_empty());
    }

    #[test]
    fn huge_buffer_is_clipped_to_the_grid() {
        let g = grid(&["....", ".#..", "...."]);
        let feats = vec![AccessibilityFeature::new("s", FeatureKind::Stairs, None, 15.0, 5.0)];
        let idx = AccessibilityIndex::build(&g, &feats, i32::MAX);
        assert_eq!(idx.stair_blocked_cells().len(), 11);
        assert_eq!(idx.classified()[0].cells_marked, 11);
        assert_eq!(idx.buffer_size(), i32::MAX);
    }
}
