use anyhow::Result;
use wayfind_core::{AccessibilitySummary, WalkabilityGrid};

use crate::commands::build_index;
use crate::FeatureArgs;

pub fn run(grid: &WalkabilityGrid, features: &FeatureArgs) -> Result<AccessibilitySummary> {
    Ok(build_index(grid, features)?.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{geojson_features, no_features, split_grid, NODES};
    use wayfind_core::{FeatureClass, GridCoord};

    #[test]
    fn classifies_geojson_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes.geojson");
        std::fs::write(&path, NODES).unwrap();

        let s = run(&split_grid(), &geojson_features(path)).unwrap();
        assert_eq!(s.buffer_size, 1);
        assert_eq!(s.stair_features, 1);
        assert_eq!(s.ramp_features, 1);
        assert_eq!(s.stair_blocked_cells, 7);
        // corner-adjacent ramp at (1,8): 3x3 fully inside and walkable
        assert_eq!(s.ramp_cells, 9);
        let stairs = s.features.iter().find(|f| f.id == "st_gap").unwrap();
        assert_eq!(stairs.class, FeatureClass::StairBlocker);
        assert_eq!(stairs.cell, GridCoord::new(5, 5));
        assert!(s.features.iter().all(|f| f.id != "old"));
    }

    #[test]
    fn no_source_means_empty_index() {
        let s = run(&split_grid(), &no_features()).unwrap();
        assert_eq!(s.ramp_cells + s.stair_blocked_cells, 0);
        assert!(s.features.is_empty());
    }

    #[test]
    fn unreadable_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = geojson_features(dir.path().join("missing.geojson"));
        assert!(run(&split_grid(), &args).is_err());
    }
}
