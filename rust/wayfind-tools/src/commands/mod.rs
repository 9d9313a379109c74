use std::path::Path;

use anyhow::{Context, Result};
use wayfind_core::{
    AccessibilityFeature, AccessibilityIndex, FeatureSource, GeoJsonFeatureSource, SqliteFeatureSource,
    WalkabilityGrid,
};

use crate::FeatureArgs;

pub mod check_grid;
pub mod classify;
pub mod compare;
pub mod import;
pub mod route;

pub fn load_grid(path: &Path) -> Result<WalkabilityGrid> {
    WalkabilityGrid::load(path).with_context(|| format!("failed to load grid {:?}", path))
}

pub fn feature_source(args: &FeatureArgs) -> Box<dyn FeatureSource> {
    if let Some(db) = &args.features_db {
        return Box::new(SqliteFeatureSource::new(db.clone()));
    }
    if let Some(path) = &args.features_geojson {
        return Box::new(GeoJsonFeatureSource::new(path.clone()));
    }
    Box::new(Vec::<AccessibilityFeature>::new())
}

pub fn build_index(grid: &WalkabilityGrid, args: &FeatureArgs) -> Result<AccessibilityIndex> {
    let source = feature_source(args);
    AccessibilityIndex::from_source(grid, source.as_ref(), args.buffer).context("failed to read accessibility features")
}
