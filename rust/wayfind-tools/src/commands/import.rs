use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use wayfind_core::db::FeatureDatabase;
use wayfind_core::geojson::parse_features;

#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub parsed: usize,
    pub inserted: usize,
    pub archived: usize,
    pub active_rows: i64,
}

pub fn run(geojson: &Path, out_db: &Path, replace: bool) -> Result<ImportReport> {
    let text = std::fs::read_to_string(geojson).with_context(|| format!("failed to read {:?}", geojson))?;
    let features = parse_features(&text).with_context(|| format!("failed to parse {:?}", geojson))?;

    let mut db = FeatureDatabase::open_writable(out_db).with_context(|| format!("failed to open {:?}", out_db))?;
    db.create_schema()?;
    if replace {
        db.conn().execute("DELETE FROM nodes", [])?;
    }
    let inserted = db.insert_features(&features)?;
    let active_rows = db.count_active_nodes()?;
    let archived = features.iter().filter(|f| f.archived).count();
    info!(path = %out_db.display(), inserted, archived, active_rows, "features imported");
    Ok(ImportReport { parsed: features.len(), inserted, archived, active_rows })
}
