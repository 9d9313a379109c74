//! Node export from the map editor: a GeoJSON FeatureCollection of Points.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::features::{AccessibilityFeature, FeatureKind, FeatureSource};
use crate::models::PixelPoint;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Collection { features: Vec<GeoFeature> },
    Bare(Vec<GeoFeature>),
}

#[derive(Debug, Deserialize)]
struct GeoFeature {
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Properties,
    #[serde(default, rename = "_meta")]
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    coordinates: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    accessible: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    is_archived: Option<bool>,
}

impl GeoFeature {
    /// `None` for non-point geometry or features without an id.
    fn into_feature(self) -> Option<AccessibilityFeature> {
        let geometry = self.geometry?;
        if geometry.kind != "Point" || geometry.coordinates.len() < 2 {
            return None;
        }
        let x = geometry.coordinates[0].as_f64()?;
        let y = geometry.coordinates[1].as_f64()?;
        let id = match self.properties.id? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(AccessibilityFeature {
            id,
            name: self.properties.name.unwrap_or_default(),
            kind: self.properties.kind.map(FeatureKind::from).unwrap_or_default(),
            accessible: self.properties.accessible,
            coordinates: PixelPoint::new(x, y),
            archived: self.meta.is_archived.unwrap_or(false),
        })
    }
}

pub fn parse_features(s: &str) -> Result<Vec<AccessibilityFeature>> {
    let doc: Document = serde_json::from_str(s)?;
    Ok(collect(doc))
}

fn collect(doc: Document) -> Vec<AccessibilityFeature> {
    let raw = match doc {
        Document::Collection { features } | Document::Bare(features) => features,
    };
    let total = raw.len();
    let out: Vec<AccessibilityFeature> = raw.into_iter().filter_map(GeoFeature::into_feature).collect();
    if out.len() < total {
        warn!(skipped = total - out.len(), "features without point geometry or id were skipped");
    }
    out
}

#[derive(Clone, Debug)]
pub struct GeoJsonFeatureSource {
    path: PathBuf,
}

impl GeoJsonFeatureSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl FeatureSource for GeoJsonFeatureSource {
    fn features(&self) -> Result<Vec<AccessibilityFeature>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let doc: Document = serde_json::from_reader(reader)?;
        let features = collect(doc);
        debug!(path = %self.path.display(), features = features.len(), "geojson features loaded");
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [120, 40.5]},
             "properties": {"id": "ramp_north", "name": "North Ramp", "type": "ramp_entry", "accessible": true}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [300, 80]},
             "properties": {"id": 42, "type": "stairs"}, "_meta": {"is_archived": true}},
            {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]},
             "properties": {"id": "edge_1"}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1, 2]}, "properties": {}}
        ]
    }"#;

    #[test]
    fn parses_points_and_skips_the_rest() {
        let feats = parse_features(SAMPLE).unwrap();
        assert_eq!(feats.len(), 2);
        assert_eq!(feats[0].id, "ramp_north");
        assert_eq!(feats[0].kind, FeatureKind::RampEntry);
        assert_eq!(feats[0].coordinates, PixelPoint::new(120.0, 40.5));
        assert_eq!(feats[1].id, "42");
        assert!(feats[1].archived);
        assert_eq!(feats[1].accessible, None);
    }

    #[test]
    fn bare_array_is_accepted() {
        let feats = parse_features(
            r#"[{"geometry": {"type": "Point", "coordinates": [5, 5]}, "properties": {"id": "s", "type": "stair"}}]"#,
        )
        .unwrap();
        assert_eq!(feats.len(), 1);
        assert_eq!(feats[0].kind, FeatureKind::Stair);
    }

    #[test]
    fn file_source_reads_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes.geojson");
        std::fs::write(&path, SAMPLE).unwrap();
        let feats = GeoJsonFeatureSource::new(&path).features().unwrap();
        assert_eq!(feats.len(), 2);
        assert!(GeoJsonFeatureSource::new(dir.path().join("missing.geojson")).features().is_err());
    }
}
