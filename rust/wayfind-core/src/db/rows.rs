use serde::{Deserialize, Serialize};

use crate::features::{AccessibilityFeature, FeatureKind};
use crate::models::PixelPoint;

/// One row of the `nodes` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRow {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub accessible: Option<bool>,
    pub x: f64,
    pub y: f64,
    pub is_archived: bool,
}

impl From<NodeRow> for AccessibilityFeature {
    fn from(r: NodeRow) -> Self {
        AccessibilityFeature {
            id: r.id,
            name: r.name.unwrap_or_default(),
            kind: r.type_.map(FeatureKind::from).unwrap_or_default(),
            accessible: r.accessible,
            coordinates: PixelPoint::new(r.x, r.y),
            archived: r.is_archived,
        }
    }
}

impl From<&AccessibilityFeature> for NodeRow {
    fn from(f: &AccessibilityFeature) -> Self {
        NodeRow {
            id: f.id.clone(),
            name: (!f.name.is_empty()).then(|| f.name.clone()),
            type_: Some(f.kind.as_str().to_string()),
            accessible: f.accessible,
            x: f.coordinates.x,
            y: f.coordinates.y,
            is_archived: f.archived,
        }
    }
}
