use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::PixelPoint;

/// Node `type` values known to the map editor. Anything else is kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FeatureKind {
    Ramp,
    RampEntry,
    RampExit,
    Stairs,
    StairsEntry,
    StairsExit,
    Stair,
    Room,
    Intersection,
    CorridorNode,
    Elevator,
    Other(String),
}

impl FeatureKind {
    pub fn as_str(&self) -> &str {
        match self {
            FeatureKind::Ramp => "ramp",
            FeatureKind::RampEntry => "ramp_entry",
            FeatureKind::RampExit => "ramp_exit",
            FeatureKind::Stairs => "stairs",
            FeatureKind::StairsEntry => "stairs_entry",
            FeatureKind::StairsExit => "stairs_exit",
            FeatureKind::Stair => "stair",
            FeatureKind::Room => "room",
            FeatureKind::Intersection => "intersection",
            FeatureKind::CorridorNode => "corridor_node",
            FeatureKind::Elevator => "elevator",
            FeatureKind::Other(s) => s.as_str(),
        }
    }

    pub fn is_ramp(&self) -> bool {
        matches!(self, FeatureKind::Ramp | FeatureKind::RampEntry | FeatureKind::RampExit)
    }

    pub fn is_stairs(&self) -> bool {
        matches!(
            self,
            FeatureKind::Stairs | FeatureKind::StairsEntry | FeatureKind::StairsExit | FeatureKind::Stair
        )
    }
}

impl From<&str> for FeatureKind {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "ramp" => FeatureKind::Ramp,
            "ramp_entry" => FeatureKind::RampEntry,
            "ramp_exit" => FeatureKind::RampExit,
            "stairs" => FeatureKind::Stairs,
            "stairs_entry" => FeatureKind::StairsEntry,
            "stairs_exit" => FeatureKind::StairsExit,
            "stair" => FeatureKind::Stair,
            "room" => FeatureKind::Room,
            "intersection" => FeatureKind::Intersection,
            "corridor_node" => FeatureKind::CorridorNode,
            "elevator" => FeatureKind::Elevator,
            _ => FeatureKind::Other(s.to_string()),
        }
    }
}

impl From<String> for FeatureKind {
    fn from(s: String) -> Self {
        FeatureKind::from(s.as_str())
    }
}

impl From<FeatureKind> for String {
    fn from(k: FeatureKind) -> Self {
        k.as_str().to_string()
    }
}

impl Default for FeatureKind {
    fn default() -> Self {
        FeatureKind::Other(String::new())
    }
}

/// A point feature from the map store carrying accessibility tags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityFeature {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: FeatureKind,
    #[serde(default)]
    pub accessible: Option<bool>,
    pub coordinates: PixelPoint,
    #[serde(default)]
    pub archived: bool,
}

impl AccessibilityFeature {
    pub fn new(id: impl Into<String>, kind: FeatureKind, accessible: Option<bool>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            accessible,
            coordinates: PixelPoint::new(x, y),
            archived: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn name_or_id_contains(&self, needles: &[&str]) -> bool {
        let name = self.name.to_lowercase();
        let id = self.id.to_lowercase();
        needles.iter().any(|n| name.contains(n) || id.contains(n))
    }

    /// Ordered rule list; first match wins.
    ///
    /// A "ramp" in the name or id vetoes stair classification, and so does
    /// `accessible == true`: such a feature with a `stairs`, `stairs_entry` or
    /// `stairs_exit` type is left unclassified rather than blocked. The singular
    /// `stair` type does not veto and reads as a ramp when marked accessible.
    pub fn classify(&self) -> Option<FeatureClass> {
        let mentions_ramp = self.name_or_id_contains(&["ramp"]);
        let stairway = matches!(self.kind, FeatureKind::Stairs | FeatureKind::StairsEntry | FeatureKind::StairsExit);
        if self.accessible == Some(true) && !stairway {
            return Some(FeatureClass::Ramp);
        }
        if self.kind.is_ramp() || mentions_ramp {
            return Some(FeatureClass::Ramp);
        }
        if self.accessible == Some(true) {
            return None;
        }
        if self.accessible == Some(false) && self.kind != FeatureKind::Ramp {
            return Some(FeatureClass::StairBlocker);
        }
        if self.kind.is_stairs() || self.name_or_id_contains(&["stair", "step"]) {
            return Some(FeatureClass::StairBlocker);
        }
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureClass {
    Ramp,
    StairBlocker,
}

/// Read side of the map feature store. Queried once per index build.
pub trait FeatureSource {
    fn features(&self) -> Result<Vec<AccessibilityFeature>>;
}

impl FeatureSource for Vec<AccessibilityFeature> {
    fn features(&self) -> Result<Vec<AccessibilityFeature>> {
        Ok(self.clone())
    }
}
