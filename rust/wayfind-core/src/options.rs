use serde::{Deserialize, Serialize};

pub const DEFAULT_SIMPLIFY_TOLERANCE_DEG: f64 = 3.0;
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;
pub const DEFAULT_ANGLE_THRESHOLD_DEG: f64 = 2.0;
pub const DEFAULT_PIXEL_TO_METER: f64 = 0.02;
pub const DEFAULT_WALKING_SPEED_MPS: f64 = 1.4;
pub const DEFAULT_MIN_SEGMENT_METERS: f64 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Dijkstra,
    #[default]
    #[serde(alias = "a*", alias = "a_star")]
    AStar,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar => "astar",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dijkstra" => Some(Algorithm::Dijkstra),
            "astar" | "a*" | "a_star" => Some(Algorithm::AStar),
            _ => None,
        }
    }
}

/// Knobs for turning a raw cell path into the route response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
    pub algorithm: Algorithm,
    pub simplify_tolerance_deg: f64,
    pub smoothing_factor: f64,
    pub angle_threshold_deg: f64,
    pub pixel_to_meter: f64,
    pub walking_speed_mps: f64,
    pub min_segment_meters: f64,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            simplify_tolerance_deg: DEFAULT_SIMPLIFY_TOLERANCE_DEG,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            angle_threshold_deg: DEFAULT_ANGLE_THRESHOLD_DEG,
            pixel_to_meter: DEFAULT_PIXEL_TO_METER,
            walking_speed_mps: DEFAULT_WALKING_SPEED_MPS,
            min_segment_meters: DEFAULT_MIN_SEGMENT_METERS,
        }
    }
}
