pub mod accessibility;
pub mod cost;
pub mod db;
pub mod engine;
pub mod error;
pub mod features;
pub mod geojson;
pub mod grid;
pub mod instructions;
pub mod models;
pub mod options;
pub mod postprocess;
pub mod route;

pub use accessibility::{AccessibilityIndex, AccessibilitySummary, ClassifiedFeature};
pub use cost::CostModel;
pub use db::SqliteFeatureSource;
pub use engine::{FailureReason, PathSearch, SearchParams, SearchResult, SearchWarning};
pub use error::{CoreError, Result};
pub use features::{AccessibilityFeature, FeatureClass, FeatureKind, FeatureSource};
pub use geojson::GeoJsonFeatureSource;
pub use grid::{GridArtifact, WalkabilityGrid};
pub use instructions::InstructionGenerator;
pub use models::{GridCoord, PixelPoint};
pub use options::{Algorithm, RouteOptions};
pub use route::{RouteOutcome, RoutePlanner, RouteRequest, RouteResponse};

pub fn version() -> &'static str { env!("CARGO_PKG_VERSION") }
