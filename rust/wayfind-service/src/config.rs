use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use wayfind_core::accessibility::DEFAULT_BUFFER_SIZE;
use wayfind_core::options::{DEFAULT_PIXEL_TO_METER, DEFAULT_WALKING_SPEED_MPS};
use wayfind_core::{AccessibilityFeature, Algorithm, FeatureSource, GeoJsonFeatureSource, RouteOptions, SqliteFeatureSource};

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub grid_path: PathBuf,
    pub features_db: Option<PathBuf>,
    pub features_geojson: Option<PathBuf>,
    pub buffer_size: i32,
    pub algorithm: Algorithm,
    pub pixel_to_meter: f64,
    pub walk_speed_mps: f64,
    pub warm_accessibility: bool,
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(s) if s.trim().is_empty() => Ok(default),
        Some(s) => s.trim().parse::<T>().map_err(|e| anyhow!("{}={:?}: {}", key, s, e)),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> anyhow::Result<Self> {
        let host = get("WAYFIND_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(get("WAYFIND_PORT"), "WAYFIND_PORT", 8000u16)?;
        let grid_path = get("WAYFIND_GRID").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("static/grid.json"));
        let features_db = get("WAYFIND_FEATURES_DB").filter(|s| !s.is_empty()).map(PathBuf::from);
        let features_geojson = get("WAYFIND_FEATURES_GEOJSON").filter(|s| !s.is_empty()).map(PathBuf::from);
        let buffer_size = parse_or(get("WAYFIND_BUFFER_SIZE"), "WAYFIND_BUFFER_SIZE", DEFAULT_BUFFER_SIZE)?;
        if buffer_size < 0 {
            return Err(anyhow!("WAYFIND_BUFFER_SIZE must be >= 0, got {}", buffer_size));
        }
        let algorithm = match get("WAYFIND_ALGORITHM") {
            Some(s) if !s.trim().is_empty() => {
                Algorithm::parse(&s).ok_or_else(|| anyhow!("WAYFIND_ALGORITHM={:?}: expected astar or dijkstra", s))?
            }
            _ => Algorithm::default(),
        };
        let pixel_to_meter = parse_or(get("WAYFIND_PIXEL_TO_METER"), "WAYFIND_PIXEL_TO_METER", DEFAULT_PIXEL_TO_METER)?;
        let walk_speed_mps = parse_or(get("WAYFIND_WALK_SPEED"), "WAYFIND_WALK_SPEED", DEFAULT_WALKING_SPEED_MPS)?;
        let warm_accessibility = get("WAYFIND_WARM_ACCESSIBILITY").map(|v| v.trim() == "1").unwrap_or(false);

        Ok(Self {
            host,
            port,
            grid_path,
            features_db,
            features_geojson,
            buffer_size,
            algorithm,
            pixel_to_meter,
            walk_speed_mps,
            warm_accessibility,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }

    pub fn route_options(&self) -> RouteOptions {
        RouteOptions {
            algorithm: self.algorithm,
            pixel_to_meter: self.pixel_to_meter,
            walking_speed_mps: self.walk_speed_mps,
            ..RouteOptions::default()
        }
    }

    /// SQLite wins over GeoJSON; with neither, accessibility mode has nothing to avoid.
    pub fn feature_source(&self) -> Arc<dyn FeatureSource + Send + Sync> {
        if let Some(db) = &self.features_db {
            return Arc::new(SqliteFeatureSource::new(db.clone()));
        }
        if let Some(path) = &self.features_geojson {
            return Arc::new(GeoJsonFeatureSource::new(path.clone()));
        }
        Arc::new(Vec::<AccessibilityFeature>::new())
    }
}
