use serde::Serialize;
use wayfind_core::PixelPoint;

#[derive(Debug, Serialize)]
pub struct Healthz {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub service_version: &'static str,
    pub core_version: &'static str,
}

/// Pixel centres of every walkable cell, for map overlays.
#[derive(Debug, Serialize)]
pub struct WalkableGridResponse {
    pub walkable_cells: Vec<PixelPoint>,
    pub cell_size: u32,
    pub grid_width: i32,
    pub grid_height: i32,
}
