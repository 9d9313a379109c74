//! Request to response pipeline: locate, search, shape, describe.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accessibility::AccessibilityIndex;
use crate::cost::CostModel;
use crate::engine::{PathSearch, SearchParams, SearchResult};
use crate::error::{CoreError, Result};
use crate::grid::WalkabilityGrid;
use crate::instructions::InstructionGenerator;
use crate::models::{path_length, GridCoord, PixelPoint};
use crate::options::{Algorithm, RouteOptions};
use crate::postprocess::{simplify, smooth};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start_x: i64,
    pub start_y: i64,
    pub end_x: i64,
    pub end_y: i64,
    #[serde(default)]
    pub accessibility_mode: bool,
    /// Falls back to [`RouteOptions::algorithm`] when absent.
    #[serde(default)]
    pub algorithm: Option<Algorithm>,
}

impl RouteRequest {
    pub fn new(start: (i64, i64), end: (i64, i64)) -> Self {
        Self {
            start_x: start.0,
            start_y: start.1,
            end_x: end.0,
            end_y: end.1,
            accessibility_mode: false,
            algorithm: None,
        }
    }
}

/// Empty `path` means no route was found.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub path: Vec<PixelPoint>,
    pub instructions: Vec<String>,
    pub distance_meters: f64,
    pub estimated_time_minutes: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct RouteOutcome {
    pub response: RouteResponse,
    pub search: SearchResult,
    pub ramp_cells_used: usize,
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let m = 10f64.powi(decimals);
    (v * m).round() / m
}

pub struct RoutePlanner<'a> {
    grid: &'a WalkabilityGrid,
    cost_model: &'a CostModel,
    index: Option<&'a AccessibilityIndex>,
    options: &'a RouteOptions,
}

impl<'a> RoutePlanner<'a> {
    pub fn new(grid: &'a WalkabilityGrid, cost_model: &'a CostModel, options: &'a RouteOptions) -> Self {
        Self { grid, cost_model, index: None, options }
    }

    pub fn with_accessibility(mut self, index: &'a AccessibilityIndex) -> Self {
        self.index = Some(index);
        self
    }

    fn locate(&self, px: i64, py: i64) -> Result<GridCoord> {
        let c = self.grid.pixel_to_grid(px as f64, py as f64);
        if !self.grid.contains(c) {
            return Err(CoreError::OutOfBounds { x: px, y: py });
        }
        Ok(c)
    }

    pub fn plan(&self, req: &RouteRequest) -> Result<RouteOutcome> {
        let start = self.locate(req.start_x, req.start_y)?;
        let goal = self.locate(req.end_x, req.end_y)?;
        let algorithm = req.algorithm.unwrap_or(self.options.algorithm);

        let mut search = PathSearch::new(self.grid, self.cost_model);
        if let Some(idx) = self.index {
            search = search.with_accessibility(idx);
        }
        let result = search.find_path(
            &SearchParams::new(start, goal).algorithm(algorithm).accessible(req.accessibility_mode),
        );
        let warnings: Vec<String> = result.warnings.iter().map(|w| w.message().to_string()).collect();

        if !result.found {
            return Ok(RouteOutcome {
                response: RouteResponse { warnings, ..RouteResponse::default() },
                search: result,
                ramp_cells_used: 0,
            });
        }

        let raw: Vec<PixelPoint> = result.path.iter().map(|&c| self.grid.grid_to_pixel_center(c)).collect();
        let ramp_cells_used = match self.index {
            Some(idx) if req.accessibility_mode => result.path.iter().filter(|&&c| idx.is_ramp(c)).count(),
            _ => 0,
        };

        let opts = self.options;
        let distance_meters = path_length(&raw) * opts.pixel_to_meter;
        let seconds = if opts.walking_speed_mps > 0.0 { distance_meters / opts.walking_speed_mps } else { 0.0 };
        let simplified = simplify(&raw, opts.simplify_tolerance_deg);
        let instructions = InstructionGenerator::from_options(opts).generate(&simplified);

        info!(
            algorithm = algorithm.as_str(),
            accessibility_mode = req.accessibility_mode,
            cells = result.path.len(),
            simplified = simplified.len(),
            ramp_cells_used,
            expanded = result.expanded,
            distance_meters,
            "route planned"
        );

        Ok(RouteOutcome {
            response: RouteResponse {
                path: smooth(&raw, opts.smoothing_factor),
                instructions,
                distance_meters: round_to(distance_meters, 2),
                estimated_time_minutes: round_to(seconds / 60.0, 2),
                warnings,
            },
            search: result,
            ramp_cells_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridArtifact, WALKABLE};
    use crate::instructions::ALREADY_THERE;

    fn open_grid(n: usize) -> WalkabilityGrid {
        WalkabilityGrid::from_artifact(GridArtifact { cell_size: 10, width: n, height: n, grid: vec![vec![WALKABLE; n]; n] })
            .unwrap()
    }

    #[test]
    fn straight_route_distance_and_time() {
        let g = open_grid(10);
        let cm = CostModel { wall_penalty: 0.0, ..CostModel::default() };
        let opts = RouteOptions::default();
        let out = RoutePlanner::new(&g, &cm, &opts).plan(&RouteRequest::new((5, 5), (95, 5))).unwrap();
        let r = out.response;
        // 9 cells of 10 px at 0.02 m/px
        assert!((r.distance_meters - 1.8).abs() < 1e-9);
        assert!((r.estimated_time_minutes - 0.02).abs() < 1e-9);
        assert_eq!(r.instructions, vec!["Walk straight for 1.8 meters to your destination"]);
        assert_eq!(r.path.first(), Some(&PixelPoint::new(5.0, 5.0)));
        assert_eq!(r.path.last(), Some(&PixelPoint::new(95.0, 5.0)));
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn same_cell_is_already_there() {
        let g = open_grid(4);
        let cm = CostModel::default();
        let opts = RouteOptions::default();
        let out = RoutePlanner::new(&g, &cm, &opts).plan(&RouteRequest::new((12, 12), (18, 17))).unwrap();
        assert_eq!(out.response.path, vec![PixelPoint::new(15.0, 15.0)]);
        assert_eq!(out.response.instructions, vec![ALREADY_THERE]);
        assert_eq!(out.response.distance_meters, 0.0);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let g = open_grid(4);
        let cm = CostModel::default();
        let opts = RouteOptions::default();
        let planner = RoutePlanner::new(&g, &cm, &opts);
        let err = planner.plan(&RouteRequest::new((5, 5), (400, 5))).unwrap_err();
        assert!(matches!(err, CoreError::OutOfBounds { x: 400, y: 5 }));
        assert!(planner.plan(&RouteRequest::new((-1, 5), (5, 5))).is_err());
    }

    #[test]
    fn response_json_shape() {
        let r = RouteResponse::default();
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["path"], serde_json::json!([]));
        assert_eq!(v["instructions"], serde_json::json!([]));
        assert!(v.get("warnings").is_none());
        let req: RouteRequest =
            serde_json::from_value(serde_json::json!({"start_x": 1, "start_y": 2, "end_x": 3, "end_y": 4})).unwrap();
        assert!(!req.accessibility_mode);
        assert_eq!(req.algorithm, None);
    }
}
