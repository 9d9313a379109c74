use anyhow::Result;
use serde::Serialize;
use wayfind_core::{
    Algorithm, CostModel, FailureReason, RouteOptions, RoutePlanner, RouteRequest, RouteResponse, WalkabilityGrid,
};

use crate::commands::build_index;
use crate::{EndpointArgs, FeatureArgs};

#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub algorithm: Algorithm,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    pub cells: usize,
    pub cost: f64,
    pub expanded: u64,
    pub ramp_cells_used: usize,
    pub response: RouteResponse,
}

pub fn run(
    grid: &WalkabilityGrid,
    features: &FeatureArgs,
    endpoints: &EndpointArgs,
    algorithm: Algorithm,
) -> Result<RouteReport> {
    // Standard mode never needs the feature source.
    let index = if endpoints.accessible { Some(build_index(grid, features)?) } else { None };
    let cost_model = CostModel::default();
    let options = RouteOptions { algorithm, ..RouteOptions::default() };
    let mut planner = RoutePlanner::new(grid, &cost_model, &options);
    if let Some(idx) = index.as_ref() {
        planner = planner.with_accessibility(idx);
    }
    let mut req = RouteRequest::new(endpoints.start, endpoints.end);
    req.accessibility_mode = endpoints.accessible;
    let out = planner.plan(&req)?;
    Ok(RouteReport {
        algorithm,
        found: out.search.found,
        reason: out.search.reason,
        cells: out.search.path.len(),
        cost: out.search.cost,
        expanded: out.search.expanded,
        ramp_cells_used: out.ramp_cells_used,
        response: out.response,
    })
}
