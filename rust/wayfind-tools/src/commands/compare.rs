use std::time::Instant;

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::info;
use wayfind_core::{Algorithm, CostModel, PathSearch, SearchParams, WalkabilityGrid};

use crate::commands::build_index;
use crate::{EndpointArgs, FeatureArgs};

#[derive(Debug, Serialize)]
pub struct AlgorithmRun {
    pub algorithm: Algorithm,
    pub found: bool,
    pub cost: f64,
    pub expanded: u64,
    pub path_cells: usize,
    pub elapsed_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct Comparison {
    pub accessibility_mode: bool,
    pub dijkstra: AlgorithmRun,
    pub astar: AlgorithmRun,
    pub costs_match: bool,
    /// Share of Dijkstra's expansions that A* avoided, in percent.
    pub expansion_saving_pct: f64,
}

pub fn run(grid: &WalkabilityGrid, features: &FeatureArgs, endpoints: &EndpointArgs) -> Result<Comparison> {
    let start = grid.pixel_to_grid(endpoints.start.0 as f64, endpoints.start.1 as f64);
    let goal = grid.pixel_to_grid(endpoints.end.0 as f64, endpoints.end.1 as f64);
    if !grid.contains(start) || !grid.contains(goal) {
        bail!("start {:?} or end {:?} lies outside the grid", endpoints.start, endpoints.end);
    }
    let index = if endpoints.accessible { Some(build_index(grid, features)?) } else { None };
    let cost_model = CostModel::default();
    let mut search = PathSearch::new(grid, &cost_model);
    if let Some(idx) = index.as_ref() {
        search = search.with_accessibility(idx);
    }

    let timed = |algorithm: Algorithm| {
        let t0 = Instant::now();
        let res = search.find_path(&SearchParams::new(start, goal).algorithm(algorithm).accessible(endpoints.accessible));
        AlgorithmRun {
            algorithm,
            found: res.found,
            cost: res.cost,
            expanded: res.expanded,
            path_cells: res.path.len(),
            elapsed_ms: t0.elapsed().as_secs_f64() * 1000.0,
        }
    };
    let dijkstra = timed(Algorithm::Dijkstra);
    let astar = timed(Algorithm::AStar);

    let costs_match = dijkstra.found == astar.found && (dijkstra.cost - astar.cost).abs() < 1e-6;
    let expansion_saving_pct = if dijkstra.expanded > 0 {
        (1.0 - astar.expanded as f64 / dijkstra.expanded as f64) * 100.0
    } else {
        0.0
    };
    info!(
        dijkstra_expanded = dijkstra.expanded,
        astar_expanded = astar.expanded,
        costs_match,
        "comparison done"
    );
    Ok(Comparison { accessibility_mode: endpoints.accessible, dijkstra, astar, costs_match, expansion_saving_pct })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{across_the_wall, no_features, split_grid};

    #[test]
    fn both_algorithms_agree_and_astar_expands_less() {
        let c = run(&split_grid(), &no_features(), &across_the_wall(false)).unwrap();
        assert!(c.dijkstra.found && c.astar.found);
        assert!(c.costs_match);
        assert_eq!(c.dijkstra.path_cells, c.astar.path_cells);
        assert!(c.astar.expanded <= c.dijkstra.expanded);
        assert!(c.expansion_saving_pct >= 0.0);
    }

    #[test]
    fn rejects_endpoints_outside_the_grid() {
        let mut ends = across_the_wall(false);
        ends.start = (-5, 0);
        assert!(run(&split_grid(), &no_features(), &ends).is_err());
    }
}
