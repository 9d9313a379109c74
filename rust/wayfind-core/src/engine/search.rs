use std::collections::BinaryHeap;

use bitvec::vec::BitVec;
use serde::Serialize;
use tracing::{debug, warn};

use crate::accessibility::AccessibilityIndex;
use crate::cost::CostModel;
use crate::grid::WalkabilityGrid;
use crate::models::GridCoord;
use crate::options::Algorithm;

use super::heuristics::Heuristic;
use super::neighbors::NeighborProvider;
use super::queue::QueueNode;

const NO_PARENT: u32 = u32::MAX;

#[derive(Clone, Copy, Debug)]
pub struct SearchParams {
    pub start: GridCoord,
    pub goal: GridCoord,
    pub algorithm: Algorithm,
    pub accessibility_mode: bool,
}

impl SearchParams {
    pub fn new(start: GridCoord, goal: GridCoord) -> Self {
        Self { start, goal, algorithm: Algorithm::default(), accessibility_mode: false }
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn accessible(mut self, on: bool) -> Self {
        self.accessibility_mode = on;
        self
    }
}

/// Recoverable conditions a caller may want to surface next to the route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchWarning {
    StartInStairArea,
    GoalInStairArea,
}

impl SearchWarning {
    pub fn message(self) -> &'static str {
        match self {
            SearchWarning::StartInStairArea => "start point lies inside a stair area",
            SearchWarning::GoalInStairArea => "destination lies inside a stair area",
        }
    }
}

/// Why a search produced no path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    StartNotWalkable,
    GoalNotWalkable,
    NoPath,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureReason::StartNotWalkable => "start-not-walkable",
            FailureReason::GoalNotWalkable => "goal-not-walkable",
            FailureReason::NoPath => "no-path",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub found: bool,
    pub path: Vec<GridCoord>,
    pub cost: f64,
    /// Cells popped and settled.
    pub expanded: u64,
    pub reason: Option<FailureReason>,
    pub warnings: Vec<SearchWarning>,
}

impl SearchResult {
    fn not_found(reason: FailureReason, expanded: u64, warnings: Vec<SearchWarning>) -> Self {
        Self { found: false, path: Vec::new(), cost: 0.0, expanded, reason: Some(reason), warnings }
    }
}

/// Per-invocation search state. Dense arrays indexed by row-major cell index.
pub struct SearchContext {
    g: Vec<f64>,
    parent: Vec<u32>,
    closed: BitVec,
    open: BinaryHeap<QueueNode>,
    seq: u64,
}

impl SearchContext {
    pub fn new(cells: usize) -> Self {
        Self {
            g: vec![f64::INFINITY; cells],
            parent: vec![NO_PARENT; cells],
            closed: BitVec::repeat(false, cells),
            open: BinaryHeap::new(),
            seq: 0,
        }
    }

    fn push(&mut self, cell: GridCoord, g: f64, h: f64) {
        self.open.push(QueueNode { cell, f: g + h, g, h, seq: self.seq });
        self.seq += 1;
    }
}

/// Shortest-path search over a walkability grid. Dijkstra and A* share one loop
/// and differ only in the heuristic.
pub struct PathSearch<'a> {
    grid: &'a WalkabilityGrid,
    cost_model: &'a CostModel,
    index: Option<&'a AccessibilityIndex>,
}

impl<'a> PathSearch<'a> {
    pub fn new(grid: &'a WalkabilityGrid, cost_model: &'a CostModel) -> Self {
        Self { grid, cost_model, index: None }
    }

    pub fn with_accessibility(mut self, index: &'a AccessibilityIndex) -> Self {
        self.index = Some(index);
        self
    }

    pub fn dijkstra(&self, start: GridCoord, goal: GridCoord, accessibility_mode: bool) -> SearchResult {
        self.find_path(&SearchParams::new(start, goal).algorithm(Algorithm::Dijkstra).accessible(accessibility_mode))
    }

    pub fn astar(&self, start: GridCoord, goal: GridCoord, accessibility_mode: bool) -> SearchResult {
        self.find_path(&SearchParams::new(start, goal).algorithm(Algorithm::AStar).accessible(accessibility_mode))
    }

    pub fn find_path(&self, params: &SearchParams) -> SearchResult {
        let SearchParams { start, goal, algorithm, accessibility_mode } = *params;
        let grid = self.grid;

        if !grid.is_walkable(start.x, start.y) {
            warn!(x = start.x, y = start.y, "start cell is not walkable");
            return SearchResult::not_found(FailureReason::StartNotWalkable, 0, Vec::new());
        }
        if !grid.is_walkable(goal.x, goal.y) {
            warn!(x = goal.x, y = goal.y, "goal cell is not walkable");
            return SearchResult::not_found(FailureReason::GoalNotWalkable, 0, Vec::new());
        }

        let blocked = if accessibility_mode { self.index.map(AccessibilityIndex::stair_blocked_cells) } else { None };
        let provider = NeighborProvider::new(grid, blocked);

        let mut warnings = Vec::new();
        if provider.is_blocked(start) {
            warn!(x = start.x, y = start.y, "start point is in a stair area");
            warnings.push(SearchWarning::StartInStairArea);
        }
        if provider.is_blocked(goal) {
            warn!(x = goal.x, y = goal.y, "destination is in a stair area");
            warnings.push(SearchWarning::GoalInStairArea);
        }

        if start == goal {
            return SearchResult { found: true, path: vec![start], cost: 0.0, expanded: 0, reason: None, warnings };
        }

        let heuristic = match algorithm {
            Algorithm::AStar => Heuristic::new(goal, self.cost_model.min_step_cost(self.index, accessibility_mode)),
            Algorithm::Dijkstra => Heuristic::zero(goal),
        };

        let mut ctx = SearchContext::new(grid.cell_count());
        let s = grid.cell_index(start);
        ctx.g[s] = 0.0;
        ctx.push(start, 0.0, heuristic.estimate(start));

        let mut expanded: u64 = 0;
        while let Some(node) = ctx.open.pop() {
            let u = grid.cell_index(node.cell);
            // Discard stale
            if ctx.closed[u] {
                continue;
            }
            ctx.closed.set(u, true);
            expanded += 1;

            if node.cell == goal {
                let path = reconstruct(grid, &ctx.parent, u);
                debug!(
                    algorithm = algorithm.as_str(),
                    accessibility_mode,
                    expanded,
                    path_len = path.len(),
                    cost = node.g,
                    "search complete"
                );
                return SearchResult { found: true, path, cost: node.g, expanded, reason: None, warnings };
            }

            for next in provider.neighbors(node.cell) {
                let v = grid.cell_index(next);
                if ctx.closed[v] {
                    continue;
                }
                let step = self.cost_model.edge_cost(grid, self.index, node.cell, next, accessibility_mode);
                let tentative = node.g + step;
                if tentative < ctx.g[v] {
                    ctx.g[v] = tentative;
                    ctx.parent[v] = u as u32;
                    ctx.push(next, tentative, heuristic.estimate(next));
                }
            }
        }

        if accessibility_mode {
            warn!(
                start = ?start,
                goal = ?goal,
                expanded,
                "no path found; stair areas may block every accessible route"
            );
        } else {
            warn!(start = ?start, goal = ?goal, expanded, "no path found");
        }
        SearchResult::not_found(FailureReason::NoPath, expanded, warnings)
    }
}

fn reconstruct(grid: &WalkabilityGrid, parent: &[u32], goal: usize) -> Vec<GridCoord> {
    let mut path = vec![grid.cell_at(goal)];
    let mut cur = parent[goal];
    while cur != NO_PARENT {
        path.push(grid.cell_at(cur as usize));
        cur = parent[cur as usize];
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{AccessibilityFeature, FeatureKind};
    use crate::grid::{GridArtifact, WALKABLE, WALL};

    fn grid(rows: &[&str]) -> WalkabilityGrid {
        let g: Vec<Vec<u8>> = rows
            .iter()
            .map(|r| r.chars().map(|c| if c == '#' { WALL } else { WALKABLE }).collect())
            .collect();
        WalkabilityGrid::from_artifact(GridArtifact { cell_size: 10, width: g[0].len(), height: g.len(), grid: g })
            .unwrap()
    }

    #[test]
    fn straight_corridor() {
        let g = grid(&["....."]);
        let cm = CostModel::default();
        let res = PathSearch::new(&g, &cm).astar(GridCoord::new(0, 0), GridCoord::new(4, 0), false);
        assert!(res.found);
        assert_eq!(res.path.len(), 5);
        assert!((res.cost - 4.0).abs() < 1e-9);
        assert!(res.reason.is_none());
    }

    #[test]
    fn start_equals_goal() {
        let g = grid(&["..", ".."]);
        let cm = CostModel::default();
        let res = PathSearch::new(&g, &cm).dijkstra(GridCoord::new(1, 1), GridCoord::new(1, 1), false);
        assert!(res.found);
        assert_eq!(res.path, vec![GridCoord::new(1, 1)]);
        assert_eq!(res.cost, 0.0);
    }

    #[test]
    fn wall_endpoints_yield_empty_path() {
        let g = grid(&[".#", ".."]);
        let cm = CostModel::default();
        let search = PathSearch::new(&g, &cm);
        let res = search.astar(GridCoord::new(1, 0), GridCoord::new(0, 0), false);
        assert!(!res.found);
        assert_eq!(res.reason, Some(FailureReason::StartNotWalkable));
        let res = search.astar(GridCoord::new(0, 0), GridCoord::new(5, 5), false);
        assert_eq!(res.reason, Some(FailureReason::GoalNotWalkable));
    }

    #[test]
    fn wall_split_is_unreachable_for_both() {
        let g = grid(&["..#..", "..#..", "..#.."]);
        let cm = CostModel::default();
        let search = PathSearch::new(&g, &cm);
        for res in [
            search.dijkstra(GridCoord::new(0, 0), GridCoord::new(4, 2), false),
            search.astar(GridCoord::new(0, 0), GridCoord::new(4, 2), false),
        ] {
            assert!(!res.found);
            assert!(res.path.is_empty());
            assert_eq!(res.reason, Some(FailureReason::NoPath));
            assert_eq!(res.expanded, 6);
        }
    }

    #[test]
    fn prefers_corridor_centre() {
        // Hugging the top wall costs more than the middle row.
        let g = grid(&["#######", ".......", ".......", ".......", "#######"]);
        let cm = CostModel::default();
        let res = PathSearch::new(&g, &cm).dijkstra(GridCoord::new(0, 2), GridCoord::new(6, 2), false);
        assert!(res.path.iter().all(|c| c.y == 2));
    }

    #[test]
    fn ramp_detour_is_taken_in_accessibility_mode() {
        let g = grid(&[".....", ".....", "....."]);
        let ramp = AccessibilityFeature::new("ramp", FeatureKind::Ramp, None, 25.0, 5.0);
        let idx = AccessibilityIndex::build(&g, &[ramp], 0);
        let cm = CostModel { wall_penalty: 0.0, ..CostModel::default() };
        let search = PathSearch::new(&g, &cm).with_accessibility(&idx);
        let res = search.dijkstra(GridCoord::new(0, 0), GridCoord::new(4, 0), true);
        assert!(res.path.contains(&GridCoord::new(2, 0)));
        assert!((res.cost - 3.6).abs() < 1e-9);
    }

    #[test]
    fn stair_area_endpoints_raise_warnings() {
        let g = grid(&["....", "....", "...."]);
        let stairs = AccessibilityFeature::new("stairs", FeatureKind::Stairs, None, 5.0, 5.0);
        let idx = AccessibilityIndex::build(&g, &[stairs], 0);
        let cm = CostModel::default();
        let search = PathSearch::new(&g, &cm).with_accessibility(&idx);
        let res = search.astar(GridCoord::new(0, 0), GridCoord::new(3, 2), true);
        assert!(res.found);
        assert_eq!(res.warnings, vec![SearchWarning::StartInStairArea]);
        assert!(!res.path[1..].contains(&GridCoord::new(0, 0)));
        let res = search.astar(GridCoord::new(3, 2), GridCoord::new(0, 0), true);
        assert!(!res.found);
        assert_eq!(res.warnings, vec![SearchWarning::GoalInStairArea]);
        let res = search.astar(GridCoord::new(3, 2), GridCoord::new(0, 0), false);
        assert!(res.found);
        assert!(res.warnings.is_empty());
    }

    #[test]
    fn failure_reasons_serialize_as_kebab_case() {
        for r in [FailureReason::StartNotWalkable, FailureReason::GoalNotWalkable, FailureReason::NoPath] {
            assert_eq!(serde_json::to_value(r).unwrap(), serde_json::json!(r.as_str()));
        }
        assert_eq!(serde_json::to_value(FailureReason::NoPath).unwrap(), serde_json::json!("no-path"));
    }
}
