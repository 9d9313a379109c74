use serde::{Deserialize, Serialize};

use crate::accessibility::AccessibilityIndex;
use crate::error::{CoreError, Result};
use crate::grid::WalkabilityGrid;
use crate::models::GridCoord;

pub const DEFAULT_BASE_COST: f64 = 1.0;
pub const DEFAULT_WALL_PENALTY: f64 = 0.3;
pub const DEFAULT_RAMP_COST: f64 = 0.6;

/// Cost of entering a cell. Every traversable edge costs a positive finite amount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    pub base_cost: f64,
    /// Added per wall among the 8 cells around the entered cell.
    pub wall_penalty: f64,
    /// Replaces the whole cost of entering a ramp cell in accessibility mode.
    pub ramp_cost: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            base_cost: DEFAULT_BASE_COST,
            wall_penalty: DEFAULT_WALL_PENALTY,
            ramp_cost: DEFAULT_RAMP_COST,
        }
    }
}

impl CostModel {
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.base_cost) {
            return Err(CoreError::InvalidCostModel(format!("base_cost must be positive, got {}", self.base_cost)));
        }
        if !positive(self.ramp_cost) {
            return Err(CoreError::InvalidCostModel(format!("ramp_cost must be positive, got {}", self.ramp_cost)));
        }
        if !self.wall_penalty.is_finite() || self.wall_penalty < 0.0 {
            return Err(CoreError::InvalidCostModel(format!(
                "wall_penalty must be non-negative, got {}",
                self.wall_penalty
            )));
        }
        Ok(())
    }

    pub fn edge_cost(
        &self,
        grid: &WalkabilityGrid,
        index: Option<&AccessibilityIndex>,
        _from: GridCoord,
        to: GridCoord,
        accessibility_mode: bool,
    ) -> f64 {
        if accessibility_mode && index.is_some_and(|idx| idx.is_ramp(to)) {
            return self.ramp_cost;
        }
        self.base_cost + self.wall_penalty * grid.adjacent_walls(to) as f64
    }

    /// Lower bound on the cost of any single step under the given mode.
    pub fn min_step_cost(&self, index: Option<&AccessibilityIndex>, accessibility_mode: bool) -> f64 {
        if accessibility_mode && index.is_some_and(AccessibilityIndex::has_ramps) {
            self.base_cost.min(self.ramp_cost)
        } else {
            self.base_cost
        }
    }
}
