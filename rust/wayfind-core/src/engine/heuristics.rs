use crate::models::GridCoord;

#[inline]
pub fn manhattan(a: GridCoord, b: GridCoord) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Manhattan distance to a fixed goal, scaled by the cheapest possible step.
/// A zero scale turns A* into uniform-cost search.
#[derive(Clone, Copy, Debug)]
pub struct Heuristic {
    goal: GridCoord,
    scale: f64,
}

impl Heuristic {
    pub fn new(goal: GridCoord, min_step_cost: f64) -> Self {
        Self { goal, scale: min_step_cost.max(0.0) }
    }

    pub fn zero(goal: GridCoord) -> Self {
        Self { goal, scale: 0.0 }
    }

    #[inline]
    pub fn estimate(&self, c: GridCoord) -> f64 {
        manhattan(c, self.goal) as f64 * self.scale
    }
}
