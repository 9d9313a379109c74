use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::info;
use wayfind_core::{
    AccessibilityIndex, CoreError, CostModel, FeatureSource, RouteOptions, RouteOutcome, RoutePlanner, RouteRequest,
    WalkabilityGrid,
};

/// Shared, read-mostly service state. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub grid: Arc<WalkabilityGrid>,
    pub cost_model: Arc<CostModel>,
    pub route_options: Arc<RouteOptions>,
    pub features: Arc<dyn FeatureSource + Send + Sync>,
    pub buffer_size: i32,
    /// Built on first use and kept until restart. Feature edits after that are not seen.
    accessibility: Arc<ArcSwapOption<AccessibilityIndex>>,
}

impl AppState {
    pub fn new(
        grid: WalkabilityGrid,
        features: Arc<dyn FeatureSource + Send + Sync>,
        cost_model: CostModel,
        route_options: RouteOptions,
        buffer_size: i32,
    ) -> Result<Self, CoreError> {
        cost_model.validate()?;
        Ok(Self {
            grid: Arc::new(grid),
            cost_model: Arc::new(cost_model),
            route_options: Arc::new(route_options),
            features,
            buffer_size,
            accessibility: Arc::new(ArcSwapOption::empty()),
        })
    }

    pub fn accessibility_loaded(&self) -> bool {
        self.accessibility.load().is_some()
    }

    /// Concurrent first callers may each build the index; the last store wins and
    /// every build is equivalent, so no lock is taken.
    pub fn accessibility_index(&self) -> Result<Arc<AccessibilityIndex>, CoreError> {
        if let Some(idx) = self.accessibility.load_full() {
            return Ok(idx);
        }
        let built = Arc::new(AccessibilityIndex::from_source(&self.grid, self.features.as_ref(), self.buffer_size)?);
        self.accessibility.store(Some(built.clone()));
        info!(ramp_cells = built.ramp_cells().len(), stair_cells = built.stair_blocked_cells().len(), "accessibility index cached");
        Ok(built)
    }

    pub fn plan(&self, req: &RouteRequest) -> Result<RouteOutcome, CoreError> {
        let index = if req.accessibility_mode { Some(self.accessibility_index()?) } else { None };
        let mut planner = RoutePlanner::new(&self.grid, &self.cost_model, &self.route_options);
        if let Some(idx) = index.as_deref() {
            planner = planner.with_accessibility(idx);
        }
        planner.plan(req)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("grid", &format_args!("{}x{}", self.grid.width(), self.grid.height()))
            .field("cost_model", &self.cost_model)
            .field("buffer_size", &self.buffer_size)
            .field("accessibility_loaded", &self.accessibility_loaded())
            .finish()
    }
}
