use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use wayfind_core::{CostModel, WalkabilityGrid};
use wayfind_service::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cfg = Config::from_env().context("reading configuration")?;
    let grid = WalkabilityGrid::load(&cfg.grid_path)
        .with_context(|| format!("loading grid artifact {}", cfg.grid_path.display()))?;

    let state = AppState::new(grid, cfg.feature_source(), CostModel::default(), cfg.route_options(), cfg.buffer_size)
        .context("building service state")?;
    if cfg.warm_accessibility {
        if let Err(e) = state.accessibility_index() {
            warn!(error=%e, "accessibility index warm-up failed; will retry on first request");
        }
    }

    let addr = cfg.addr()?;
    let app = build_router(state);
    info!(core_version=%wayfind_core::version(), addr=%addr, "starting wayfind-service");
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
