pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod state;

pub use config::Config;
pub use errors::AppError;
pub use routes::build_router;
pub use state::AppState;
