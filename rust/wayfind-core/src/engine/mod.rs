pub mod heuristics;
pub mod neighbors;
pub mod queue;
pub mod search;

pub use heuristics::{manhattan, Heuristic};
pub use neighbors::NeighborProvider;
pub use queue::QueueNode;
pub use search::{FailureReason, PathSearch, SearchContext, SearchParams, SearchResult, SearchWarning};
