use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("malformed grid artifact: {0}")]
    MalformedGrid(String),
    #[error("pixel ({x}, {y}) lies outside the grid")]
    OutOfBounds { x: i64, y: i64 },
    #[error("invalid cost model: {0}")]
    InvalidCostModel(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
