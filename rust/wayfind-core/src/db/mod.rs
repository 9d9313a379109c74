use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::db::open::{open_read_only_with_config, DbOpenConfig};
use crate::db::queries::*;
use crate::db::rows::NodeRow;
use crate::error::Result;
use crate::features::{AccessibilityFeature, FeatureSource};

pub mod open;
pub mod queries;
pub mod rows;

pub struct FeatureDatabase {
    conn: Connection,
}

fn is_no_such_table(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.contains("no such table"),
        _ => false,
    }
}

/// Map editors have written ids both as text and as integers.
fn text_or_int(r: &Row, col: &str) -> rusqlite::Result<String> {
    match r.get_ref(col)? {
        ValueRef::Integer(i) => Ok(i.to_string()),
        ValueRef::Real(f) => Ok(f.to_string()),
        _ => r.get(col),
    }
}

fn map_node_row(r: &Row) -> rusqlite::Result<NodeRow> {
    Ok(NodeRow {
        id: text_or_int(r, "id")?,
        name: r.get("name")?,
        type_: r.get("type")?,
        accessible: r.get("accessible")?,
        x: r.get("x")?,
        y: r.get("y")?,
        is_archived: r.get::<_, Option<bool>>("is_archived")?.unwrap_or(false),
    })
}

impl FeatureDatabase {
    pub fn open_read_only_with<P: AsRef<Path>>(path: P, cfg: &DbOpenConfig) -> rusqlite::Result<Self> {
        Ok(Self { conn: open_read_only_with_config(path, cfg)? })
    }

    /// Writable handle, used by the import tooling.
    pub fn open_writable<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        Ok(Self { conn: Connection::open(path)? })
    }

    pub fn from_connection(conn: Connection) -> Self { Self { conn } }

    /// All rows including archived ones. A missing `nodes` table reads as empty.
    pub fn iter_nodes(&self) -> rusqlite::Result<Vec<NodeRow>> {
        let mut stmt = match self.conn.prepare_cached(ALL_NODES) {
            Ok(s) => s,
            Err(e) if is_no_such_table(&e) => return Ok(vec![]),
            Err(e) => return Err(e),
        };
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(map_node_row(r)?);
        }
        Ok(out)
    }

    pub fn count_active_nodes(&self) -> rusqlite::Result<i64> {
        match self.conn.query_row(ACTIVE_NODE_COUNT, [], |r| r.get(0)) {
            Err(e) if is_no_such_table(&e) => Ok(0),
            other => other,
        }
    }

    pub fn create_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(CREATE_NODES)
    }

    pub fn insert_features(&mut self, features: &[AccessibilityFeature]) -> rusqlite::Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(INSERT_NODE)?;
            for f in features {
                let row = NodeRow::from(f);
                stmt.execute(params![row.id, row.name, row.type_, row.accessible, row.x, row.y, row.is_archived])?;
            }
        }
        tx.commit()?;
        Ok(features.len())
    }

    pub fn conn(&self) -> &Connection { &self.conn }
}

/// Feature source backed by a SQLite file. Opens a fresh read-only connection per
/// query so the source itself can be shared across threads.
#[derive(Clone, Debug)]
pub struct SqliteFeatureSource {
    path: PathBuf,
    cfg: DbOpenConfig,
}

impl SqliteFeatureSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), cfg: DbOpenConfig::from_env() }
    }

    pub fn with_config(mut self, cfg: DbOpenConfig) -> Self {
        self.cfg = cfg;
        self
    }
}

impl FeatureSource for SqliteFeatureSource {
    fn features(&self) -> Result<Vec<AccessibilityFeature>> {
        let db = FeatureDatabase::open_read_only_with(&self.path, &self.cfg)?;
        let rows = db.iter_nodes()?;
        debug!(path = %self.path.display(), rows = rows.len(), "feature rows loaded");
        Ok(rows.into_iter().map(AccessibilityFeature::from).collect())
    }
}

impl FeatureSource for FeatureDatabase {
    fn features(&self) -> Result<Vec<AccessibilityFeature>> {
        Ok(self.iter_nodes()?.into_iter().map(AccessibilityFeature::from).collect())
    }
}
