use std::env;
use std::fmt::{Display, Formatter};
use std::path::Path;

use rusqlite::{Connection, OpenFlags};

/// PRAGMA toggles for the read-only feature store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DbOpenConfig {
    /// PRAGMA query_only=ON.
    pub query_only: bool,
    /// PRAGMA cache_size = -kb.
    pub cache_size_kb: Option<i64>,
    pub temp_store: Option<TempStore>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TempStore { Memory, File }

impl Display for TempStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self { TempStore::Memory => write!(f, "MEMORY"), TempStore::File => write!(f, "FILE"), }
    }
}

impl Default for DbOpenConfig {
    fn default() -> Self {
        Self {
            query_only: true,
            cache_size_kb: Some(8_192),
            temp_store: Some(TempStore::Memory),
        }
    }
}

impl DbOpenConfig {
    /// Missing or unparsable values keep the defaults; explicit zero or empty disables.
    ///
    /// - WAYFIND_SQLITE_QUERY_ONLY: "1"/"0" (default 1)
    /// - WAYFIND_SQLITE_CACHE_SIZE_KB: integer KB; 0 disables
    /// - WAYFIND_SQLITE_TEMP_STORE: "MEMORY" or "FILE"; empty disables
    pub fn from_env() -> Self {
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = get("WAYFIND_SQLITE_QUERY_ONLY") { cfg.query_only = v.trim() != "0"; }
        if let Some(v) = get("WAYFIND_SQLITE_CACHE_SIZE_KB") {
            match v.trim().parse::<i64>() {
                Ok(n) if n > 0 => cfg.cache_size_kb = Some(n),
                Ok(_) => cfg.cache_size_kb = None,
                Err(_) => {}
            }
        }
        if let Some(v) = get("WAYFIND_SQLITE_TEMP_STORE") {
            cfg.temp_store = match v.trim().to_ascii_uppercase().as_str() {
                "MEMORY" => Some(TempStore::Memory),
                "FILE" => Some(TempStore::File),
                _ => None,
            };
        }
        cfg
    }
}

/// Open read-only, retrying without URI parsing if the first attempt fails.
pub fn open_read_only_with_config<P: AsRef<Path>>(path: P, cfg: &DbOpenConfig) -> rusqlite::Result<Connection> {
    let path_ref = path.as_ref();
    let conn = match Connection::open_with_flags(path_ref, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI) {
        Ok(c) => c,
        // A missing file stays an error; never create one here.
        Err(_) => Connection::open_with_flags(path_ref, OpenFlags::SQLITE_OPEN_READ_ONLY)?,
    };
    apply_pragmas(&conn, cfg);
    Ok(conn)
}

// PRAGMA failures are not fatal for reads.
fn apply_pragmas(conn: &Connection, cfg: &DbOpenConfig) {
    if cfg.query_only { let _ = conn.execute_batch("PRAGMA query_only = ON"); }
    if let Some(kb) = cfg.cache_size_kb { let _ = conn.execute_batch(&format!("PRAGMA cache_size = -{}", kb)); }
    if let Some(ts) = cfg.temp_store { let _ = conn.execute_batch(&format!("PRAGMA temp_store = {}", ts)); }
}
