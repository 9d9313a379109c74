pub const ALL_NODES: &str = "SELECT id, name, type, accessible, x, y, is_archived FROM nodes ORDER BY id";

pub const ACTIVE_NODE_COUNT: &str = "SELECT COUNT(*) FROM nodes WHERE COALESCE(is_archived, 0) = 0";

pub const CREATE_NODES: &str = "CREATE TABLE IF NOT EXISTS nodes (\
    id TEXT PRIMARY KEY, \
    name TEXT, \
    type TEXT, \
    accessible INTEGER, \
    x REAL NOT NULL, \
    y REAL NOT NULL, \
    is_archived INTEGER NOT NULL DEFAULT 0\
    )";

pub const INSERT_NODE: &str = "INSERT OR REPLACE INTO nodes (id, name, type, accessible, x, y, is_archived) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
