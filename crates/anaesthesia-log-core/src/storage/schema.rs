//! SQLite schema definition.

/// Schema for the SQLite key-value backend.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Key-value entries (one row per storage key)
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv_entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                          -- Serialized payload (JSON)
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
