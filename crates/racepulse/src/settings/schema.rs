//! `SQLite` schema for the settings database.

/// Key-value settings owned by the user.
pub const CREATE_SETTINGS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// Internal bookkeeping such as the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_SETTINGS_TABLE, CREATE_METADATA_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_table_columns() {
        assert!(CREATE_SETTINGS_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_SETTINGS_TABLE.contains("value TEXT NOT NULL"));
    }

    #[test]
    fn test_statements_are_idempotent() {
        for stmt in SCHEMA_STATEMENTS {
            assert!(stmt.contains("IF NOT EXISTS"));
        }
    }
}
