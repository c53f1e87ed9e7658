//! SQLite schema for the intake store.
//!
//! Tables:
//! - `intakes`: one row per submitted request
//!
//! Timestamps are RFC 3339 TEXT written by the store; the CHECK
//! constraints mirror the enum value-constructors in `model`.

/// DDL for the intake table and its indexes.
///
/// Schema version: 1
pub const INTAKE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS intakes (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    name           TEXT NOT NULL,
    email          TEXT NOT NULL,
    description    TEXT NOT NULL,
    urgency        INTEGER NOT NULL CHECK (urgency >= 1 AND urgency <= 5),
    category       TEXT NOT NULL
        CHECK (category IN ('billing', 'technical_support', 'new_matter_project', 'other')),
    status         TEXT NOT NULL DEFAULT 'new'
        CHECK (status IN ('new', 'in_review', 'resolved')),
    internal_notes TEXT NOT NULL DEFAULT '',
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

-- Indexes for the reviewer queue filters
CREATE INDEX IF NOT EXISTS idx_intakes_status ON intakes(status);
CREATE INDEX IF NOT EXISTS idx_intakes_category ON intakes(category);
CREATE INDEX IF NOT EXISTS idx_intakes_created_at ON intakes(created_at);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(INTAKE_SCHEMA).unwrap();
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(INTAKE_SCHEMA).unwrap();
        conn.execute_batch(INTAKE_SCHEMA).unwrap();
    }

    #[test]
    fn test_schema_rejects_out_of_range_urgency() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(INTAKE_SCHEMA).unwrap();
        let result = conn.execute(
            "INSERT INTO intakes (name, email, description, urgency, category, created_at, updated_at)
             VALUES ('a', 'a@b.c', 'd', 9, 'other', 'unix:0', 'unix:0')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_rejects_unknown_labels() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(INTAKE_SCHEMA).unwrap();
        let bad_category = conn.execute(
            "INSERT INTO intakes (name, email, description, urgency, category, created_at, updated_at)
             VALUES ('a', 'a@b.c', 'd', 3, 'spam', 'unix:0', 'unix:0')",
            [],
        );
        assert!(bad_category.is_err());
        let bad_status = conn.execute(
            "INSERT INTO intakes (name, email, description, urgency, category, status, created_at, updated_at)
             VALUES ('a', 'a@b.c', 'd', 3, 'other', 'closed', 'unix:0', 'unix:0')",
            [],
        );
        assert!(bad_status.is_err());
    }
}
