//! IntakeStore: SQLite-backed persistence for intake records.
//!
//! The store is an unordered, unfiltered bag of records; all queue
//! ordering and filtering semantics live in [`crate::query`]. Writes are
//! linearized through a single connection behind a mutex, so the later of
//! two overlapping updates wins.

pub mod schema;

use crate::model::{Category, IntakePatch, IntakeRecord, NewIntake, Status, Urgency};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use schema::INTAKE_SCHEMA;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

const INTAKE_COLUMNS: &str =
    "id, name, email, description, urgency, category, status, internal_notes, created_at, updated_at";

/// SQLite-backed intake store.
#[derive(Clone)]
pub struct IntakeStore {
    conn: Arc<Mutex<Connection>>,
}

impl IntakeStore {
    /// Open a file-backed store, creating the schema if needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init_connection(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store (for testing).
    pub fn memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_connection(conn: &Connection) -> Result<(), StoreError> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        // WAL mode for file-backed DBs (no-op for in-memory)
        let _ = conn.execute("PRAGMA journal_mode = WAL", []);
        conn.execute_batch(INTAKE_SCHEMA)?;
        Ok(())
    }

    /// Insert a new intake with the category the classifier assigned.
    ///
    /// Status is always `new`, notes start empty, and both timestamps are
    /// `now`. Returns the stored record re-read from the database, so the
    /// returned category is the persisted one.
    pub fn insert_intake(
        &self,
        intake: &NewIntake,
        category: Category,
    ) -> Result<IntakeRecord, StoreError> {
        self.insert_intake_at(intake, category, Utc::now())
    }

    /// Like [`insert_intake`](Self::insert_intake) but with an explicit
    /// creation timestamp. Use this in tests to get deterministic
    /// `created_at` ordering.
    pub fn insert_intake_at(
        &self,
        intake: &NewIntake,
        category: Category,
        now: DateTime<Utc>,
    ) -> Result<IntakeRecord, StoreError> {
        let conn = self.conn.lock().unwrap();
        let ts = now.to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO intakes (
                name, email, description, urgency, category, status,
                internal_notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                intake.name,
                intake.email,
                intake.description,
                intake.urgency.value() as i64,
                category.as_str(),
                Status::New.as_str(),
                "",
                ts,
                ts,
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, category = category.as_str(), "intake stored");
        Self::get_inner(&conn, id)?.ok_or_else(|| {
            StoreError::Database(format!("row {id} vanished after insert"))
        })
    }

    /// Fetch a single record by id.
    pub fn get_intake(&self, id: i64) -> Result<Option<IntakeRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();
        Self::get_inner(&conn, id)
    }

    /// All records, in no particular order.
    pub fn list_intakes(&self) -> Result<Vec<IntakeRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("SELECT {INTAKE_COLUMNS} FROM intakes"))?;
        let rows = stmt
            .query_map([], read_raw)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(RawIntakeRow::into_record).collect()
    }

    /// Apply a patch's fields to a record, bumping `updated_at` to
    /// `updated_at_ts` unconditionally. Returns false when no row has the
    /// given id. The SET clause is assembled from the structured patch and
    /// bound parameters only.
    pub fn update_fields(
        &self,
        id: i64,
        patch: &IntakePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();

        let status_label = patch.status.map(|s| s.as_str());
        let updated_ts = updated_at.to_rfc3339();

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();
        if let Some(ref label) = status_label {
            sets.push("status = ?");
            values.push(label);
        }
        if let Some(ref notes) = patch.internal_notes {
            sets.push("internal_notes = ?");
            values.push(notes);
        }
        sets.push("updated_at = ?");
        values.push(&updated_ts);
        values.push(&id);

        let sql = format!("UPDATE intakes SET {} WHERE id = ?", sets.join(", "));
        let affected = conn.execute(&sql, values.as_slice())?;
        Ok(affected > 0)
    }

    fn get_inner(conn: &Connection, id: i64) -> Result<Option<IntakeRecord>, StoreError> {
        let raw = conn
            .query_row(
                &format!("SELECT {INTAKE_COLUMNS} FROM intakes WHERE id = ?1"),
                [id],
                read_raw,
            )
            .optional()?;
        raw.map(RawIntakeRow::into_record).transpose()
    }
}

/// Row as stored, before label/timestamp decoding.
struct RawIntakeRow {
    id: i64,
    name: String,
    email: String,
    description: String,
    urgency: i64,
    category: String,
    status: String,
    internal_notes: String,
    created_at: String,
    updated_at: String,
}

fn read_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawIntakeRow> {
    Ok(RawIntakeRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        description: row.get(3)?,
        urgency: row.get(4)?,
        category: row.get(5)?,
        status: row.get(6)?,
        internal_notes: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl RawIntakeRow {
    fn into_record(self) -> Result<IntakeRecord, StoreError> {
        let urgency = Urgency::new(self.urgency)
            .ok_or_else(|| StoreError::Database(format!("urgency out of range: {}", self.urgency)))?;
        let category = Category::parse(&self.category)
            .ok_or_else(|| StoreError::Database(format!("unknown category: {:?}", self.category)))?;
        let status = Status::parse(&self.status)
            .ok_or_else(|| StoreError::Database(format!("unknown status: {:?}", self.status)))?;
        Ok(IntakeRecord {
            id: self.id,
            name: self.name,
            email: self.email,
            description: self.description,
            urgency,
            category,
            status,
            internal_notes: self.internal_notes,
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Database(format!("invalid timestamp {raw:?}: {e}")))
}
