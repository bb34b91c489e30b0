#![forbid(unsafe_code)]
//! Repository layer: per-entity CRUD over a rusqlite connection.
//!
//! Every operation takes an explicit `&mut Connection` — there is no global
//! engine or session state. Mutations run inside a transaction scoped to the
//! call; on any error path the transaction rolls back and nothing is left
//! partially visible. Store failures are classified into [`StoreError`] at
//! this boundary and never leak raw sqlite errors upward.

use std::fmt::{Display, Formatter};

mod decode;
mod schema;

pub mod design_rules;
pub mod goals;
pub mod issues;
pub mod projects;
pub mod requirements;
pub mod sbom;
pub mod tasks;

pub use schema::init_schema;

#[derive(Debug)]
pub enum StoreError {
    NotFound { entity: &'static str, id: i64 },
    Conflict(String),
    ForeignKey(String),
    Internal(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::Conflict(msg) | Self::ForeignKey(msg) | Self::Internal(msg) => {
                f.write_str(msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    /// Classify a raw sqlite failure. Uniqueness violations become conflicts,
    /// dangling foreign keys become reference errors, everything else is
    /// internal.
    #[must_use]
    pub fn from_sqlite(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, ref message) = err {
            match failure.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return Self::Conflict(
                        message
                            .clone()
                            .unwrap_or_else(|| "uniqueness constraint violated".to_string()),
                    );
                }
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return Self::ForeignKey("project_id does not reference an existing project".to_string());
                }
                _ => {}
            }
        }
        Self::Internal(err.to_string())
    }
}

pub(crate) fn internal(err: rusqlite::Error) -> StoreError {
    StoreError::Internal(err.to_string())
}

/// Per-connection pragmas. Foreign keys are enforced on every connection;
/// WAL keeps concurrent readers off the writer's back; the busy timeout is
/// the store's only wait, bounded by the caller's configuration.
pub fn apply_connection_pragmas(
    conn: &rusqlite::Connection,
    busy_timeout_ms: u64,
) -> Result<(), StoreError> {
    conn.execute_batch(&format!(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = {busy_timeout_ms};"
    ))
    .map_err(internal)
}
