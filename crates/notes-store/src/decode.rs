// SPDX-License-Identifier: Apache-2.0

//! Row-decoding helpers shared by the entity modules. Parse failures surface
//! as `FromSqlConversionFailure` so `query_row`/`query_map` closures stay on
//! `rusqlite::Result`.

use notes_model::{ProjectId, RecordId, Timestamp};
use rusqlite::types::Type;
use rusqlite::Row;

fn conversion_failure(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn record_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<RecordId> {
    let raw: i64 = row.get(idx)?;
    RecordId::parse(raw).map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn project_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<ProjectId> {
    let raw: i64 = row.get(idx)?;
    ProjectId::parse(raw).map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Timestamp> {
    let raw: String = row.get(idx)?;
    Timestamp::parse_rfc3339(&raw).map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn optional_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Timestamp>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        None => Ok(None),
        Some(text) => Timestamp::parse_rfc3339(&text)
            .map(Some)
            .map_err(|e| conversion_failure(idx, e)),
    }
}

/// RFC3339 text for binding timestamps into SQL parameters.
pub(crate) fn timestamp_text(ts: Timestamp) -> Result<String, crate::StoreError> {
    ts.to_rfc3339()
        .map_err(|e| crate::StoreError::Internal(e.to_string()))
}
