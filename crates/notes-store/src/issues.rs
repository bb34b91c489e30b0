// SPDX-License-Identifier: Apache-2.0

use crate::decode;
use crate::{internal, StoreError};
use notes_api::{IssueCreate, IssueUpdate, ListWindow};
use notes_model::{Issue, Timestamp, DEFAULT_STATUS};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTITY: &str = "issue";
const COLS: &str = "id, title, description, status, project_id, created_at, updated_at";

fn row_to_issue(row: &Row<'_>) -> rusqlite::Result<Issue> {
    Ok(Issue {
        id: decode::record_id(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
        project_id: decode::project_id(row, 4)?,
        created_at: decode::timestamp(row, 5)?,
        updated_at: decode::timestamp(row, 6)?,
    })
}

fn fetch(conn: &Connection, id: i64) -> Result<Issue, StoreError> {
    conn.prepare_cached(&format!("SELECT {COLS} FROM issues WHERE id = ?1"))
        .map_err(internal)?
        .query_row(params![id], row_to_issue)
        .optional()
        .map_err(StoreError::from_sqlite)?
        .ok_or(StoreError::NotFound { entity: ENTITY, id })
}

pub fn create(conn: &mut Connection, input: &IssueCreate) -> Result<Issue, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let now = decode::timestamp_text(Timestamp::now())?;
    tx.prepare_cached(
        "INSERT INTO issues(title, description, status, project_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .map_err(internal)?
    .execute(params![
        input.title,
        input.description,
        input.status.as_deref().unwrap_or(DEFAULT_STATUS),
        input.project_id,
        now,
    ])
    .map_err(StoreError::from_sqlite)?;
    let created = fetch(&tx, tx.last_insert_rowid())?;
    tx.commit().map_err(internal)?;
    Ok(created)
}

pub fn list(conn: &Connection, window: ListWindow) -> Result<Vec<Issue>, StoreError> {
    let offset = match i64::try_from(window.skip) {
        Ok(offset) => offset,
        Err(_) => return Ok(Vec::new()),
    };
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLS} FROM issues ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        ))
        .map_err(internal)?;
    let rows = stmt
        .query_map(params![window.limit as i64, offset], row_to_issue)
        .map_err(internal)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StoreError::from_sqlite)
}

pub fn list_for_project(conn: &Connection, project_id: i64) -> Result<Vec<Issue>, StoreError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLS} FROM issues WHERE project_id = ?1 ORDER BY id ASC"
        ))
        .map_err(internal)?;
    let rows = stmt
        .query_map(params![project_id], row_to_issue)
        .map_err(internal)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StoreError::from_sqlite)
}

pub fn get(conn: &Connection, id: i64) -> Result<Issue, StoreError> {
    fetch(conn, id)
}

pub fn update(conn: &mut Connection, id: i64, patch: &IssueUpdate) -> Result<Issue, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let current = fetch(&tx, id)?;
    let title = patch.title.as_deref().unwrap_or(&current.title);
    let description = match &patch.description {
        Some(value) => value.as_deref(),
        None => current.description.as_deref(),
    };
    let status = patch.status.as_deref().unwrap_or(&current.status);
    let project_id = patch.project_id.unwrap_or(current.project_id.as_i64());
    let updated_at = decode::timestamp_text(Timestamp::strictly_after(current.updated_at))?;
    tx.prepare_cached(
        "UPDATE issues SET title = ?1, description = ?2, status = ?3, project_id = ?4,
         updated_at = ?5 WHERE id = ?6",
    )
    .map_err(internal)?
    .execute(params![title, description, status, project_id, updated_at, id])
    .map_err(StoreError::from_sqlite)?;
    let updated = fetch(&tx, id)?;
    tx.commit().map_err(internal)?;
    Ok(updated)
}

pub fn delete(conn: &mut Connection, id: i64) -> Result<Issue, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let existing = fetch(&tx, id)?;
    tx.execute("DELETE FROM issues WHERE id = ?1", params![id])
        .map_err(StoreError::from_sqlite)?;
    tx.commit().map_err(internal)?;
    Ok(existing)
}
