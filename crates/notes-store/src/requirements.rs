// SPDX-License-Identifier: Apache-2.0

use crate::decode;
use crate::{internal, StoreError};
use notes_api::{ListWindow, RequirementCreate, RequirementUpdate};
use notes_model::{Requirement, Timestamp, DEFAULT_PRIORITY};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTITY: &str = "requirement";
const COLS: &str = "id, title, description, priority, project_id, created_at, updated_at";

fn row_to_requirement(row: &Row<'_>) -> rusqlite::Result<Requirement> {
    Ok(Requirement {
        id: decode::record_id(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        priority: row.get(3)?,
        project_id: decode::project_id(row, 4)?,
        created_at: decode::timestamp(row, 5)?,
        updated_at: decode::timestamp(row, 6)?,
    })
}

fn fetch(conn: &Connection, id: i64) -> Result<Requirement, StoreError> {
    conn.prepare_cached(&format!("SELECT {COLS} FROM requirements WHERE id = ?1"))
        .map_err(internal)?
        .query_row(params![id], row_to_requirement)
        .optional()
        .map_err(StoreError::from_sqlite)?
        .ok_or(StoreError::NotFound { entity: ENTITY, id })
}

pub fn create(conn: &mut Connection, input: &RequirementCreate) -> Result<Requirement, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let now = decode::timestamp_text(Timestamp::now())?;
    let priority = input.priority.as_deref().unwrap_or(DEFAULT_PRIORITY);
    tx.prepare_cached(
        "INSERT INTO requirements(title, description, priority, project_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .map_err(internal)?
    .execute(params![
        input.title,
        input.description,
        priority,
        input.project_id,
        now
    ])
    .map_err(StoreError::from_sqlite)?;
    let created = fetch(&tx, tx.last_insert_rowid())?;
    tx.commit().map_err(internal)?;
    Ok(created)
}

pub fn list(conn: &Connection, window: ListWindow) -> Result<Vec<Requirement>, StoreError> {
    let offset = match i64::try_from(window.skip) {
        Ok(offset) => offset,
        Err(_) => return Ok(Vec::new()),
    };
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLS} FROM requirements ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        ))
        .map_err(internal)?;
    let rows = stmt
        .query_map(
            params![window.limit as i64, offset],
            row_to_requirement,
        )
        .map_err(internal)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StoreError::from_sqlite)
}

pub fn list_for_project(
    conn: &Connection,
    project_id: i64,
) -> Result<Vec<Requirement>, StoreError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLS} FROM requirements WHERE project_id = ?1 ORDER BY id ASC"
        ))
        .map_err(internal)?;
    let rows = stmt
        .query_map(params![project_id], row_to_requirement)
        .map_err(internal)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StoreError::from_sqlite)
}

pub fn get(conn: &Connection, id: i64) -> Result<Requirement, StoreError> {
    fetch(conn, id)
}

pub fn update(
    conn: &mut Connection,
    id: i64,
    patch: &RequirementUpdate,
) -> Result<Requirement, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let current = fetch(&tx, id)?;
    let title = patch.title.as_deref().unwrap_or(&current.title);
    let description = match &patch.description {
        Some(value) => value.as_deref(),
        None => current.description.as_deref(),
    };
    let priority = patch.priority.as_deref().unwrap_or(&current.priority);
    let project_id = patch.project_id.unwrap_or(current.project_id.as_i64());
    let updated_at = decode::timestamp_text(Timestamp::strictly_after(current.updated_at))?;
    tx.prepare_cached(
        "UPDATE requirements SET title = ?1, description = ?2, priority = ?3, project_id = ?4,
         updated_at = ?5 WHERE id = ?6",
    )
    .map_err(internal)?
    .execute(params![title, description, priority, project_id, updated_at, id])
    .map_err(StoreError::from_sqlite)?;
    let updated = fetch(&tx, id)?;
    tx.commit().map_err(internal)?;
    Ok(updated)
}

pub fn delete(conn: &mut Connection, id: i64) -> Result<Requirement, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let existing = fetch(&tx, id)?;
    tx.execute("DELETE FROM requirements WHERE id = ?1", params![id])
        .map_err(StoreError::from_sqlite)?;
    tx.commit().map_err(internal)?;
    Ok(existing)
}
