// SPDX-License-Identifier: Apache-2.0

use crate::decode;
use crate::{internal, StoreError};
use notes_api::{ListWindow, ProjectGoalCreate, ProjectGoalUpdate};
use notes_model::{ProjectGoal, Timestamp, DEFAULT_STATUS};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTITY: &str = "project goal";
const COLS: &str = "id, title, description, status, due_date, project_id, created_at, updated_at";

fn row_to_goal(row: &Row<'_>) -> rusqlite::Result<ProjectGoal> {
    Ok(ProjectGoal {
        id: decode::record_id(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
        due_date: decode::optional_timestamp(row, 4)?,
        project_id: decode::project_id(row, 5)?,
        created_at: decode::timestamp(row, 6)?,
        updated_at: decode::timestamp(row, 7)?,
    })
}

fn fetch(conn: &Connection, id: i64) -> Result<ProjectGoal, StoreError> {
    conn.prepare_cached(&format!("SELECT {COLS} FROM project_goals WHERE id = ?1"))
        .map_err(internal)?
        .query_row(params![id], row_to_goal)
        .optional()
        .map_err(StoreError::from_sqlite)?
        .ok_or(StoreError::NotFound { entity: ENTITY, id })
}

pub fn create(conn: &mut Connection, input: &ProjectGoalCreate) -> Result<ProjectGoal, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let now = decode::timestamp_text(Timestamp::now())?;
    let status = input.status.as_deref().unwrap_or(DEFAULT_STATUS);
    let due_date = input.due_date.map(decode::timestamp_text).transpose()?;
    tx.prepare_cached(
        "INSERT INTO project_goals(title, description, status, due_date, project_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .map_err(internal)?
    .execute(params![
        input.title,
        input.description,
        status,
        due_date,
        input.project_id,
        now
    ])
    .map_err(StoreError::from_sqlite)?;
    let created = fetch(&tx, tx.last_insert_rowid())?;
    tx.commit().map_err(internal)?;
    Ok(created)
}

pub fn list(conn: &Connection, window: ListWindow) -> Result<Vec<ProjectGoal>, StoreError> {
    let offset = match i64::try_from(window.skip) {
        Ok(offset) => offset,
        Err(_) => return Ok(Vec::new()),
    };
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLS} FROM project_goals ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        ))
        .map_err(internal)?;
    let rows = stmt
        .query_map(params![window.limit as i64, offset], row_to_goal)
        .map_err(internal)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StoreError::from_sqlite)
}

pub fn list_for_project(conn: &Connection, project_id: i64) -> Result<Vec<ProjectGoal>, StoreError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLS} FROM project_goals WHERE project_id = ?1 ORDER BY id ASC"
        ))
        .map_err(internal)?;
    let rows = stmt
        .query_map(params![project_id], row_to_goal)
        .map_err(internal)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StoreError::from_sqlite)
}

pub fn get(conn: &Connection, id: i64) -> Result<ProjectGoal, StoreError> {
    fetch(conn, id)
}

pub fn update(
    conn: &mut Connection,
    id: i64,
    patch: &ProjectGoalUpdate,
) -> Result<ProjectGoal, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let current = fetch(&tx, id)?;
    let title = patch.title.as_deref().unwrap_or(&current.title);
    let description = match &patch.description {
        Some(value) => value.as_deref(),
        None => current.description.as_deref(),
    };
    let status = patch.status.as_deref().unwrap_or(&current.status);
    let due_date = match patch.due_date {
        Some(value) => value,
        None => current.due_date,
    }
    .map(decode::timestamp_text)
    .transpose()?;
    let project_id = patch.project_id.unwrap_or(current.project_id.as_i64());
    let updated_at = decode::timestamp_text(Timestamp::strictly_after(current.updated_at))?;
    tx.prepare_cached(
        "UPDATE project_goals SET title = ?1, description = ?2, status = ?3, due_date = ?4,
         project_id = ?5, updated_at = ?6 WHERE id = ?7",
    )
    .map_err(internal)?
    .execute(params![
        title,
        description,
        status,
        due_date,
        project_id,
        updated_at,
        id
    ])
    .map_err(StoreError::from_sqlite)?;
    let updated = fetch(&tx, id)?;
    tx.commit().map_err(internal)?;
    Ok(updated)
}

pub fn delete(conn: &mut Connection, id: i64) -> Result<ProjectGoal, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let existing = fetch(&tx, id)?;
    tx.execute("DELETE FROM project_goals WHERE id = ?1", params![id])
        .map_err(StoreError::from_sqlite)?;
    tx.commit().map_err(internal)?;
    Ok(existing)
}
