// SPDX-License-Identifier: Apache-2.0

//! Project CRUD. The root aggregate: dependents reference `projects.id`, and
//! a project cannot be deleted while any dependent rows remain.

use crate::decode;
use crate::{internal, StoreError};
use notes_api::{ListWindow, ProjectCreate, ProjectUpdate};
use notes_model::{Project, ProjectDetail, Timestamp};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTITY: &str = "project";

fn row_to_project(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: decode::record_id(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: decode::timestamp(row, 3)?,
        updated_at: decode::timestamp(row, 4)?,
    })
}

fn fetch(conn: &Connection, id: i64) -> Result<Project, StoreError> {
    conn.prepare_cached(
        "SELECT id, name, description, created_at, updated_at FROM projects WHERE id = ?1",
    )
    .map_err(internal)?
    .query_row(params![id], row_to_project)
    .optional()
    .map_err(StoreError::from_sqlite)?
    .ok_or(StoreError::NotFound { entity: ENTITY, id })
}

pub fn create(conn: &mut Connection, input: &ProjectCreate) -> Result<Project, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let now = decode::timestamp_text(Timestamp::now())?;
    tx.prepare_cached(
        "INSERT INTO projects(name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
    )
    .map_err(internal)?
    .execute(params![input.name, input.description, now])
    .map_err(StoreError::from_sqlite)?;
    let created = fetch(&tx, tx.last_insert_rowid())?;
    tx.commit().map_err(internal)?;
    Ok(created)
}

pub fn list(conn: &Connection, window: ListWindow) -> Result<Vec<Project>, StoreError> {
    // A skip past i64::MAX is past any possible rowid; `as` would wrap it
    // negative and sqlite reads a negative OFFSET as 0.
    let offset = match i64::try_from(window.skip) {
        Ok(offset) => offset,
        Err(_) => return Ok(Vec::new()),
    };
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, name, description, created_at, updated_at FROM projects
             ORDER BY id ASC LIMIT ?1 OFFSET ?2",
        )
        .map_err(internal)?;
    let rows = stmt
        .query_map(params![window.limit as i64, offset], row_to_project)
        .map_err(internal)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StoreError::from_sqlite)
}

pub fn get(conn: &Connection, id: i64) -> Result<Project, StoreError> {
    fetch(conn, id)
}

/// Project plus every dependent collection, each in insertion order.
pub fn get_detail(conn: &Connection, id: i64) -> Result<ProjectDetail, StoreError> {
    let project = fetch(conn, id)?;
    Ok(ProjectDetail {
        project,
        tasks: crate::tasks::list_for_project(conn, id)?,
        issues: crate::issues::list_for_project(conn, id)?,
        design_rules: crate::design_rules::list_for_project(conn, id)?,
        requirements: crate::requirements::list_for_project(conn, id)?,
        goals: crate::goals::list_for_project(conn, id)?,
        sbom_components: crate::sbom::list_for_project(conn, id)?,
    })
}

/// Applies only supplied fields; `updated_at` advances even for an empty
/// patch.
pub fn update(conn: &mut Connection, id: i64, patch: &ProjectUpdate) -> Result<Project, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let current = fetch(&tx, id)?;
    let name = patch.name.as_deref().unwrap_or(&current.name);
    // Some(None) is an explicit null: clear the column.
    let description = match &patch.description {
        Some(value) => value.as_deref(),
        None => current.description.as_deref(),
    };
    let updated_at = decode::timestamp_text(Timestamp::strictly_after(current.updated_at))?;
    tx.prepare_cached("UPDATE projects SET name = ?1, description = ?2, updated_at = ?3 WHERE id = ?4")
        .map_err(internal)?
        .execute(params![name, description, updated_at, id])
        .map_err(StoreError::from_sqlite)?;
    let updated = fetch(&tx, id)?;
    tx.commit().map_err(internal)?;
    Ok(updated)
}

/// Rejected with a conflict while dependent rows exist; no cascade. Returns
/// the row as it existed immediately before deletion.
pub fn delete(conn: &mut Connection, id: i64) -> Result<Project, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let existing = fetch(&tx, id)?;
    let dependents: i64 = tx
        .query_row(
            "SELECT (SELECT COUNT(*) FROM tasks WHERE project_id = ?1)
                  + (SELECT COUNT(*) FROM issues WHERE project_id = ?1)
                  + (SELECT COUNT(*) FROM design_rules WHERE project_id = ?1)
                  + (SELECT COUNT(*) FROM requirements WHERE project_id = ?1)
                  + (SELECT COUNT(*) FROM project_goals WHERE project_id = ?1)
                  + (SELECT COUNT(*) FROM sbom_components WHERE project_id = ?1)",
            params![id],
            |row| row.get(0),
        )
        .map_err(internal)?;
    if dependents > 0 {
        return Err(StoreError::Conflict(format!(
            "project {id} has {dependents} dependent records"
        )));
    }
    tx.execute("DELETE FROM projects WHERE id = ?1", params![id])
        .map_err(StoreError::from_sqlite)?;
    tx.commit().map_err(internal)?;
    Ok(existing)
}
