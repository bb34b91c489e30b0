// SPDX-License-Identifier: Apache-2.0

use crate::decode;
use crate::{internal, StoreError};
use notes_api::{ListWindow, SbomComponentCreate, SbomComponentUpdate};
use notes_model::{SbomComponent, Timestamp};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTITY: &str = "sbom component";
const COLS: &str = "id, component_name, version, license, project_id, created_at, updated_at";

fn row_to_component(row: &Row<'_>) -> rusqlite::Result<SbomComponent> {
    Ok(SbomComponent {
        id: decode::record_id(row, 0)?,
        component_name: row.get(1)?,
        version: row.get(2)?,
        license: row.get(3)?,
        project_id: decode::project_id(row, 4)?,
        created_at: decode::timestamp(row, 5)?,
        updated_at: decode::timestamp(row, 6)?,
    })
}

fn fetch(conn: &Connection, id: i64) -> Result<SbomComponent, StoreError> {
    conn.prepare_cached(&format!("SELECT {COLS} FROM sbom_components WHERE id = ?1"))
        .map_err(internal)?
        .query_row(params![id], row_to_component)
        .optional()
        .map_err(StoreError::from_sqlite)?
        .ok_or(StoreError::NotFound { entity: ENTITY, id })
}

pub fn create(
    conn: &mut Connection,
    input: &SbomComponentCreate,
) -> Result<SbomComponent, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let now = decode::timestamp_text(Timestamp::now())?;
    tx.prepare_cached(
        "INSERT INTO sbom_components(component_name, version, license, project_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .map_err(internal)?
    .execute(params![
        input.component_name,
        input.version,
        input.license,
        input.project_id,
        now
    ])
    .map_err(StoreError::from_sqlite)?;
    let created = fetch(&tx, tx.last_insert_rowid())?;
    tx.commit().map_err(internal)?;
    Ok(created)
}

pub fn list(conn: &Connection, window: ListWindow) -> Result<Vec<SbomComponent>, StoreError> {
    let offset = match i64::try_from(window.skip) {
        Ok(offset) => offset,
        Err(_) => return Ok(Vec::new()),
    };
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLS} FROM sbom_components ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        ))
        .map_err(internal)?;
    let rows = stmt
        .query_map(
            params![window.limit as i64, offset],
            row_to_component,
        )
        .map_err(internal)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StoreError::from_sqlite)
}

pub fn list_for_project(
    conn: &Connection,
    project_id: i64,
) -> Result<Vec<SbomComponent>, StoreError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLS} FROM sbom_components WHERE project_id = ?1 ORDER BY id ASC"
        ))
        .map_err(internal)?;
    let rows = stmt
        .query_map(params![project_id], row_to_component)
        .map_err(internal)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StoreError::from_sqlite)
}

pub fn get(conn: &Connection, id: i64) -> Result<SbomComponent, StoreError> {
    fetch(conn, id)
}

pub fn update(
    conn: &mut Connection,
    id: i64,
    patch: &SbomComponentUpdate,
) -> Result<SbomComponent, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let current = fetch(&tx, id)?;
    let component_name = patch
        .component_name
        .as_deref()
        .unwrap_or(&current.component_name);
    let version = patch.version.as_deref().unwrap_or(&current.version);
    let license = patch.license.as_deref().unwrap_or(&current.license);
    let project_id = patch.project_id.unwrap_or(current.project_id.as_i64());
    let updated_at = decode::timestamp_text(Timestamp::strictly_after(current.updated_at))?;
    tx.prepare_cached(
        "UPDATE sbom_components SET component_name = ?1, version = ?2, license = ?3,
         project_id = ?4, updated_at = ?5 WHERE id = ?6",
    )
    .map_err(internal)?
    .execute(params![
        component_name,
        version,
        license,
        project_id,
        updated_at,
        id
    ])
    .map_err(StoreError::from_sqlite)?;
    let updated = fetch(&tx, id)?;
    tx.commit().map_err(internal)?;
    Ok(updated)
}

pub fn delete(conn: &mut Connection, id: i64) -> Result<SbomComponent, StoreError> {
    let tx = conn.transaction().map_err(internal)?;
    let existing = fetch(&tx, id)?;
    tx.execute("DELETE FROM sbom_components WHERE id = ?1", params![id])
        .map_err(StoreError::from_sqlite)?;
    tx.commit().map_err(internal)?;
    Ok(existing)
}
