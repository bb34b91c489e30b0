// SPDX-License-Identifier: Apache-2.0

use crate::{internal, StoreError};
use rusqlite::Connection;

/// One table per entity, one foreign key column per dependent table.
/// `INTEGER PRIMARY KEY` makes rowid assignment monotone, so `ORDER BY id`
/// is insertion order. Timestamps are RFC3339 TEXT.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS projects (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    description TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    id          INTEGER PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    status      TEXT NOT NULL,
    priority    TEXT NOT NULL,
    project_id  INTEGER NOT NULL REFERENCES projects(id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id);

CREATE TABLE IF NOT EXISTS issues (
    id          INTEGER PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    status      TEXT NOT NULL,
    project_id  INTEGER NOT NULL REFERENCES projects(id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_issues_project_id ON issues(project_id);

CREATE TABLE IF NOT EXISTS design_rules (
    id          INTEGER PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    project_id  INTEGER NOT NULL REFERENCES projects(id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_design_rules_project_id ON design_rules(project_id);

CREATE TABLE IF NOT EXISTS requirements (
    id          INTEGER PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    priority    TEXT NOT NULL,
    project_id  INTEGER NOT NULL REFERENCES projects(id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_requirements_project_id ON requirements(project_id);

CREATE TABLE IF NOT EXISTS project_goals (
    id          INTEGER PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    status      TEXT NOT NULL,
    due_date    TEXT,
    project_id  INTEGER NOT NULL REFERENCES projects(id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_project_goals_project_id ON project_goals(project_id);

CREATE TABLE IF NOT EXISTS sbom_components (
    id             INTEGER PRIMARY KEY,
    component_name TEXT NOT NULL,
    version        TEXT NOT NULL,
    license        TEXT NOT NULL,
    project_id     INTEGER NOT NULL REFERENCES projects(id),
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sbom_components_project_id ON sbom_components(project_id);
";

pub fn init_schema(conn: &mut Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA_SQL).map_err(internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_schema_is_idempotent() {
        let mut conn = Connection::open_in_memory().expect("open");
        init_schema(&mut conn).expect("first init");
        init_schema(&mut conn).expect("second init");
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                 ('projects','tasks','issues','design_rules','requirements','project_goals','sbom_components')",
                [],
                |row| row.get(0),
            )
            .expect("table count");
        assert_eq!(count, 7);
    }
}
