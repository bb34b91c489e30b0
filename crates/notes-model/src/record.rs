// SPDX-License-Identifier: Apache-2.0

use crate::ids::{ProjectId, RecordId};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Default for open-string status fields when a create input omits them.
pub const DEFAULT_STATUS: &str = "open";
/// Default for open-string priority fields when a create input omits them.
pub const DEFAULT_PRIORITY: &str = "medium";

/// Root aggregate. `name` is unique at the store level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub project_id: ProjectId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Issue {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub project_id: ProjectId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignRule {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub project_id: ProjectId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Requirement {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub project_id: ProjectId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectGoal {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<Timestamp>,
    pub project_id: ProjectId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One software-bill-of-materials component record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SbomComponent {
    pub id: RecordId,
    pub component_name: String,
    pub version: String,
    pub license: String,
    pub project_id: ProjectId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Project with every dependent collection eagerly loaded, each in insertion
/// order. Serves `GET /projects/{id}/full`.
///
/// No `deny_unknown_fields` here: serde does not support it together with
/// `flatten`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<Task>,
    pub issues: Vec<Issue>,
    pub design_rules: Vec<DesignRule>,
    pub requirements: Vec<Requirement>,
    pub goals: Vec<ProjectGoal>,
    pub sbom_components: Vec<SbomComponent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        Project {
            id: RecordId::parse(1).expect("id"),
            name: "Alpha".to_string(),
            description: Some("d".to_string()),
            created_at: Timestamp::parse_rfc3339("2026-01-01T00:00:00Z").expect("ts"),
            updated_at: Timestamp::parse_rfc3339("2026-01-01T00:00:00Z").expect("ts"),
        }
    }

    #[test]
    fn project_serializes_ids_and_timestamps_as_scalars() {
        let value = serde_json::to_value(sample_project()).expect("serialize");
        assert_eq!(value["id"], serde_json::json!(1));
        assert_eq!(value["name"], serde_json::json!("Alpha"));
        assert_eq!(value["created_at"], serde_json::json!("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn project_detail_flattens_the_project_fields() {
        let detail = ProjectDetail {
            project: sample_project(),
            tasks: Vec::new(),
            issues: Vec::new(),
            design_rules: Vec::new(),
            requirements: Vec::new(),
            goals: Vec::new(),
            sbom_components: Vec::new(),
        };
        let value = serde_json::to_value(detail).expect("serialize");
        assert_eq!(value["name"], serde_json::json!("Alpha"));
        assert!(value["tasks"].as_array().expect("tasks array").is_empty());
    }
}
