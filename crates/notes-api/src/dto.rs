// SPDX-License-Identifier: Apache-2.0

//! Create and Update shapes, one pair per entity.
//!
//! Create shapes carry every required field and no id/timestamps; Update
//! shapes make every field optional and apply only what the caller supplied.
//! An absent field is left unchanged; on nullable columns an explicit JSON
//! null clears the value (`Option<Option<_>>` via `double_option`). `validate`
//! runs before any store access and reports field-level errors.

use crate::errors::ApiError;
use notes_model::{
    parse_optional_text, parse_required_text, ParseError, ProjectId, Timestamp,
    DESCRIPTION_MAX_LEN, LICENSE_MAX_LEN, NAME_MAX_LEN, PRIORITY_MAX_LEN, STATUS_MAX_LEN,
    TITLE_MAX_LEN, VERSION_MAX_LEN,
};
use serde::{Deserialize, Serialize};

fn field<T>(result: Result<T, ParseError>, name: &'static str) -> Result<T, ApiError> {
    result.map_err(|e| ApiError::validation_failed(name, e))
}

fn check_project_id(raw: i64) -> Result<(), ApiError> {
    field(ProjectId::parse(raw), "project_id").map(|_| ())
}

/// Distinguishes an absent field from an explicit JSON `null` on nullable
/// update fields: absent stays `None` (struct-level `default`), `null`
/// decodes as `Some(None)` and clears the column.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Project

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        field(parse_required_text("name", &self.name, NAME_MAX_LEN), "name")?;
        field(
            parse_optional_text("description", self.description.as_deref(), DESCRIPTION_MAX_LEN),
            "description",
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl ProjectUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            field(parse_required_text("name", name, NAME_MAX_LEN), "name")?;
        }
        field(
            parse_optional_text(
                "description",
                self.description.as_ref().and_then(|d| d.as_deref()),
                DESCRIPTION_MAX_LEN,
            ),
            "description",
        )?;
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

// ---------------------------------------------------------------------------
// Task

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    pub project_id: i64,
}

impl TaskCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        field(parse_required_text("title", &self.title, TITLE_MAX_LEN), "title")?;
        field(
            parse_optional_text("description", self.description.as_deref(), DESCRIPTION_MAX_LEN),
            "description",
        )?;
        field(
            parse_optional_text("status", self.status.as_deref(), STATUS_MAX_LEN),
            "status",
        )?;
        field(
            parse_optional_text("priority", self.priority.as_deref(), PRIORITY_MAX_LEN),
            "priority",
        )?;
        check_project_id(self.project_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project_id: Option<i64>,
}

impl TaskUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            field(parse_required_text("title", title, TITLE_MAX_LEN), "title")?;
        }
        field(
            parse_optional_text(
                "description",
                self.description.as_ref().and_then(|d| d.as_deref()),
                DESCRIPTION_MAX_LEN,
            ),
            "description",
        )?;
        field(
            parse_optional_text("status", self.status.as_deref(), STATUS_MAX_LEN),
            "status",
        )?;
        field(
            parse_optional_text("priority", self.priority.as_deref(), PRIORITY_MAX_LEN),
            "priority",
        )?;
        if let Some(project_id) = self.project_id {
            check_project_id(project_id)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.project_id.is_none()
    }
}

// ---------------------------------------------------------------------------
// Issue

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub project_id: i64,
}

impl IssueCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        field(parse_required_text("title", &self.title, TITLE_MAX_LEN), "title")?;
        field(
            parse_optional_text("description", self.description.as_deref(), DESCRIPTION_MAX_LEN),
            "description",
        )?;
        field(
            parse_optional_text("status", self.status.as_deref(), STATUS_MAX_LEN),
            "status",
        )?;
        check_project_id(self.project_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct IssueUpdate {
    pub title: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    pub project_id: Option<i64>,
}

impl IssueUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            field(parse_required_text("title", title, TITLE_MAX_LEN), "title")?;
        }
        field(
            parse_optional_text(
                "description",
                self.description.as_ref().and_then(|d| d.as_deref()),
                DESCRIPTION_MAX_LEN,
            ),
            "description",
        )?;
        field(
            parse_optional_text("status", self.status.as_deref(), STATUS_MAX_LEN),
            "status",
        )?;
        if let Some(project_id) = self.project_id {
            check_project_id(project_id)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.project_id.is_none()
    }
}

// ---------------------------------------------------------------------------
// DesignRule

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignRuleCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub project_id: i64,
}

impl DesignRuleCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        field(parse_required_text("title", &self.title, TITLE_MAX_LEN), "title")?;
        field(
            parse_optional_text("description", self.description.as_deref(), DESCRIPTION_MAX_LEN),
            "description",
        )?;
        check_project_id(self.project_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DesignRuleUpdate {
    pub title: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub project_id: Option<i64>,
}

impl DesignRuleUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            field(parse_required_text("title", title, TITLE_MAX_LEN), "title")?;
        }
        field(
            parse_optional_text(
                "description",
                self.description.as_ref().and_then(|d| d.as_deref()),
                DESCRIPTION_MAX_LEN,
            ),
            "description",
        )?;
        if let Some(project_id) = self.project_id {
            check_project_id(project_id)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.project_id.is_none()
    }
}

// ---------------------------------------------------------------------------
// Requirement

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequirementCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    pub project_id: i64,
}

impl RequirementCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        field(parse_required_text("title", &self.title, TITLE_MAX_LEN), "title")?;
        field(
            parse_optional_text("description", self.description.as_deref(), DESCRIPTION_MAX_LEN),
            "description",
        )?;
        field(
            parse_optional_text("priority", self.priority.as_deref(), PRIORITY_MAX_LEN),
            "priority",
        )?;
        check_project_id(self.project_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RequirementUpdate {
    pub title: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub priority: Option<String>,
    pub project_id: Option<i64>,
}

impl RequirementUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            field(parse_required_text("title", title, TITLE_MAX_LEN), "title")?;
        }
        field(
            parse_optional_text(
                "description",
                self.description.as_ref().and_then(|d| d.as_deref()),
                DESCRIPTION_MAX_LEN,
            ),
            "description",
        )?;
        field(
            parse_optional_text("priority", self.priority.as_deref(), PRIORITY_MAX_LEN),
            "priority",
        )?;
        if let Some(project_id) = self.project_id {
            check_project_id(project_id)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.project_id.is_none()
    }
}

// ---------------------------------------------------------------------------
// ProjectGoal

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectGoalCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<Timestamp>,
    pub project_id: i64,
}

impl ProjectGoalCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        field(parse_required_text("title", &self.title, TITLE_MAX_LEN), "title")?;
        field(
            parse_optional_text("description", self.description.as_deref(), DESCRIPTION_MAX_LEN),
            "description",
        )?;
        field(
            parse_optional_text("status", self.status.as_deref(), STATUS_MAX_LEN),
            "status",
        )?;
        check_project_id(self.project_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ProjectGoalUpdate {
    pub title: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub due_date: Option<Option<Timestamp>>,
    pub project_id: Option<i64>,
}

impl ProjectGoalUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            field(parse_required_text("title", title, TITLE_MAX_LEN), "title")?;
        }
        field(
            parse_optional_text(
                "description",
                self.description.as_ref().and_then(|d| d.as_deref()),
                DESCRIPTION_MAX_LEN,
            ),
            "description",
        )?;
        field(
            parse_optional_text("status", self.status.as_deref(), STATUS_MAX_LEN),
            "status",
        )?;
        if let Some(project_id) = self.project_id {
            check_project_id(project_id)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.project_id.is_none()
    }
}

// ---------------------------------------------------------------------------
// SbomComponent

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SbomComponentCreate {
    pub component_name: String,
    pub version: String,
    pub license: String,
    pub project_id: i64,
}

impl SbomComponentCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        field(
            parse_required_text("component_name", &self.component_name, NAME_MAX_LEN),
            "component_name",
        )?;
        field(
            parse_required_text("version", &self.version, VERSION_MAX_LEN),
            "version",
        )?;
        field(
            parse_required_text("license", &self.license, LICENSE_MAX_LEN),
            "license",
        )?;
        check_project_id(self.project_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SbomComponentUpdate {
    pub component_name: Option<String>,
    pub version: Option<String>,
    pub license: Option<String>,
    pub project_id: Option<i64>,
}

impl SbomComponentUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(component_name) = &self.component_name {
            field(
                parse_required_text("component_name", component_name, NAME_MAX_LEN),
                "component_name",
            )?;
        }
        if let Some(version) = &self.version {
            field(
                parse_required_text("version", version, VERSION_MAX_LEN),
                "version",
            )?;
        }
        if let Some(license) = &self.license {
            field(
                parse_required_text("license", license, LICENSE_MAX_LEN),
                "license",
            )?;
        }
        if let Some(project_id) = self.project_id {
            check_project_id(project_id)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.component_name.is_none()
            && self.version.is_none()
            && self.license.is_none()
            && self.project_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiErrorCode;

    #[test]
    fn project_create_requires_a_name() {
        let input = ProjectCreate {
            name: String::new(),
            description: None,
        };
        let err = input.validate().expect_err("empty name");
        assert_eq!(err.code, ApiErrorCode::ValidationFailed);
    }

    #[test]
    fn task_create_rejects_non_positive_project_id() {
        let input = TaskCreate {
            title: "T1".to_string(),
            description: None,
            status: None,
            priority: None,
            project_id: 0,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn empty_update_is_legal_and_detected() {
        let patch = TaskUpdate::default();
        assert!(patch.is_empty());
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn update_rejects_whitespace_padded_title() {
        let patch = TaskUpdate {
            title: Some(" padded".to_string()),
            ..TaskUpdate::default()
        };
        assert!(patch.validate().is_err());
    }
}
