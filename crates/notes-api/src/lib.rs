#![forbid(unsafe_code)]
//! Request/response contract for the project-notes HTTP surface.
//!
//! Three shapes per entity: Create (required fields mandatory), Update (every
//! field optional, unset fields left unchanged), and Read (the persisted shape
//! re-exported from `notes-model`). Also the wire error shape and its
//! deterministic HTTP status mapping.

mod dto;
mod error_mapping;
mod errors;
mod params;

pub use dto::{
    DesignRuleCreate, DesignRuleUpdate, IssueCreate, IssueUpdate, ProjectCreate, ProjectGoalCreate,
    ProjectGoalUpdate, ProjectUpdate, RequirementCreate, RequirementUpdate, SbomComponentCreate,
    SbomComponentUpdate, TaskCreate, TaskUpdate,
};
pub use error_mapping::{map_error, ApiErrorMapping};
pub use errors::{ApiError, ApiErrorCode};
pub use params::{
    parse_list_window, parse_list_window_with_limit, ListWindow, DEFAULT_PAGE_LIMIT,
    MAX_PAGE_LIMIT,
};

pub const CRATE_NAME: &str = "notes-api";
