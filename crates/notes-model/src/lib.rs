#![forbid(unsafe_code)]
//! Canonical record shapes for the project-notes service.
//!
//! Every persisted entity lives here: the `Project` root aggregate and the six
//! dependent record types keyed by `project_id`. The store and API crates
//! depend on these shapes; nothing in this crate touches the store or the
//! network.

mod fields;
mod ids;
mod record;
mod timestamp;

pub use fields::{
    parse_optional_text, parse_required_text, DESCRIPTION_MAX_LEN, LICENSE_MAX_LEN, NAME_MAX_LEN,
    PRIORITY_MAX_LEN, STATUS_MAX_LEN, TITLE_MAX_LEN, VERSION_MAX_LEN,
};
pub use ids::{ParseError, ProjectId, RecordId};
pub use record::{
    DesignRule, Issue, Project, ProjectDetail, ProjectGoal, Requirement, SbomComponent, Task,
    DEFAULT_PRIORITY, DEFAULT_STATUS,
};
pub use timestamp::Timestamp;

pub const CRATE_NAME: &str = "notes-model";
