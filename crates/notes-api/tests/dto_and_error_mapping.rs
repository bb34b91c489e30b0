// SPDX-License-Identifier: Apache-2.0

use notes_api::{
    map_error, parse_list_window, ApiError, ApiErrorCode, ProjectCreate, ProjectUpdate,
    TaskCreate, TaskUpdate,
};
use std::collections::BTreeMap;

fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn list_window_bounds_are_enforced() {
    assert!(parse_list_window(&query(&[("limit", "0")])).is_err());
    assert!(parse_list_window(&query(&[("limit", "1001")])).is_err());
    assert!(parse_list_window(&query(&[("skip", "-1")])).is_err());

    let window = parse_list_window(&query(&[("skip", "3"), ("limit", "10")])).expect("valid");
    assert_eq!(window.skip, 3);
    assert_eq!(window.limit, 10);
}

#[test]
fn create_validation_rejects_empty_and_padded_text() {
    let empty = ProjectCreate {
        name: String::new(),
        description: None,
    };
    let err = empty.validate().expect_err("empty name");
    assert_eq!(err.code, ApiErrorCode::ValidationFailed);

    let padded = TaskCreate {
        title: " triage ".to_string(),
        description: None,
        status: None,
        priority: None,
        project_id: 1,
    };
    assert!(padded.validate().is_err());

    let dangling = TaskCreate {
        title: "triage".to_string(),
        description: None,
        status: None,
        priority: None,
        project_id: 0,
    };
    assert!(dangling.validate().is_err());
}

#[test]
fn empty_update_is_legal_and_detected() {
    let patch = TaskUpdate::default();
    patch.validate().expect("empty update is valid");
    assert!(patch.is_empty());

    let patch = TaskUpdate {
        status: Some("done".to_string()),
        ..TaskUpdate::default()
    };
    assert!(!patch.is_empty());
}

#[test]
fn update_distinguishes_absent_description_from_explicit_null() {
    let absent: ProjectUpdate = serde_json::from_str(r#"{"name":"alpha"}"#).expect("decode");
    assert_eq!(absent.description, None);

    let cleared: ProjectUpdate = serde_json::from_str(r#"{"description":null}"#).expect("decode");
    assert_eq!(cleared.description, Some(None));
    assert!(!cleared.is_empty());
    cleared.validate().expect("explicit null is a legal patch");
}

#[test]
fn update_shapes_reject_unknown_fields() {
    let raw = r#"{"name":"alpha","owner":"me"}"#;
    assert!(serde_json::from_str::<ProjectUpdate>(raw).is_err());
    let raw = r#"{"name":"alpha"}"#;
    assert!(serde_json::from_str::<ProjectUpdate>(raw).is_ok());
}

#[test]
fn error_codes_map_to_stable_status_codes() {
    let cases = [
        (ApiError::validation_failed("name", "must not be empty"), 422),
        (ApiError::not_found("project", 7), 404),
        (ApiError::conflict("duplicate name"), 409),
        (ApiError::foreign_key("missing project"), 400),
        (ApiError::internal(), 500),
    ];
    for (err, expected) in cases {
        assert_eq!(map_error(&err).status_code, expected, "{:?}", err.code);
    }
}
