// SPDX-License-Identifier: Apache-2.0

use notes_model::{ProjectId, RecordId, Task, Timestamp};

fn fixture_task_json() -> String {
    r#"{
      "id": 7,
      "title": "triage",
      "description": null,
      "status": "open",
      "priority": "medium",
      "project_id": 1,
      "created_at": "2026-08-01T10:00:00Z",
      "updated_at": "2026-08-01T10:00:00Z"
    }"#
    .to_string()
}

#[test]
fn task_rejects_unknown_fields() {
    let raw = fixture_task_json().replace("\"title\"", "\"extra\": 1, \"title\"");
    assert!(serde_json::from_str::<Task>(&raw).is_err());
}

#[test]
fn round_trip_task_record() {
    let task: Task = serde_json::from_str(&fixture_task_json()).expect("decode task");
    assert_eq!(task.id, RecordId::parse(7).expect("record id"));
    assert_eq!(task.project_id, ProjectId::parse(1).expect("project id"));
    assert_eq!(task.description, None);

    let encoded = serde_json::to_string(&task).expect("encode task");
    let decoded: Task = serde_json::from_str(&encoded).expect("decode again");
    assert_eq!(task, decoded);
}

#[test]
fn ids_serialize_transparently_and_reject_non_positive_values() {
    let id = RecordId::parse(42).expect("record id");
    assert_eq!(serde_json::to_value(id).expect("encode"), serde_json::json!(42));
    assert!(RecordId::parse(0).is_err());
    assert!(ProjectId::parse(-3).is_err());
}

#[test]
fn timestamps_round_trip_as_rfc3339_and_order() {
    let earlier = Timestamp::parse_rfc3339("2026-08-01T10:00:00Z").expect("parse");
    let later = Timestamp::parse_rfc3339("2026-08-01T10:00:01Z").expect("parse");
    assert!(later > earlier);

    let encoded = serde_json::to_string(&earlier).expect("encode");
    let decoded: Timestamp = serde_json::from_str(&encoded).expect("decode");
    assert_eq!(earlier, decoded);

    assert!(Timestamp::parse_rfc3339("yesterday").is_err());
}
