// SPDX-License-Identifier: Apache-2.0
//! End-to-end contract tests: boot the real server on an ephemeral port and
//! speak raw HTTP/1.1 over a TCP stream.

use notes_server::{build_router, ApiConfig, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn boot() -> (TempDir, std::net::SocketAddr) {
    let dir = TempDir::new().expect("tempdir");
    let api = ApiConfig::default();
    let store = notes_server::open_store(&dir.path().join("notes.db"), &api).expect("open store");
    let app = build_router(AppState::with_config(store, api));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    (dir, addr)
}

async fn send_raw(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(payload) = body {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", payload.len()));
    }
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    req.push_str("\r\n");
    if let Some(payload) = body {
        req.push_str(payload);
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

async fn get(addr: std::net::SocketAddr, path: &str) -> (u16, String, String) {
    send_raw(addr, "GET", path, &[], None).await
}

async fn post_json(addr: std::net::SocketAddr, path: &str, body: &str) -> (u16, String, String) {
    send_raw(addr, "POST", path, &[], Some(body)).await
}

fn json_body(body: &str) -> Value {
    serde_json::from_str(body).expect("json body")
}

fn error_code(body: &str) -> String {
    json_body(body)["error"]["code"]
        .as_str()
        .expect("error code")
        .to_string()
}

#[tokio::test]
async fn health_version_and_metrics_endpoints_respond() {
    let (_dir, addr) = boot().await;

    let (status, _, body) = get(addr, "/healthz").await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");

    let (status, _, body) = get(addr, "/readyz").await;
    assert_eq!(status, 200);
    assert_eq!(body, "ready");

    let (status, _, body) = get(addr, "/v1/version").await;
    assert_eq!(status, 200);
    let json = json_body(&body);
    assert_eq!(json["server"]["crate"], "notes-server");

    let (status, _, body) = get(addr, "/metrics").await;
    assert_eq!(status, 200);
    let json = json_body(&body);
    assert!(json.get("requests").is_some());
}

#[tokio::test]
async fn request_id_header_is_echoed_and_propagated() {
    let (_dir, addr) = boot().await;

    let (_, head, _) = get(addr, "/healthz").await;
    assert!(head.to_ascii_lowercase().contains("x-request-id:"));

    let (_, head, _) = send_raw(addr, "GET", "/projects/", &[("x-request-id", "req-abc")], None).await;
    assert!(head.contains("req-abc"));
}

#[tokio::test]
async fn project_crud_round_trip() {
    let (_dir, addr) = boot().await;

    let (status, _, body) =
        post_json(addr, "/projects/", r#"{"name":"alpha","description":"first"}"#).await;
    assert_eq!(status, 200, "create failed: {body}");
    let created = json_body(&body);
    let id = created["id"].as_i64().expect("project id");
    assert_eq!(created["name"], "alpha");
    assert_eq!(created["description"], "first");
    assert!(created["created_at"].as_str().is_some());

    let (status, _, body) = get(addr, &format!("/projects/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(json_body(&body)["name"], "alpha");

    let (status, _, body) = send_raw(
        addr,
        "PUT",
        &format!("/projects/{id}"),
        &[],
        Some(r#"{"description":"second"}"#),
    )
    .await;
    assert_eq!(status, 200);
    let updated = json_body(&body);
    assert_eq!(updated["name"], "alpha");
    assert_eq!(updated["description"], "second");
    assert_ne!(updated["updated_at"], created["updated_at"]);

    let (status, _, body) =
        send_raw(addr, "DELETE", &format!("/projects/{id}"), &[], None).await;
    assert_eq!(status, 200);
    assert_eq!(json_body(&body)["name"], "alpha");

    let (status, _, body) = get(addr, &format!("/projects/{id}")).await;
    assert_eq!(status, 404);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn put_with_explicit_null_clears_description() {
    let (_dir, addr) = boot().await;

    let (_, _, body) =
        post_json(addr, "/projects/", r#"{"name":"alpha","description":"first"}"#).await;
    let id = json_body(&body)["id"].as_i64().expect("project id");

    let (status, _, body) = send_raw(
        addr,
        "PUT",
        &format!("/projects/{id}"),
        &[],
        Some(r#"{"description":null}"#),
    )
    .await;
    assert_eq!(status, 200);
    let updated = json_body(&body);
    assert_eq!(updated["description"], Value::Null);
    assert_eq!(updated["name"], "alpha");
}

#[tokio::test]
async fn task_create_defaults_and_project_full_view() {
    let (_dir, addr) = boot().await;

    let (_, _, body) = post_json(addr, "/projects/", r#"{"name":"alpha"}"#).await;
    let project_id = json_body(&body)["id"].as_i64().expect("project id");

    let (status, _, body) = post_json(
        addr,
        "/tasks/",
        &format!(r#"{{"title":"triage","project_id":{project_id}}}"#),
    )
    .await;
    assert_eq!(status, 200, "task create failed: {body}");
    let task = json_body(&body);
    assert_eq!(task["status"], "open");
    assert_eq!(task["priority"], "medium");

    let (status, _, body) = get(addr, &format!("/projects/{project_id}/full")).await;
    assert_eq!(status, 200);
    let detail = json_body(&body);
    assert_eq!(detail["name"], "alpha");
    assert_eq!(detail["tasks"].as_array().map(Vec::len), Some(1));
    assert_eq!(detail["tasks"][0]["title"], "triage");
    assert_eq!(detail["issues"].as_array().map(Vec::len), Some(0));
    assert_eq!(detail["sbom_components"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn duplicate_project_name_is_a_conflict() {
    let (_dir, addr) = boot().await;

    let (status, _, _) = post_json(addr, "/projects/", r#"{"name":"alpha"}"#).await;
    assert_eq!(status, 200);
    let (status, _, body) = post_json(addr, "/projects/", r#"{"name":"alpha"}"#).await;
    assert_eq!(status, 409);
    assert_eq!(error_code(&body), "CONFLICT");
}

#[tokio::test]
async fn dangling_project_id_is_rejected_with_400() {
    let (_dir, addr) = boot().await;

    let (status, _, body) =
        post_json(addr, "/tasks/", r#"{"title":"orphan","project_id":999}"#).await;
    assert_eq!(status, 400);
    assert_eq!(error_code(&body), "FOREIGN_KEY_VIOLATION");

    let (_, _, body) = get(addr, "/tasks/").await;
    assert_eq!(json_body(&body).as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn project_delete_is_blocked_while_dependents_exist() {
    let (_dir, addr) = boot().await;

    let (_, _, body) = post_json(addr, "/projects/", r#"{"name":"alpha"}"#).await;
    let project_id = json_body(&body)["id"].as_i64().expect("project id");
    let (_, _, body) = post_json(
        addr,
        "/issues/",
        &format!(r#"{{"title":"flaky","project_id":{project_id}}}"#),
    )
    .await;
    let issue_id = json_body(&body)["id"].as_i64().expect("issue id");

    let (status, _, body) =
        send_raw(addr, "DELETE", &format!("/projects/{project_id}"), &[], None).await;
    assert_eq!(status, 409);
    assert_eq!(error_code(&body), "CONFLICT");

    let (status, _, _) =
        send_raw(addr, "DELETE", &format!("/issues/{issue_id}"), &[], None).await;
    assert_eq!(status, 200);
    let (status, _, _) =
        send_raw(addr, "DELETE", &format!("/projects/{project_id}"), &[], None).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn validation_failures_map_to_422() {
    let (_dir, addr) = boot().await;

    // Empty name fails DTO validation.
    let (status, _, body) = post_json(addr, "/projects/", r#"{"name":""}"#).await;
    assert_eq!(status, 422);
    assert_eq!(error_code(&body), "VALIDATION_FAILED");

    // Malformed JSON body.
    let (status, _, body) = post_json(addr, "/projects/", r#"{"name": "#).await;
    assert_eq!(status, 422);
    assert_eq!(error_code(&body), "VALIDATION_FAILED");

    // Unknown body fields are rejected.
    let (status, _, _) =
        post_json(addr, "/projects/", r#"{"name":"alpha","owner":"me"}"#).await;
    assert_eq!(status, 422);

    // Out-of-range list window.
    let (status, _, body) = get(addr, "/projects/?limit=0").await;
    assert_eq!(status, 422);
    assert_eq!(error_code(&body), "VALIDATION_FAILED");
    let (status, _, _) = get(addr, "/projects/?skip=-1").await;
    assert_eq!(status, 422);

    // Non-numeric path id.
    let (status, _, _) = get(addr, "/projects/abc").await;
    assert_eq!(status, 422);
}

#[tokio::test]
async fn list_window_pages_through_projects() {
    let (_dir, addr) = boot().await;

    for i in 0..5 {
        let (status, _, _) =
            post_json(addr, "/projects/", &format!(r#"{{"name":"project-{i}"}}"#)).await;
        assert_eq!(status, 200);
    }
    let (status, _, body) = get(addr, "/projects/?skip=1&limit=2").await;
    assert_eq!(status, 200);
    let page = json_body(&body);
    let rows = page.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "project-1");
    assert_eq!(rows[1]["name"], "project-2");
}

#[tokio::test]
async fn sbom_components_are_served_under_the_sboms_route() {
    let (_dir, addr) = boot().await;

    let (_, _, body) = post_json(addr, "/projects/", r#"{"name":"alpha"}"#).await;
    let project_id = json_body(&body)["id"].as_i64().expect("project id");

    let (status, _, body) = post_json(
        addr,
        "/sboms/",
        &format!(
            r#"{{"component_name":"serde","version":"1.0.219","license":"MIT OR Apache-2.0","project_id":{project_id}}}"#
        ),
    )
    .await;
    assert_eq!(status, 200, "sbom create failed: {body}");
    let component = json_body(&body);
    let id = component["id"].as_i64().expect("component id");
    assert_eq!(component["component_name"], "serde");

    let (status, _, body) = get(addr, &format!("/sboms/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(json_body(&body)["license"], "MIT OR Apache-2.0");

    let (status, _, body) = get(addr, &format!("/projects/{project_id}/full")).await;
    assert_eq!(status, 200);
    assert_eq!(
        json_body(&body)["sbom_components"].as_array().map(Vec::len),
        Some(1)
    );
}

#[tokio::test]
async fn update_can_reparent_a_task_to_another_project() {
    let (_dir, addr) = boot().await;

    let (_, _, body) = post_json(addr, "/projects/", r#"{"name":"alpha"}"#).await;
    let first = json_body(&body)["id"].as_i64().expect("project id");
    let (_, _, body) = post_json(addr, "/projects/", r#"{"name":"beta"}"#).await;
    let second = json_body(&body)["id"].as_i64().expect("project id");
    let (_, _, body) = post_json(
        addr,
        "/tasks/",
        &format!(r#"{{"title":"move me","project_id":{first}}}"#),
    )
    .await;
    let task_id = json_body(&body)["id"].as_i64().expect("task id");

    let (status, _, body) = send_raw(
        addr,
        "PUT",
        &format!("/tasks/{task_id}"),
        &[],
        Some(&format!(r#"{{"project_id":{second}}}"#)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json_body(&body)["project_id"].as_i64(), Some(second));
}
