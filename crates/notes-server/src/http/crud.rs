//! CRUD handlers. Every entity shares the same request lifecycle, so the
//! per-entity handlers are thin wrappers over the generic cores below; the
//! store operation and DTO validator are passed as plain function pointers.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use notes_api::{
    parse_list_window_with_limit, ApiError, DesignRuleCreate, DesignRuleUpdate, IssueCreate,
    IssueUpdate, ListWindow, ProjectCreate, ProjectGoalCreate, ProjectGoalUpdate, ProjectUpdate,
    RequirementCreate, RequirementUpdate, SbomComponentCreate, SbomComponentUpdate, TaskCreate,
    TaskUpdate,
};
use notes_store::StoreError;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{error, info};

use super::handlers::{error_response, is_draining, propagated_request_id, with_request_id};
use crate::AppState;

async fn finish(
    state: &AppState,
    route: &'static str,
    response: Response,
    started: Instant,
    request_id: &str,
) -> Response {
    state
        .metrics
        .observe_request(route, response.status(), started.elapsed())
        .await;
    with_request_id(response, request_id)
}

fn draining_response() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "draining").into_response()
}

/// One bounded, connection-scoped unit of store work per request.
async fn run_store<T, F>(state: &AppState, op: F) -> Result<T, StoreError>
where
    F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    match timeout(state.api.request_timeout, state.store.run(op)).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Internal("store operation timed out".to_string())),
    }
}

fn store_error_response(err: &StoreError) -> Response {
    let api_err = match err {
        StoreError::NotFound { entity, id } => ApiError::not_found(entity, *id),
        StoreError::Conflict(msg) => ApiError::conflict(msg.clone()),
        StoreError::ForeignKey(msg) => ApiError::foreign_key(msg.clone()),
        StoreError::Internal(msg) => {
            error!("store failure: {msg}");
            ApiError::internal()
        }
    };
    error_response(&api_err)
}

fn path_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    match id {
        Ok(Path(v)) => Ok(v),
        Err(rejection) => Err(ApiError::invalid_param("id", &rejection.body_text())),
    }
}

async fn create_core<I, T>(
    state: AppState,
    headers: HeaderMap,
    route: &'static str,
    payload: Result<Json<I>, JsonRejection>,
    validate: fn(&I) -> Result<(), ApiError>,
    op: fn(&mut Connection, &I) -> Result<T, StoreError>,
) -> Response
where
    I: Send + 'static,
    T: Serialize + Send + 'static,
{
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    if is_draining(&state) {
        return finish(&state, route, draining_response(), started, &request_id).await;
    }
    let Json(input) = match payload {
        Ok(v) => v,
        Err(rejection) => {
            let err = ApiError::malformed_body(rejection.body_text());
            return finish(&state, route, error_response(&err), started, &request_id).await;
        }
    };
    if let Err(err) = validate(&input) {
        return finish(&state, route, error_response(&err), started, &request_id).await;
    }
    info!(request_id = %request_id, route, "create");
    let response = match run_store(&state, move |conn| op(conn, &input)).await {
        Ok(record) => Json(record).into_response(),
        Err(err) => store_error_response(&err),
    };
    finish(&state, route, response, started, &request_id).await
}

async fn list_core<T>(
    state: AppState,
    headers: HeaderMap,
    route: &'static str,
    query: BTreeMap<String, String>,
    op: fn(&Connection, ListWindow) -> Result<Vec<T>, StoreError>,
) -> Response
where
    T: Serialize + Send + 'static,
{
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    if is_draining(&state) {
        return finish(&state, route, draining_response(), started, &request_id).await;
    }
    let window = match parse_list_window_with_limit(
        &query,
        state.api.default_page_limit,
        state.api.max_page_limit,
    ) {
        Ok(w) => w,
        Err(err) => {
            return finish(&state, route, error_response(&err), started, &request_id).await;
        }
    };
    let response = match run_store(&state, move |conn| op(&*conn, window)).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => store_error_response(&err),
    };
    finish(&state, route, response, started, &request_id).await
}

async fn get_core<T>(
    state: AppState,
    headers: HeaderMap,
    route: &'static str,
    id: Result<Path<i64>, PathRejection>,
    op: fn(&Connection, i64) -> Result<T, StoreError>,
) -> Response
where
    T: Serialize + Send + 'static,
{
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    if is_draining(&state) {
        return finish(&state, route, draining_response(), started, &request_id).await;
    }
    let id = match path_id(id) {
        Ok(v) => v,
        Err(err) => {
            return finish(&state, route, error_response(&err), started, &request_id).await;
        }
    };
    let response = match run_store(&state, move |conn| op(&*conn, id)).await {
        Ok(record) => Json(record).into_response(),
        Err(err) => store_error_response(&err),
    };
    finish(&state, route, response, started, &request_id).await
}

async fn update_core<U, T>(
    state: AppState,
    headers: HeaderMap,
    route: &'static str,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<U>, JsonRejection>,
    validate: fn(&U) -> Result<(), ApiError>,
    op: fn(&mut Connection, i64, &U) -> Result<T, StoreError>,
) -> Response
where
    U: Send + 'static,
    T: Serialize + Send + 'static,
{
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    if is_draining(&state) {
        return finish(&state, route, draining_response(), started, &request_id).await;
    }
    let id = match path_id(id) {
        Ok(v) => v,
        Err(err) => {
            return finish(&state, route, error_response(&err), started, &request_id).await;
        }
    };
    let Json(patch) = match payload {
        Ok(v) => v,
        Err(rejection) => {
            let err = ApiError::malformed_body(rejection.body_text());
            return finish(&state, route, error_response(&err), started, &request_id).await;
        }
    };
    if let Err(err) = validate(&patch) {
        return finish(&state, route, error_response(&err), started, &request_id).await;
    }
    info!(request_id = %request_id, route, id, "update");
    let response = match run_store(&state, move |conn| op(conn, id, &patch)).await {
        Ok(record) => Json(record).into_response(),
        Err(err) => store_error_response(&err),
    };
    finish(&state, route, response, started, &request_id).await
}

async fn delete_core<T>(
    state: AppState,
    headers: HeaderMap,
    route: &'static str,
    id: Result<Path<i64>, PathRejection>,
    op: fn(&mut Connection, i64) -> Result<T, StoreError>,
) -> Response
where
    T: Serialize + Send + 'static,
{
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    if is_draining(&state) {
        return finish(&state, route, draining_response(), started, &request_id).await;
    }
    let id = match path_id(id) {
        Ok(v) => v,
        Err(err) => {
            return finish(&state, route, error_response(&err), started, &request_id).await;
        }
    };
    info!(request_id = %request_id, route, id, "delete");
    let response = match run_store(&state, move |conn| op(conn, id)).await {
        Ok(record) => Json(record).into_response(),
        Err(err) => store_error_response(&err),
    };
    finish(&state, route, response, started, &request_id).await
}

// Projects.

pub(crate) async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProjectCreate>, JsonRejection>,
) -> Response {
    create_core(
        state,
        headers,
        "/projects/",
        payload,
        ProjectCreate::validate,
        notes_store::projects::create,
    )
    .await
}

pub(crate) async fn list_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    list_core(state, headers, "/projects/", query, notes_store::projects::list).await
}

pub(crate) async fn get_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    get_core(state, headers, "/projects/:id", id, notes_store::projects::get).await
}

pub(crate) async fn update_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProjectUpdate>, JsonRejection>,
) -> Response {
    update_core(
        state,
        headers,
        "/projects/:id",
        id,
        payload,
        ProjectUpdate::validate,
        notes_store::projects::update,
    )
    .await
}

pub(crate) async fn delete_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    delete_core(
        state,
        headers,
        "/projects/:id",
        id,
        notes_store::projects::delete,
    )
    .await
}

pub(crate) async fn project_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    get_core(
        state,
        headers,
        "/projects/:id/full",
        id,
        notes_store::projects::get_detail,
    )
    .await
}

// Tasks.

pub(crate) async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<TaskCreate>, JsonRejection>,
) -> Response {
    create_core(
        state,
        headers,
        "/tasks/",
        payload,
        TaskCreate::validate,
        notes_store::tasks::create,
    )
    .await
}

pub(crate) async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    list_core(state, headers, "/tasks/", query, notes_store::tasks::list).await
}

pub(crate) async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    get_core(state, headers, "/tasks/:id", id, notes_store::tasks::get).await
}

pub(crate) async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaskUpdate>, JsonRejection>,
) -> Response {
    update_core(
        state,
        headers,
        "/tasks/:id",
        id,
        payload,
        TaskUpdate::validate,
        notes_store::tasks::update,
    )
    .await
}

pub(crate) async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    delete_core(state, headers, "/tasks/:id", id, notes_store::tasks::delete).await
}

// Issues.

pub(crate) async fn create_issue(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<IssueCreate>, JsonRejection>,
) -> Response {
    create_core(
        state,
        headers,
        "/issues/",
        payload,
        IssueCreate::validate,
        notes_store::issues::create,
    )
    .await
}

pub(crate) async fn list_issues(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    list_core(state, headers, "/issues/", query, notes_store::issues::list).await
}

pub(crate) async fn get_issue(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    get_core(state, headers, "/issues/:id", id, notes_store::issues::get).await
}

pub(crate) async fn update_issue(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<IssueUpdate>, JsonRejection>,
) -> Response {
    update_core(
        state,
        headers,
        "/issues/:id",
        id,
        payload,
        IssueUpdate::validate,
        notes_store::issues::update,
    )
    .await
}

pub(crate) async fn delete_issue(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    delete_core(state, headers, "/issues/:id", id, notes_store::issues::delete).await
}

// Design rules.

pub(crate) async fn create_design_rule(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DesignRuleCreate>, JsonRejection>,
) -> Response {
    create_core(
        state,
        headers,
        "/design_rules/",
        payload,
        DesignRuleCreate::validate,
        notes_store::design_rules::create,
    )
    .await
}

pub(crate) async fn list_design_rules(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    list_core(
        state,
        headers,
        "/design_rules/",
        query,
        notes_store::design_rules::list,
    )
    .await
}

pub(crate) async fn get_design_rule(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    get_core(
        state,
        headers,
        "/design_rules/:id",
        id,
        notes_store::design_rules::get,
    )
    .await
}

pub(crate) async fn update_design_rule(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DesignRuleUpdate>, JsonRejection>,
) -> Response {
    update_core(
        state,
        headers,
        "/design_rules/:id",
        id,
        payload,
        DesignRuleUpdate::validate,
        notes_store::design_rules::update,
    )
    .await
}

pub(crate) async fn delete_design_rule(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    delete_core(
        state,
        headers,
        "/design_rules/:id",
        id,
        notes_store::design_rules::delete,
    )
    .await
}

// Requirements.

pub(crate) async fn create_requirement(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RequirementCreate>, JsonRejection>,
) -> Response {
    create_core(
        state,
        headers,
        "/requirements/",
        payload,
        RequirementCreate::validate,
        notes_store::requirements::create,
    )
    .await
}

pub(crate) async fn list_requirements(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    list_core(
        state,
        headers,
        "/requirements/",
        query,
        notes_store::requirements::list,
    )
    .await
}

pub(crate) async fn get_requirement(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    get_core(
        state,
        headers,
        "/requirements/:id",
        id,
        notes_store::requirements::get,
    )
    .await
}

pub(crate) async fn update_requirement(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RequirementUpdate>, JsonRejection>,
) -> Response {
    update_core(
        state,
        headers,
        "/requirements/:id",
        id,
        payload,
        RequirementUpdate::validate,
        notes_store::requirements::update,
    )
    .await
}

pub(crate) async fn delete_requirement(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    delete_core(
        state,
        headers,
        "/requirements/:id",
        id,
        notes_store::requirements::delete,
    )
    .await
}

// Project goals.

pub(crate) async fn create_goal(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProjectGoalCreate>, JsonRejection>,
) -> Response {
    create_core(
        state,
        headers,
        "/project_goals/",
        payload,
        ProjectGoalCreate::validate,
        notes_store::goals::create,
    )
    .await
}

pub(crate) async fn list_goals(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    list_core(
        state,
        headers,
        "/project_goals/",
        query,
        notes_store::goals::list,
    )
    .await
}

pub(crate) async fn get_goal(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    get_core(state, headers, "/project_goals/:id", id, notes_store::goals::get).await
}

pub(crate) async fn update_goal(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProjectGoalUpdate>, JsonRejection>,
) -> Response {
    update_core(
        state,
        headers,
        "/project_goals/:id",
        id,
        payload,
        ProjectGoalUpdate::validate,
        notes_store::goals::update,
    )
    .await
}

pub(crate) async fn delete_goal(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    delete_core(
        state,
        headers,
        "/project_goals/:id",
        id,
        notes_store::goals::delete,
    )
    .await
}

// SBOM components.

pub(crate) async fn create_sbom_component(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SbomComponentCreate>, JsonRejection>,
) -> Response {
    create_core(
        state,
        headers,
        "/sboms/",
        payload,
        SbomComponentCreate::validate,
        notes_store::sbom::create,
    )
    .await
}

pub(crate) async fn list_sbom_components(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    list_core(
        state,
        headers,
        "/sboms/",
        query,
        notes_store::sbom::list,
    )
    .await
}

pub(crate) async fn get_sbom_component(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    get_core(
        state,
        headers,
        "/sboms/:id",
        id,
        notes_store::sbom::get,
    )
    .await
}

pub(crate) async fn update_sbom_component(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SbomComponentUpdate>, JsonRejection>,
) -> Response {
    update_core(
        state,
        headers,
        "/sboms/:id",
        id,
        payload,
        SbomComponentUpdate::validate,
        notes_store::sbom::update,
    )
    .await
}

pub(crate) async fn delete_sbom_component(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    delete_core(
        state,
        headers,
        "/sboms/:id",
        id,
        notes_store::sbom::delete,
    )
    .await
}
