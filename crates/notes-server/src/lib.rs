#![forbid(unsafe_code)]

//! HTTP surface for the project-notes store: one axum router per process,
//! sqlite work bounded by a semaphore and run on the blocking pool.

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};

use notes_store::StoreError;

mod config;
mod http;

pub use config::{validate_startup_config_contract, ApiConfig, CONFIG_SCHEMA_VERSION};

pub const CRATE_NAME: &str = "notes-server";

/// Serialized access to the sqlite database. rusqlite connections are not
/// `Sync`, so every unit of work takes the mutex on the blocking pool; the
/// semaphore bounds how many requests may queue for it at once.
#[derive(Clone)]
pub struct StoreHandle {
    conn: Arc<std::sync::Mutex<Connection>>,
    permits: Arc<Semaphore>,
}

impl StoreHandle {
    #[must_use]
    pub fn new(conn: Connection, max_waiters: usize) -> Self {
        Self {
            conn: Arc::new(std::sync::Mutex::new(conn)),
            permits: Arc::new(Semaphore::new(max_waiters)),
        }
    }

    /// Runs one connection-scoped unit of work under `spawn_blocking`.
    pub async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Internal("store mutex poisoned".to_string()))?;
            op(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }
}

#[derive(Default)]
pub(crate) struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
    latency_ns: Mutex<HashMap<String, Vec<u64>>>,
}

impl RequestMetrics {
    pub(crate) async fn observe_request(&self, route: &str, status: StatusCode, latency: Duration) {
        let mut counts = self.counts.lock().await;
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        drop(counts);
        let mut latency_map = self.latency_ns.lock().await;
        latency_map
            .entry(route.to_string())
            .or_insert_with(Vec::new)
            .push(latency.as_nanos() as u64);
    }

    pub(crate) async fn snapshot(&self) -> serde_json::Value {
        let counts = self.counts.lock().await;
        let mut requests: Vec<serde_json::Value> = counts
            .iter()
            .map(|((route, status), count)| {
                serde_json::json!({"route": route, "status": status, "count": count})
            })
            .collect();
        drop(counts);
        requests.sort_by_key(|v| {
            (
                v["route"].as_str().unwrap_or_default().to_string(),
                v["status"].as_u64().unwrap_or_default(),
            )
        });

        let latency_map = self.latency_ns.lock().await;
        let mut latency = serde_json::Map::new();
        for (route, samples) in latency_map.iter() {
            let total: u64 = samples.iter().sum();
            let max = samples.iter().copied().max().unwrap_or(0);
            latency.insert(
                route.clone(),
                serde_json::json!({
                    "count": samples.len(),
                    "mean_ms": (total as f64 / samples.len().max(1) as f64) / 1_000_000.0,
                    "max_ms": (max as f64) / 1_000_000.0,
                }),
            );
        }
        serde_json::json!({"requests": requests, "latency": latency})
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: StoreHandle,
    pub api: ApiConfig,
    pub ready: Arc<AtomicBool>,
    pub accepting_requests: Arc<AtomicBool>,
    pub(crate) metrics: Arc<RequestMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: StoreHandle) -> Self {
        Self::with_config(store, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(store: StoreHandle, api: ApiConfig) -> Self {
        Self {
            store,
            api,
            ready: Arc::new(AtomicBool::new(true)),
            accepting_requests: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;

    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route("/metrics", get(http::handlers::metrics_handler))
        .route("/v1/version", get(http::handlers::version_handler))
        .route(
            "/projects/",
            post(http::crud::create_project).get(http::crud::list_projects),
        )
        .route(
            "/projects/:id",
            get(http::crud::get_project)
                .put(http::crud::update_project)
                .delete(http::crud::delete_project),
        )
        .route("/projects/:id/full", get(http::crud::project_detail))
        .route(
            "/tasks/",
            post(http::crud::create_task).get(http::crud::list_tasks),
        )
        .route(
            "/tasks/:id",
            get(http::crud::get_task)
                .put(http::crud::update_task)
                .delete(http::crud::delete_task),
        )
        .route(
            "/issues/",
            post(http::crud::create_issue).get(http::crud::list_issues),
        )
        .route(
            "/issues/:id",
            get(http::crud::get_issue)
                .put(http::crud::update_issue)
                .delete(http::crud::delete_issue),
        )
        .route(
            "/design_rules/",
            post(http::crud::create_design_rule).get(http::crud::list_design_rules),
        )
        .route(
            "/design_rules/:id",
            get(http::crud::get_design_rule)
                .put(http::crud::update_design_rule)
                .delete(http::crud::delete_design_rule),
        )
        .route(
            "/requirements/",
            post(http::crud::create_requirement).get(http::crud::list_requirements),
        )
        .route(
            "/requirements/:id",
            get(http::crud::get_requirement)
                .put(http::crud::update_requirement)
                .delete(http::crud::delete_requirement),
        )
        .route(
            "/project_goals/",
            post(http::crud::create_goal).get(http::crud::list_goals),
        )
        .route(
            "/project_goals/:id",
            get(http::crud::get_goal)
                .put(http::crud::update_goal)
                .delete(http::crud::delete_goal),
        )
        .route(
            "/sboms/",
            post(http::crud::create_sbom_component).get(http::crud::list_sbom_components),
        )
        .route(
            "/sboms/:id",
            get(http::crud::get_sbom_component)
                .put(http::crud::update_sbom_component)
                .delete(http::crud::delete_sbom_component),
        )
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}

/// Opens the sqlite database, applies the connection pragmas, and ensures
/// the schema exists. Everything the server needs before accepting traffic.
pub fn open_store(path: &std::path::Path, api: &ApiConfig) -> Result<StoreHandle, StoreError> {
    let mut conn =
        Connection::open(path).map_err(|e| StoreError::Internal(e.to_string()))?;
    notes_store::apply_connection_pragmas(&conn, api.db_busy_timeout.as_millis() as u64)?;
    notes_store::init_schema(&mut conn)?;
    Ok(StoreHandle::new(conn, api.max_store_conns))
}
