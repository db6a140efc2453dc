#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
};
use backend::{build_router, config::Config, state::AppState};
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .expect("serve");
    });
    format!("http://{addr}")
}

/// A URL nothing is listening on.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

/// Records what the service sent to FOLIO.
#[derive(Debug, Clone, Default)]
pub struct FolioRequest {
    pub params: HashMap<String, String>,
    pub tenant: Option<String>,
    pub token: Option<String>,
}

#[derive(Clone)]
pub struct FakeFolio {
    pub requests: Arc<Mutex<Vec<FolioRequest>>>,
    pub total_records: u64,
    pub fail: bool,
}

impl FakeFolio {
    pub fn new(total_records: u64) -> Self {
        Self { requests: Arc::new(Mutex::new(Vec::new())), total_records, fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::new(0) }
    }

    pub fn requests(&self) -> Vec<FolioRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/coursereserves/courses", get(fake_folio_courses))
            .with_state(self.clone())
    }
}

async fn fake_folio_courses(
    State(folio): State<FakeFolio>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    folio.requests.lock().unwrap().push(FolioRequest {
        params: params.clone(),
        tenant: header("x-okapi-tenant"),
        token: header("x-okapi-token"),
    });
    if folio.fail {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "storage unavailable".to_string()));
    }

    let limit: u64 = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(10);
    let offset: u64 = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let end = (offset + limit).min(folio.total_records);
    let courses = (offset..end)
        .map(|i| {
            serde_json::json!({
                "id": format!("course-{i}"),
                "name": format!("Course {i}"),
                "courseNumber": format!("BIO {i}"),
                "departmentObject": {"name": "SC Biology"},
                "courseListingObject": {
                    "termObject": {"name": "Fall 2025"},
                    "instructorObjects": [{"name": "Ada Jones"}]
                }
            })
        })
        .collect::<Vec<_>>();
    Ok(Json(serde_json::json!({"courses": courses, "totalRecords": folio.total_records})))
}

/// IP lookup double: `/ip` answers with a fixed address, `/slow` never in time.
#[derive(Clone)]
pub struct FakeIpLookup {
    pub ip: &'static str,
    pub calls: Arc<AtomicUsize>,
}

impl FakeIpLookup {
    pub fn new(ip: &'static str) -> Self {
        Self { ip, calls: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/ip", get(fake_ip))
            .route("/slow", get(fake_slow_ip))
            .with_state(self.clone())
    }
}

async fn fake_ip(State(lookup): State<FakeIpLookup>) -> Json<serde_json::Value> {
    lookup.calls.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({"ip": lookup.ip}))
}

async fn fake_slow_ip(State(lookup): State<FakeIpLookup>) -> Json<serde_json::Value> {
    lookup.calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(serde_json::json!({"ip": lookup.ip}))
}

/// Starts the service against the given upstream URLs and returns its base URL.
pub async fn spawn_service(config: Config) -> String {
    let state = AppState::new(config).expect("state");
    spawn_server(build_router(state)).await
}

/// Captures tracing output for tests.
pub struct TestTracing {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl TestTracing {
    pub fn new() -> Self {
        Self { buffer: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }
}

struct TestWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
