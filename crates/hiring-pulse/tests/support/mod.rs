//! In-process stand-in for the recruiting API's `connect` endpoints.
// Each test binary uses a different subset of the stub.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const PASSWORD: &str = "s3cret";
pub const CUSTOMER: &str = "4821";

#[derive(Default)]
pub struct Upstream {
    pub authorizations: AtomicUsize,
    pub reject_next: AtomicBool,
    pub last_query: Mutex<Option<String>>,
    pub workflow_jobs: Mutex<Vec<String>>,
}

impl Upstream {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        let rejected = self.reject_next.swap(false, Ordering::SeqCst);
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("Bearer token-"));
        bearer && !rejected
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().expect("query lock").clone()
    }

    pub fn workflow_jobs(&self) -> Vec<String> {
        self.workflow_jobs.lock().expect("workflow lock").clone()
    }
}

async fn authorize(State(upstream): State<Arc<Upstream>>, Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD || body["customerid"] != CUSTOMER {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid_grant" })))
            .into_response();
    }
    let issued = upstream.authorizations.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({ "access_token": format!("token-{issued}") })).into_response()
}

async fn jobs(
    State(upstream): State<Arc<Upstream>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    if !upstream.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    *upstream.last_query.lock().expect("query lock") = query;
    Json(json!({
        "jobs": [
            { "id": 1, "title": "Backend Engineer", "status": "Open", "recruiter": "Avery" },
            { "id": 2, "title": "Designer", "status": "Closed", "dateposted": "2024-01-02",
              "dateclosed": "2024-01-30", "recruiter": "Blake" }
        ]
    }))
    .into_response()
}

async fn candidates(
    State(upstream): State<Arc<Upstream>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    if !upstream.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if query.as_deref().is_some_and(|query| query.contains("jobid=explode")) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    *upstream.last_query.lock().expect("query lock") = query;
    Json(json!({
        "candidates": [
            { "id": 10, "firstname": "Robin", "source": "Referral", "dateadded": "2024-03-20",
              "recruiter": "Avery" }
        ]
    }))
    .into_response()
}

async fn workflow(
    State(upstream): State<Arc<Upstream>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Response {
    if !upstream.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    upstream
        .workflow_jobs
        .lock()
        .expect("workflow lock")
        .push(job_id.clone());
    if job_id == "broken" {
        return "<html>upstream maintenance</html>".into_response();
    }
    Json(json!({
        "steps": [
            { "id": "s1", "name": "Phone screen", "status": "complete", "sequence": 1 },
            { "id": "s2", "name": "Onsite", "status": "pending", "sequence": 2 }
        ]
    }))
    .into_response()
}

/// Starts the stub on its own thread and runtime, returning its address.
pub fn spawn_upstream() -> (SocketAddr, Arc<Upstream>) {
    let upstream = Arc::new(Upstream::default());
    let app = Router::new()
        .route("/connect/authorize", post(authorize))
        .route("/connect/jobs", get(jobs))
        .route("/connect/candidates", get(candidates))
        .route("/connect/jobs/:job_id/workflow", get(workflow))
        .with_state(upstream.clone());

    let (sender, receiver) = mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("stub runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind stub upstream");
            sender
                .send(listener.local_addr().expect("stub address"))
                .expect("report stub address");
            axum::serve(listener, app).await.expect("serve stub upstream");
        });
    });

    let addr = receiver.recv().expect("stub upstream started");
    (addr, upstream)
}
