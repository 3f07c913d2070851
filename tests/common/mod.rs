//! Shared test harness: a scriptable fake printer speaking just enough of
//! the Prusa HTTP API, plus helpers for driving the proxy router with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::json;
use tower::util::ServiceExt;

use prusa_proxy::config::{Config, PrinterRecord};
use prusa_proxy::printer::PrinterClient;
use prusa_proxy::web::api::{AppStateInner, app_with_state};

/// Digest challenge issued by the fake printer when scripted to do so.
const DIGEST_CHALLENGE: &str =
    r#"Digest realm="Printer API", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", qop="auth""#;

/// One request observed by the fake printer (challenges excluded).
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
    pub has_authorization: bool,
}

/// Scripted behavior for one fake printer.
#[derive(Debug, Clone)]
pub struct FakePrinterScript {
    /// Job id reported by `/api/v1/status`.
    pub job_id: i64,
    /// State reported by `/api/v1/status` once `stopping_polls` is spent.
    pub printer_state: String,
    /// State reported by `/api/job`.
    pub job_state: String,
    /// Status answered to PUT/DELETE job operations.
    pub operation_status: StatusCode,
    /// Answer 401 + digest challenge to requests without an Authorization
    /// header.
    pub challenge_digest: bool,
    /// Clear the job (id 0, state Idle) after a successful DELETE.
    pub clear_job_on_delete: bool,
    /// Number of status polls that report `Stopping` before the scripted
    /// `printer_state` takes over.
    pub stopping_polls: u32,
}

impl Default for FakePrinterScript {
    fn default() -> Self {
        Self {
            job_id: 42,
            printer_state: "Printing".into(),
            job_state: "Printing".into(),
            operation_status: StatusCode::NO_CONTENT,
            challenge_digest: false,
            clear_job_on_delete: true,
            stopping_polls: 0,
        }
    }
}

struct FakeState {
    label: String,
    script: Mutex<FakePrinterScript>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    log: Arc<Mutex<Vec<String>>>,
}

/// A running fake printer bound to a local port.
pub struct FakePrinter {
    /// `host:port` address, usable directly as a configured printer address.
    pub addr: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakePrinter {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded operation calls (everything that is not a status/job GET).
    pub fn operation_calls(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != "GET")
            .collect()
    }
}

/// Spawn a fake printer. `label` tags entries in the shared cross-printer
/// `log`, which records call order across several fakes.
pub async fn spawn_fake_printer(
    label: &str,
    script: FakePrinterScript,
    log: Arc<Mutex<Vec<String>>>,
) -> FakePrinter {
    let state = Arc::new(FakeState {
        label: label.to_string(),
        script: Mutex::new(script),
        requests: Arc::new(Mutex::new(Vec::new())),
        log,
    });
    let app = Router::new().fallback(handle).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = state.requests.clone();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakePrinter {
        addr: addr.to_string(),
        requests,
    }
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut script = state.script.lock().unwrap();

    if script.challenge_digest && !headers.contains_key(header::AUTHORIZATION) {
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, DIGEST_CHALLENGE)],
            "",
        )
            .into_response();
    }

    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        body,
        has_authorization: headers.contains_key(header::AUTHORIZATION),
    });
    state
        .log
        .lock()
        .unwrap()
        .push(format!("{} {} {}", state.label, method, path));

    match (method.as_str(), path.as_str()) {
        ("GET", "/api/v1/status") => {
            let printer_state = if script.stopping_polls > 0 {
                script.stopping_polls -= 1;
                "Stopping".to_string()
            } else {
                script.printer_state.clone()
            };
            Json(json!({
                "job": {
                    "id": script.job_id,
                    "progress": 50.0,
                    "time_remaining": 120.0,
                    "time_printing": 300.0
                },
                "printer": {
                    "state": printer_state,
                    "temp_bed": 60.0,
                    "target_bed": 60.0,
                    "temp_nozzle": 215.0,
                    "target_nozzle": 215.0
                }
            }))
            .into_response()
        }
        ("GET", "/api/job") => Json(json!({"state": script.job_state})).into_response(),
        ("PUT", p) if p.starts_with("/api/v1/job/") => script.operation_status.into_response(),
        ("DELETE", p) if p.starts_with("/api/v1/job/") => {
            if script.operation_status.is_success() && script.clear_job_on_delete {
                script.job_id = 0;
                script.printer_state = "Idle".into();
            }
            script.operation_status.into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Build the proxy router around a configuration, as `main` does.
pub fn proxy_app(config: Config) -> Router {
    app_with_state(Arc::new(AppStateInner {
        config,
        client: PrinterClient::new(),
    }))
}

/// Configuration with one record per `(address, username, password)` entry.
pub fn config_of(entries: &[(&str, &str, &str)]) -> Config {
    Config {
        printers: entries
            .iter()
            .map(|(address, username, password)| PrinterRecord {
                address: address.to_string(),
                username: username.to_string(),
                password: password.to_string(),
            })
            .collect(),
    }
}

pub async fn post_json(
    app: Router,
    path: &str,
    payload: serde_json::Value,
) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_empty(app: Router, path: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_path(app: Router, path: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned())
}
