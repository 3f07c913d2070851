//! Defines the Axum API routes and handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::config::Config;
use crate::ops::{self, Operation, stop};
use crate::printer::PrinterClient;
use crate::web::models::OperationRequest;

pub struct AppStateInner {
    pub config: Config,
    pub client: PrinterClient,
}

pub type AppState = Arc<AppStateInner>;

/// Creates the Axum router with all the proxy endpoints.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/", get(homepage))
        .route("/pause", post(pause_printer))
        .route("/resume", post(resume_printer))
        .route("/stop", post(stop_printer))
        .route("/all/pause", post(pause_all_printers))
        .route("/all/resume", post(resume_all_printers))
        .route("/all/stop", post(stop_all_printers))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn homepage() -> Html<&'static str> {
    Html(
        r#"<html>
    <head><title>prusa_proxy</title></head>
    <body>
    <h1>prusa_proxy</h1>
    <h3>Implemented Endpoints</h3>
    <ul>
        <li>POST /pause</li>
        <li>POST /resume</li>
        <li>POST /stop</li>
        <li>POST /all/pause</li>
        <li>POST /all/resume</li>
        <li>POST /all/stop</li>
        <li>GET /metrics</li>
    </ul>
    </body>
    </html>"#,
    )
}

/// Shared body of the single-printer operation handlers.
async fn run_operation(
    state: AppState,
    payload: Result<Json<OperationRequest>, JsonRejection>,
    op: Operation,
) -> Response {
    let Ok(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Invalid request body").into_response();
    };

    match ops::dispatch(&state.config, &state.client, &request.ip, op).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn pause_printer(
    State(state): State<AppState>,
    payload: Result<Json<OperationRequest>, JsonRejection>,
) -> Response {
    run_operation(state, payload, Operation::Pause).await
}

async fn resume_printer(
    State(state): State<AppState>,
    payload: Result<Json<OperationRequest>, JsonRejection>,
) -> Response {
    run_operation(state, payload, Operation::Resume).await
}

async fn stop_printer(
    State(state): State<AppState>,
    payload: Result<Json<OperationRequest>, JsonRejection>,
) -> Response {
    run_operation(state, payload, Operation::Stop).await
}

async fn pause_all_printers(State(state): State<AppState>) -> String {
    ops::dispatch_all(&state.config, &state.client, Operation::Pause).await
}

async fn resume_all_printers(State(state): State<AppState>) -> String {
    ops::dispatch_all(&state.config, &state.client, Operation::Resume).await
}

async fn stop_all_printers(State(state): State<AppState>) -> String {
    stop::stop_all(&state.config, &state.client).await
}

async fn metrics(State(state): State<AppState>) -> String {
    ops::export_state(&state.config, &state.client).await
}
