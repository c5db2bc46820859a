//! REST endpoints for input and rendering adapters.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::flow::{UserData, UserField};
use crate::session::FlowSession;
use crate::variant::all_variants;

/// Shared state for flow routes.
#[derive(Clone)]
pub struct FlowRouteState {
    pub session: Arc<RwLock<FlowSession>>,
}

#[derive(Debug, Deserialize)]
struct GoToRequest {
    step: i64,
}

#[derive(Debug, Deserialize)]
struct SetFieldRequest {
    value: String,
}

#[derive(Debug, Deserialize)]
struct VersionRequest {
    version: String,
}

#[derive(Debug, Deserialize)]
struct SpinRequest {
    discount: u32,
}

#[derive(Debug, Deserialize)]
struct PersonalizeRequest {
    text: String,
}

/// Build the flow REST routes.
pub fn flow_routes(session: Arc<RwLock<FlowSession>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/flow/status", get(get_status))
        .route("/api/flow/next", post(next_step))
        .route("/api/flow/prev", post(prev_step))
        .route("/api/flow/goto", post(go_to_step))
        .route("/api/flow/manual/clear", post(clear_manual))
        .route("/api/flow/user-data", patch(update_user_data))
        .route("/api/flow/user-data/{key}", put(set_user_field))
        .route("/api/flow/results", post(compute_results))
        .route("/api/flow/personalize", post(personalize))
        .route("/api/flow/variants", get(list_variants))
        .route("/api/flow/version", put(set_version))
        .route("/api/flow/reset", post(reset_demo))
        .route("/api/flow/game/scan", post(complete_scan))
        .route("/api/flow/game/spin", post(spin_wheel))
        .route("/api/flow/game/payment", post(complete_payment))
        .with_state(FlowRouteState { session })
}

fn bad_request(message: impl std::fmt::Display) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": message.to_string()})),
    )
        .into_response()
}

// ── Health / read ───────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "onboard-flow"
    }))
}

/// GET /api/flow/status
async fn get_status(State(state): State<FlowRouteState>) -> impl IntoResponse {
    Json(state.session.read().await.snapshot())
}

/// GET /api/flow/variants
async fn list_variants() -> impl IntoResponse {
    Json(all_variants())
}

// ── Navigation ──────────────────────────────────────────────────────────

async fn next_step(State(state): State<FlowRouteState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.flow_mut().next_step();
    Json(session.snapshot())
}

async fn prev_step(State(state): State<FlowRouteState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.flow_mut().prev_step();
    Json(session.snapshot())
}

async fn go_to_step(
    State(state): State<FlowRouteState>,
    Json(body): Json<GoToRequest>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.flow_mut().go_to_step(body.step);
    Json(session.snapshot())
}

async fn clear_manual(State(state): State<FlowRouteState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.flow_mut().clear_manual_navigation();
    Json(session.snapshot())
}

// ── Answers and results ─────────────────────────────────────────────────

/// PATCH /api/flow/user-data
///
/// Shallow-merges a partial `UserData` into the collected answers.
async fn update_user_data(
    State(state): State<FlowRouteState>,
    Json(partial): Json<UserData>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.flow_mut().update_user_data(partial);
    Json(session.snapshot())
}

/// PUT /api/flow/user-data/{key}
async fn set_user_field(
    State(state): State<FlowRouteState>,
    Path(key): Path<String>,
    Json(body): Json<SetFieldRequest>,
) -> axum::response::Response {
    let field = match UserField::parse(&key, &body.value) {
        Ok(field) => field,
        Err(e) => {
            debug!(key = %key, error = %e, "Rejected user data field");
            return bad_request(e);
        }
    };
    let mut session = state.session.write().await;
    session.flow_mut().set_user_data(field);
    Json(session.snapshot()).into_response()
}

/// POST /api/flow/results
///
/// Computes results from the current answers and stores them.
async fn compute_results(State(state): State<FlowRouteState>) -> impl IntoResponse {
    let results = state.session.write().await.compute_results();
    Json(results)
}

async fn personalize(
    State(state): State<FlowRouteState>,
    Json(body): Json<PersonalizeRequest>,
) -> impl IntoResponse {
    let text = state.session.read().await.personalize(&body.text);
    Json(serde_json::json!({ "text": text }))
}

// ── Variant / reset ─────────────────────────────────────────────────────

/// PUT /api/flow/version
///
/// Switches variant. The flow is reset only when the variant changes.
async fn set_version(
    State(state): State<FlowRouteState>,
    Json(body): Json<VersionRequest>,
) -> axum::response::Response {
    let mut session = state.session.write().await;
    match session.switch_version_str(&body.version) {
        Ok(switched) => Json(serde_json::json!({
            "switched": switched,
            "snapshot": session.snapshot(),
        }))
        .into_response(),
        Err(e) => {
            warn!(version = %body.version, error = %e, "Rejected variant switch");
            bad_request(e)
        }
    }
}

async fn reset_demo(State(state): State<FlowRouteState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.flow_mut().reset_demo();
    Json(session.snapshot())
}

// ── Games ───────────────────────────────────────────────────────────────

async fn complete_scan(State(state): State<FlowRouteState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.flow_mut().complete_scan_game();
    Json(session.snapshot())
}

async fn spin_wheel(
    State(state): State<FlowRouteState>,
    Json(body): Json<SpinRequest>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.flow_mut().spin_wheel(body.discount);
    Json(session.snapshot())
}

async fn complete_payment(State(state): State<FlowRouteState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.flow_mut().complete_payment();
    Json(session.snapshot())
}
