// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Dashboard HTTP surface over the [`ControlPlane`] facade. Semantic JSON
//! endpoints only; the dashboard UI itself lives elsewhere.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::application::control_plane::ControlPlane;
use crate::domain::genome::GenomeError;
use crate::domain::policy::PolicyScope;

pub fn app(control: Arc<ControlPlane>) -> Router {
    Router::new()
        .route("/policy/{scope}", get(get_policy_document))
        .route("/policy/{scope}/{name}", put(set_policy))
        .route("/pipelines", get(ranked_pipelines))
        .route("/swarm/pause-state", get(pause_state))
        .route("/swarm/pause", post(pause_swarm))
        .route("/swarm/resume", post(resume_swarm))
        .route("/agents/stale", get(find_stale))
        .route("/agents/reap", post(reap_stale))
        .route("/genomes", get(list_genomes))
        .route("/genomes/{name}", put(set_genome_enabled))
        .layer(TraceLayer::new_for_http())
        .with_state(control)
}

fn parse_scope(scope: &str) -> Option<PolicyScope> {
    match scope {
        "pipelines" => Some(PolicyScope::Pipeline),
        "engines" => Some(PolicyScope::Engine),
        _ => None,
    }
}

fn unknown_scope(scope: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": format!("Unknown policy scope '{scope}'") })),
    )
        .into_response()
}

fn internal_error(e: impl std::fmt::Display) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
        .into_response()
}

async fn get_policy_document(
    State(control): State<Arc<ControlPlane>>,
    Path(scope): Path<String>,
) -> Response {
    match parse_scope(&scope) {
        Some(scope) => Json(json!(control.policy_document(scope).await)).into_response(),
        None => unknown_scope(&scope),
    }
}

#[derive(Deserialize)]
struct SetPolicyRequest {
    enabled: bool,
    reason: Option<String>,
}

async fn set_policy(
    State(control): State<Arc<ControlPlane>>,
    Path((scope, name)): Path<(String, String)>,
    Json(payload): Json<SetPolicyRequest>,
) -> Response {
    let Some(scope) = parse_scope(&scope) else {
        return unknown_scope(&scope);
    };
    match control.set_policy(scope, &name, payload.enabled, payload.reason).await {
        Ok(record) => Json(json!({ "name": name, "record": record })).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn ranked_pipelines(State(control): State<Arc<ControlPlane>>) -> impl IntoResponse {
    Json(json!(control.ranked_pipelines().await))
}

async fn pause_state(State(control): State<Arc<ControlPlane>>) -> impl IntoResponse {
    Json(json!(control.pause_state().await))
}

#[derive(Deserialize)]
struct PauseRequest {
    #[serde(default)]
    kill_running: bool,
    requested_by: Option<String>,
}

async fn pause_swarm(
    State(control): State<Arc<ControlPlane>>,
    Json(payload): Json<PauseRequest>,
) -> Response {
    let requested_by = payload.requested_by.as_deref().unwrap_or("dashboard");
    match control.pause_swarm(payload.kill_running, requested_by).await {
        Ok(outcome) => Json(json!(outcome)).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn resume_swarm(State(control): State<Arc<ControlPlane>>) -> Response {
    match control.resume_swarm().await {
        Ok(outcome) => Json(json!(outcome)).into_response(),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
struct ThresholdQuery {
    threshold_secs: Option<u64>,
}

async fn find_stale(
    State(control): State<Arc<ControlPlane>>,
    Query(query): Query<ThresholdQuery>,
) -> impl IntoResponse {
    Json(json!(control.find_stale_agents(query.threshold_secs).await))
}

async fn reap_stale(
    State(control): State<Arc<ControlPlane>>,
    Query(query): Query<ThresholdQuery>,
) -> impl IntoResponse {
    Json(json!(control.reap_stale_agents(query.threshold_secs).await))
}

async fn list_genomes(State(control): State<Arc<ControlPlane>>) -> impl IntoResponse {
    Json(json!(control.list_genomes().await))
}

#[derive(Deserialize)]
struct SetGenomeRequest {
    enabled: bool,
}

async fn set_genome_enabled(
    State(control): State<Arc<ControlPlane>>,
    Path(name): Path<String>,
    Json(payload): Json<SetGenomeRequest>,
) -> Response {
    match control.set_genome_enabled(&name, payload.enabled).await {
        Ok(genomes) => Json(json!(genomes)).into_response(),
        Err(GenomeError::NotFound(name)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Persona '{name}' not found") })),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}
