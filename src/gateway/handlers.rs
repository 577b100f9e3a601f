use axum::{
    extract::{Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use super::dashboard::DASHBOARD_HTML;
use crate::guardrail::DEFAULT_QUERY_LIMIT;

/// POST /companion/local-action body. Missing fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LocalActionBody {
    pub message: String,
}

/// POST /companion/validate-response body. Missing fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ValidateBody {
    pub user_message: String,
    pub assistant_message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    pub limit: Option<String>,
}

impl EventsQuery {
    /// Unparseable values fall back to the default; range clamping is the
    /// audit log's job.
    fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_QUERY_LIMIT)
    }
}

fn bad_request(err: &JsonRejection) -> Response {
    let body = json!({ "error": format!("Invalid JSON: {}", err.body_text()) });
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

fn internal_error(err: &tokio::task::JoinError) -> Response {
    tracing::error!("blocking handler failed: {err}");
    let body = json!({ "error": "internal error" });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// GET /health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(json!({
        "ok": true,
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}

/// GET / and /dashboard
pub(super) async fn handle_dashboard() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

/// GET /dashboard_v{1,2,3}.html
pub(super) async fn handle_legacy_dashboard() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/dashboard")])
}

/// POST /companion/local-action
pub(super) async fn handle_local_action(
    State(state): State<AppState>,
    body: Result<Json<LocalActionBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return bad_request(&e),
    };

    let companion = state.companion.clone();
    match tokio::task::spawn_blocking(move || companion.handle(&body.message)).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// POST /companion/validate-response
pub(super) async fn handle_validate_response(
    State(state): State<AppState>,
    body: Result<Json<ValidateBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return bad_request(&e),
    };

    let guard = state.guard.clone();
    let verdict = tokio::task::spawn_blocking(move || {
        guard.validate(&body.user_message, &body.assistant_message)
    })
    .await;

    match verdict {
        Ok(verdict) => Json(verdict.envelope()).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// GET /companion/guardrail-events?limit=N
pub(super) async fn handle_guardrail_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Response {
    let limit = query.limit();

    let guard = state.guard.clone();
    match tokio::task::spawn_blocking(move || guard.audit().query(limit)).await {
        Ok(events) => Json(json!({ "ok": true, "events": events })).into_response(),
        Err(e) => internal_error(&e),
    }
}
