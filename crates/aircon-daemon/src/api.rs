//! REST API handlers

use aircon_core::{CommandApplied, CommandRequest};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::state::AppState;
use crate::store::{now_string, row_id, CommandLogEntry, StoreError};
use crate::validate;

/// API error response
#[derive(Serialize)]
struct ApiError {
    detail: String,
}

impl ApiError {
    fn new(msg: impl Into<String>) -> Self {
        Self { detail: msg.into() }
    }
}

fn error(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ApiError::new(msg))).into_response()
}

fn store_error(e: StoreError) -> Response {
    warn!(error = %e, "Storage error");
    error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Liveness check
pub async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true, "time": now_string() }))
}

/// Current snapshot of every unit
pub async fn list_units(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.read_state().await {
        Ok(items) => Json(json!({ "timestamp": now_string(), "items": items })).into_response(),
        Err(e) => store_error(e),
    }
}

/// One unit by id
pub async fn get_unit(
    State(state): State<Arc<AppState>>,
    Path(ac_id): Path<String>,
) -> impl IntoResponse {
    let rows = match state.store.read_state().await {
        Ok(rows) => rows,
        Err(e) => return store_error(e),
    };
    match rows.into_iter().find(|r| row_id(r) == ac_id) {
        Some(item) => Json(json!({ "item": item })).into_response(),
        None => error(StatusCode::NOT_FOUND, "AC not found"),
    }
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    limit: usize,
}

/// 720 readings at a 5 second interval is one hour
fn default_history_limit() -> usize {
    720
}

/// Recent temperature history of one unit
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(ac_id): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return error(rejection.status(), rejection.body_text()),
    };
    match state.store.read_history(&ac_id, query.limit).await {
        Ok(items) if items.is_empty() => error(StatusCode::NOT_FOUND, "No history for this AC"),
        Ok(items) => Json(json!({ "ac_id": ac_id, "items": items })).into_response(),
        Err(e) => store_error(e),
    }
}

/// Apply a command to one unit and log it
pub async fn apply_command(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(cmd) = match payload {
        Ok(p) => p,
        Err(rejection) => return error(rejection.status(), rejection.body_text()),
    };

    let action = match validate::validate_action(&cmd.action) {
        Ok(a) => a,
        Err(msg) => return error(StatusCode::BAD_REQUEST, msg),
    };
    let new_value = match validate::normalize_value(action, &cmd.value, &state.config.limits) {
        Ok(v) => v,
        Err(msg) => return error(StatusCode::BAD_REQUEST, msg),
    };

    let _guard = state.command_lock.lock().await;

    let mut rows = match state.store.read_state().await {
        Ok(rows) => rows,
        Err(e) => return store_error(e),
    };
    if rows.is_empty() {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "ac_state has no rows");
    }
    let Some(row) = rows.iter_mut().find(|r| row_id(r) == cmd.ac_id.as_str()) else {
        return error(StatusCode::NOT_FOUND, "AC not found");
    };

    let timestamp = now_string();
    let old_value = validate::apply_to_row(row, action, &new_value, &timestamp);

    if let Err(e) = state.store.write_state(&rows).await {
        return store_error(e);
    }

    let command = match cmd.note.as_deref().map(str::trim) {
        Some(note) if !note.is_empty() => note.to_string(),
        _ => format!("{} {} -> {}", action, cmd.ac_id, new_value),
    };
    let entry = CommandLogEntry {
        timestamp,
        user: cmd.user.clone(),
        command,
        ac_id: cmd.ac_id.to_string(),
        old_value,
        new_value: validate::to_json(&new_value),
        status: "Applied",
    };
    if let Err(e) = state.store.append_command_log(&entry).await {
        warn!(error = %e, device = %cmd.ac_id, "Command applied but not logged");
    }

    info!(
        device = %cmd.ac_id,
        user = %cmd.user,
        action,
        value = %new_value,
        "Applied command"
    );

    Json(CommandApplied {
        ok: true,
        action: action.to_string(),
        ac_id: cmd.ac_id,
        new_value,
    })
    .into_response()
}
