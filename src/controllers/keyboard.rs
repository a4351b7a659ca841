use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::AppError;
use crate::services::keyboard::{KeyHelp, KEY_HELP};
use crate::services::ToggleOutcome;
use crate::session::SeatDetails;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/keyboard", post(press_key))
        .route("/keyboard/help", get(key_help))
        .route("/focus", get(get_focus).put(set_focus).delete(clear_focus))
}

#[derive(Debug, Deserialize)]
struct KeyRequest {
    key: String,
}

// POST /api/keyboard
async fn press_key(
    State(state): State<Arc<AppState>>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.session()?;
    let outcome = session.handle_key(&req.key)?;

    let notice = match outcome.toggle {
        Some(ToggleOutcome::LimitReached) => Some(session.limit_notice()),
        _ => None,
    };

    Ok(Json(json!({
        "handled": outcome.handled,
        "focus": outcome.focus,
        "toggle": outcome.toggle,
        "notice": notice,
        "details": session.focused_details(),
    })))
}

// GET /api/keyboard/help
async fn key_help() -> Json<&'static [KeyHelp]> {
    Json(KEY_HELP)
}

#[derive(Debug, Serialize)]
struct FocusResponse {
    focus: Option<String>,
    details: Option<SeatDetails>,
}

// GET /api/focus
async fn get_focus(State(state): State<Arc<AppState>>) -> Result<Json<FocusResponse>, AppError> {
    let session = state.session()?;
    Ok(Json(FocusResponse {
        focus: session.focused().map(str::to_string),
        details: session.focused_details(),
    }))
}

#[derive(Debug, Deserialize)]
struct FocusRequest {
    seat_id: String,
}

// PUT /api/focus
async fn set_focus(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FocusRequest>,
) -> Result<Json<FocusResponse>, AppError> {
    let mut session = state.session()?;
    session.focus_seat(&req.seat_id)?;
    Ok(Json(FocusResponse {
        focus: session.focused().map(str::to_string),
        details: session.focused_details(),
    }))
}

// DELETE /api/focus
async fn clear_focus(State(state): State<Arc<AppState>>) -> Result<Json<FocusResponse>, AppError> {
    let mut session = state.session()?;
    session.blur();
    Ok(Json(FocusResponse { focus: None, details: None }))
}
