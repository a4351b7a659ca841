use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::AppError;
use crate::services::viewport::ViewportState;
use crate::services::{Point, ToggleOutcome};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/viewport", get(get_viewport))
        .route("/viewport/zoom-in", post(zoom_in))
        .route("/viewport/zoom-out", post(zoom_out))
        .route("/viewport/reset", post(reset))
        .route("/viewport/pointer/down", post(pointer_down))
        .route("/viewport/pointer/move", post(pointer_move))
        .route("/viewport/pointer/up", post(pointer_up))
        .route("/viewport/touch/start", post(touch_start))
        .route("/viewport/touch/move", post(touch_move))
        .route("/viewport/touch/end", post(touch_end))
        .route("/viewport/click", post(click))
}

type ViewportResult = Result<Json<ViewportState>, AppError>;

#[derive(Debug, Deserialize)]
struct TouchRequest {
    touches: Vec<Point>,
}

async fn get_viewport(State(state): State<Arc<AppState>>) -> ViewportResult {
    Ok(Json(state.session()?.viewport()?))
}

async fn zoom_in(State(state): State<Arc<AppState>>) -> ViewportResult {
    Ok(Json(state.session()?.zoom_in()?))
}

async fn zoom_out(State(state): State<Arc<AppState>>) -> ViewportResult {
    Ok(Json(state.session()?.zoom_out()?))
}

async fn reset(State(state): State<Arc<AppState>>) -> ViewportResult {
    Ok(Json(state.session()?.reset_view()?))
}

async fn pointer_down(State(state): State<Arc<AppState>>, Json(p): Json<Point>) -> ViewportResult {
    Ok(Json(state.session()?.pointer_down(p)?))
}

async fn pointer_move(State(state): State<Arc<AppState>>, Json(p): Json<Point>) -> ViewportResult {
    Ok(Json(state.session()?.pointer_move(p)?))
}

async fn pointer_up(State(state): State<Arc<AppState>>) -> ViewportResult {
    Ok(Json(state.session()?.pointer_up()?))
}

async fn touch_start(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TouchRequest>,
) -> ViewportResult {
    Ok(Json(state.session()?.touch_start(&req.touches)?))
}

async fn touch_move(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TouchRequest>,
) -> ViewportResult {
    Ok(Json(state.session()?.touch_move(&req.touches)?))
}

async fn touch_end(State(state): State<Arc<AppState>>) -> ViewportResult {
    Ok(Json(state.session()?.touch_end()?))
}

// POST /api/viewport/click - клик в экранных координатах
async fn click(
    State(state): State<Arc<AppState>>,
    Json(p): Json<Point>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.session()?;
    let outcome = session.click(p)?;

    let notice = match outcome.toggle {
        Some(ToggleOutcome::LimitReached) => Some(session.limit_notice()),
        _ => None,
    };

    Ok(Json(json!({
        "seat_id": outcome.seat_id,
        "toggle": outcome.toggle,
        "notice": notice,
        "selection": session.summary(),
    })))
}
