use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::AppError;
use crate::services::selection::SelectionSummary;
use crate::services::ToggleOutcome;
use crate::session::SeatDetails;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seats/{seat_id}", get(get_seat))
        .route("/selection", get(get_selection))
        .route("/selection", delete(clear_selection))
        .route("/selection/toggle", patch(toggle_seat))
}

// GET /api/seats/{seat_id}
async fn get_seat(
    State(state): State<Arc<AppState>>,
    Path(seat_id): Path<String>,
) -> Result<Json<SeatDetails>, AppError> {
    Ok(Json(state.session()?.seat_details(&seat_id)?))
}

// GET /api/selection
async fn get_selection(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SelectionSummary>, AppError> {
    Ok(Json(state.session()?.summary()))
}

// DELETE /api/selection
async fn clear_selection(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SelectionSummary>, AppError> {
    let mut session = state.session()?;
    session.clear_selection();
    Ok(Json(session.summary()))
}

#[derive(Debug, Deserialize)]
struct ToggleRequest {
    seat_id: String,
}

// PATCH /api/selection/toggle
async fn toggle_seat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ToggleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.seat_id.trim().is_empty() {
        return Err(AppError::BadRequest("seat_id must not be empty".to_string()));
    }

    let mut session = state.session()?;
    let outcome = session.toggle_seat(&req.seat_id)?;
    let summary = session.summary();

    let (status, body) = match outcome {
        ToggleOutcome::Selected | ToggleOutcome::Deselected => (
            StatusCode::OK,
            json!({ "success": true, "outcome": outcome, "selection": summary }),
        ),
        // Лимит не ошибка, а подсказка пользователю
        ToggleOutcome::LimitReached => (
            StatusCode::CONFLICT,
            json!({
                "success": false,
                "outcome": outcome,
                "error": session.limit_notice(),
                "selection": summary
            }),
        ),
        ToggleOutcome::Unavailable => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "success": false,
                "outcome": outcome,
                "error": format!("Seat {} is not available", req.seat_id),
                "selection": summary
            }),
        ),
    };
    Ok((status, Json(body)))
}
