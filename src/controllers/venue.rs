use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::error::AppError;
use crate::pricing::PriceTier;
use crate::services::render::{RenderStats, SectionLabel};
use crate::session::VenueStatus;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/venue", get(get_venue))
        .route("/venue/status", get(get_status))
        .route("/venue/reload", post(reload_venue))
        .route("/pricing", get(get_pricing))
        .route("/render", get(get_render))
}

// GET /api/venue
async fn get_venue(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let venue = state.session()?.loaded()?.venue.clone();

    let body = serde_json::to_vec(venue.as_ref()).map_err(|e| AppError::Internal(e.to_string()))?;
    Response::builder()
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .map_err(|e| AppError::Internal(e.to_string()))
}

// GET /api/venue/status
async fn get_status(State(state): State<Arc<AppState>>) -> Result<Json<VenueStatus>, AppError> {
    Ok(Json(state.session()?.status()))
}

// POST /api/venue/reload - единственный способ восстановиться после ошибки загрузки
async fn reload_venue(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let started = state.session()?.begin_load();
    if started {
        info!("Venue reload requested");
        state.spawn_venue_load();
    }
    let status = state.session()?.status();
    Ok((StatusCode::ACCEPTED, Json(status)))
}

// GET /api/pricing
async fn get_pricing(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PriceTier>>, AppError> {
    let session = state.session()?;
    Ok(Json(session.pricing().tiers().cloned().collect()))
}

#[derive(Debug, Serialize)]
struct RenderResponse {
    #[serde(flatten)]
    stats: RenderStats,
    labels: Vec<SectionLabel>,
}

// GET /api/render
async fn get_render(State(state): State<Arc<AppState>>) -> Result<Json<RenderResponse>, AppError> {
    let session = state.session()?;
    let stats = session.render_stats()?;
    let labels = session.loaded()?.render.labels().to_vec();
    Ok(Json(RenderResponse { stats, labels }))
}
