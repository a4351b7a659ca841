use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use seatmap::config::Config;
use seatmap::models::{MapSize, Row, Seat, SeatStatus, Section, SectionTransform, Venue};
use seatmap::services::generator::{generate, GeneratorSpec};
use seatmap::storage::{FileStore, KeyValueStore, MemoryStore};
use seatmap::{app, AppState};

fn seat(id: &str, col: i32, row: i32, tier: u32, status: SeatStatus) -> Seat {
    Seat {
        id: id.to_string(),
        col,
        x: 50.0 + f64::from(col - 1) * 20.0,
        y: 80.0 + f64::from(row - 1) * 25.0,
        price_tier: tier,
        status,
    }
}

fn small_venue() -> Venue {
    use SeatStatus::*;
    let rows = (1..=3)
        .map(|r| Row {
            index: r,
            seats: (1..=5)
                .map(|c| {
                    let status = if r == 1 && c == 3 { Sold } else { Available };
                    seat(&format!("A-{}-{:02}", r, c), c, r, r as u32, status)
                })
                .collect(),
        })
        .collect();

    Venue {
        venue_id: "small-hall".to_string(),
        name: "Small Hall".to_string(),
        map: MapSize { width: 400.0, height: 300.0 },
        sections: vec![Section {
            id: "A".to_string(),
            label: "Section A".to_string(),
            transform: SectionTransform { x: 0.0, y: 0.0, scale: 1.0 },
            rows,
        }],
    }
}

fn state_with(storage: Arc<dyn KeyValueStore>) -> Arc<AppState> {
    AppState::new(Config::default(), storage)
}

fn ready_app(venue: Venue) -> (Arc<AppState>, Router) {
    let state = state_with(Arc::new(MemoryStore::new()));
    state.session().unwrap().install_venue(venue);
    let router = app(state.clone());
    (state, router)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

async fn toggle(app: &Router, seat_id: &str) -> (StatusCode, Value) {
    send(app, "PATCH", "/api/selection/toggle", Some(json!({ "seat_id": seat_id }))).await
}

async fn key(app: &Router, key: &str) -> Value {
    let (status, body) = send(app, "POST", "/api/keyboard", Some(json!({ "key": key }))).await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn health_and_banner() {
    let (_, app) = ready_app(small_venue());
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn interaction_is_inert_while_loading() {
    let state = state_with(Arc::new(MemoryStore::new()));
    let app = app(state);

    let (status, body) = send(&app, "GET", "/api/venue/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "loading");

    let (status, body) = post(&app, "/api/keyboard", json!({ "key": "ArrowDown" })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "POST", "/api/viewport/zoom-in", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn keyboard_navigation_and_selection() {
    let (_, app) = ready_app(small_venue());

    let body = key(&app, "ArrowUp").await;
    assert_eq!(body["focus"], "A-1-01");
    assert_eq!(body["details"]["tier_label"], "Premium");

    key(&app, "ArrowRight").await;
    let body = key(&app, "ArrowRight").await;
    // A-1-03 продано, фокус остаётся на A-1-02
    assert_eq!(body["focus"], "A-1-02");

    let body = key(&app, "ArrowDown").await;
    assert_eq!(body["focus"], "A-2-02");

    let body = key(&app, "Enter").await;
    assert_eq!(body["toggle"], "selected");

    let (_, summary) = send(&app, "GET", "/api/selection", None).await;
    assert_eq!(summary["count"], 1);
    assert_eq!(summary["total_price"], 50);
    assert_eq!(summary["seats"][0]["code"], "A-2-02");

    let body = key(&app, "Escape").await;
    assert_eq!(body["focus"], Value::Null);

    // Enter без фокуса ничего не делает
    let body = key(&app, "Enter").await;
    assert_eq!(body["toggle"], Value::Null);
}

#[tokio::test]
async fn toggle_outcomes_map_to_statuses() {
    let (_, app) = ready_app(small_venue());

    let (status, body) = toggle(&app, "A-1-03").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["outcome"], "unavailable");
    assert_eq!(body["selection"]["count"], 0);

    let (status, _) = toggle(&app, "Z-1-01").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let picks = ["A-1-01", "A-1-02", "A-1-04", "A-1-05", "A-2-01", "A-2-02", "A-2-03", "A-2-04"];
    for seat_id in picks {
        let (status, _) = toggle(&app, seat_id).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = toggle(&app, "A-3-01").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["outcome"], "limit_reached");
    assert_eq!(body["error"], "You can only select up to 8 seats.");
    assert_eq!(body["selection"]["count"], 8);

    // 4 * 75 + 4 * 50
    assert_eq!(body["selection"]["total_price"], 500);

    let (status, body) = send(&app, "DELETE", "/api/selection", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["total_price"], 0);
}

#[tokio::test]
async fn seat_details_and_focus_endpoints() {
    let (_, app) = ready_app(small_venue());

    let (status, body) = send(&app, "GET", "/api/seats/A-3-04", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["section_label"], "Section A");
    assert_eq!(body["row_index"], 3);
    assert_eq!(body["col"], 4);
    assert_eq!(body["tier_label"], "Economy");
    assert_eq!(body["price"], 25);

    let (status, body) = send(&app, "PUT", "/api/focus", Some(json!({ "seat_id": "A-1-03" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"]["status"], "sold");

    let (_, body) = send(&app, "DELETE", "/api/focus", None).await;
    assert_eq!(body["focus"], Value::Null);

    let (status, _) = send(&app, "GET", "/api/seats/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn viewport_controls() {
    let (_, app) = ready_app(small_venue());

    for _ in 0..5 {
        send(&app, "POST", "/api/viewport/zoom-in", None).await;
    }
    let (_, body) = send(&app, "GET", "/api/viewport", None).await;
    assert_eq!(body["scale"], 4.0);
    assert_eq!(body["zoom_percent"], 400);

    send(&app, "POST", "/api/viewport/reset", None).await;
    post(&app, "/api/viewport/pointer/down", json!({ "x": 390.0, "y": 290.0 })).await;
    let moved = json!({ "x": 400.0, "y": 250.0 });
    let (_, body) = post(&app, "/api/viewport/pointer/move", moved).await;
    assert_eq!(body["panning"], true);
    assert_eq!(body["offset"]["x"], 10.0);
    assert_eq!(body["offset"]["y"], -40.0);
    send(&app, "POST", "/api/viewport/pointer/up", None).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/viewport/touch/start",
        Some(json!({ "touches": [{ "x": 0.0, "y": 0.0 }, { "x": 5.0, "y": 5.0 }] })),
    )
    .await;
    assert_eq!(body["panning"], false);

    let (_, body) = send(&app, "POST", "/api/viewport/reset", None).await;
    assert_eq!(body["scale"], 1.0);
    assert_eq!(body["offset"]["x"], 0.0);
    assert_eq!(body["offset"]["y"], 0.0);
}

#[tokio::test]
async fn click_on_seat_selects_it() {
    let (_, app) = ready_app(small_venue());

    // A-2-01 на (50, 105)
    let (status, body) = post(&app, "/api/viewport/click", json!({ "x": 52.0, "y": 104.0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seat_id"], "A-2-01");
    assert_eq!(body["toggle"], "selected");

    let (_, focus) = send(&app, "GET", "/api/focus", None).await;
    assert_eq!(focus["focus"], "A-2-01");
}

#[tokio::test]
async fn click_on_sold_seat_focuses_without_selecting() {
    let (_, app) = ready_app(small_venue());

    // A-1-03 продано, стоит на (90, 80)
    let (status, body) = post(&app, "/api/viewport/click", json!({ "x": 90.0, "y": 80.0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seat_id"], "A-1-03");
    assert_eq!(body["toggle"], Value::Null);
    assert_eq!(body["selection"]["count"], 0);

    let (_, focus) = send(&app, "GET", "/api/focus", None).await;
    assert_eq!(focus["focus"], "A-1-03");
    assert_eq!(focus["details"]["status"], "sold");
}

#[tokio::test]
async fn keyboard_help_lists_bindings() {
    let (_, app) = ready_app(small_venue());

    let (status, body) = send(&app, "GET", "/api/keyboard/help", None).await;
    assert_eq!(status, StatusCode::OK);
    let help = body.as_array().unwrap();
    assert_eq!(help.len(), 3);
    assert_eq!(help[0]["keys"], "Arrow Keys");
    assert_eq!(help[1]["action"], "Select/deselect seat");
    assert_eq!(help[2]["keys"], "Escape");
}

#[tokio::test]
async fn render_cap_applies_to_large_venue() {
    let venue = generate(&GeneratorSpec { rows: 50, ..GeneratorSpec::default() });
    let (_, app) = ready_app(venue);

    let (status, body) = send(&app, "GET", "/api/render", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rendered"], 20_000);
    assert_eq!(body["omitted"], 5_000);
    assert_eq!(body["labels"].as_array().unwrap().len(), 10);

    let (_, body) = send(&app, "GET", "/api/venue/status", None).await;
    assert_eq!(body["seats"], 25_000);
}

#[tokio::test]
async fn venue_document_and_pricing() {
    let (_, app) = ready_app(small_venue());

    let (status, body) = send(&app, "GET", "/api/venue", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["venueId"], "small-hall");
    assert_eq!(body["sections"][0]["rows"][0]["seats"][0]["priceTier"], 1);

    let (_, body) = send(&app, "GET", "/api/pricing", None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["label"], "Premium");
}

#[tokio::test]
async fn failed_load_reports_error_and_allows_reload() {
    let mut config = Config::default();
    config.venue.source = "/definitely/missing/venue.json".to_string();
    let state = AppState::new(config, Arc::new(MemoryStore::new()));
    state.load_venue().await;
    let app = app(state.clone());

    let (_, body) = send(&app, "GET", "/api/venue/status", None).await;
    assert_eq!(body["state"], "failed");

    let (status, body) = post(&app, "/api/keyboard", json!({ "key": "ArrowDown" })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().starts_with("Failed to load venue"));

    let (status, body) = send(&app, "POST", "/api/venue/reload", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["state"], "loading");
}

#[tokio::test]
async fn synthetic_source_loads() {
    let mut config = Config::default();
    config.venue.source = "synthetic".to_string();
    let state = AppState::new(config, Arc::new(MemoryStore::new()));
    state.load_venue().await;

    let app = app(state);
    let (_, body) = send(&app, "GET", "/api/venue/status", None).await;
    assert_eq!(body["state"], "ready");
    assert_eq!(body["seats"], 15_000);
}

#[tokio::test]
async fn selection_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selection.json");

    {
        let state = state_with(Arc::new(FileStore::new(&path)));
        state.session().unwrap().install_venue(small_venue());
        let app = app(state);
        toggle(&app, "A-3-05").await;
    }

    let state = state_with(Arc::new(FileStore::new(&path)));
    let app = app(state);
    // выбор читается ещё до загрузки площадки
    let (_, body) = send(&app, "GET", "/api/selection", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["seats"][0]["seat_id"], "A-3-05");
    assert_eq!(body["total_price"], 25);
}
