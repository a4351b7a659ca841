pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod pricing;
pub mod services;
pub mod session;
pub mod storage;

use axum::Router;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use error::AppError;
use pricing::PricingTable;
use services::{SelectionStore, VenueLoader};
use session::Session;
use storage::KeyValueStore;

// Shared state для всего приложения
pub struct AppState {
    pub config: config::Config,
    pub loader: VenueLoader,
    session: Mutex<Session>,
}

impl AppState {
    pub fn new(config: config::Config, storage: Arc<dyn KeyValueStore>) -> Arc<Self> {
        let selection = SelectionStore::load(
            storage,
            &config.selection.storage_key,
            config.selection.max_seats,
        );
        let session = Session::new(selection, PricingTable::default(), config.viewport.render_cap);

        Arc::new(Self {
            config,
            loader: VenueLoader::new(),
            session: Mutex::new(session),
        })
    }

    // Блокировка держится только на время синхронной операции, не через .await
    pub fn session(&self) -> Result<MutexGuard<'_, Session>, AppError> {
        self.session.lock().map_err(|_| AppError::SessionPoisoned)
    }

    /// Загрузка площадки в фоне. До её завершения обработчики инертны.
    pub fn spawn_venue_load(self: &Arc<Self>) {
        let state = self.clone();
        task::spawn(async move {
            state.load_venue().await;
        });
    }

    pub async fn load_venue(&self) {
        let source = self.config.venue.source();
        let result = self.loader.load(&source).await;
        match self.session() {
            Ok(mut session) => session.finish_load(result),
            Err(e) => tracing::error!("Cannot install venue: {}", e),
        }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", axum::routing::get(|| async { "Seatmap API v1.0" }))
        .route("/health", axum::routing::get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
