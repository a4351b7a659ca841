pub mod keyboard;
pub mod selection;
pub mod venue;
pub mod viewport;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(venue::routes())
        .merge(selection::routes())
        .merge(keyboard::routes())
        .merge(viewport::routes())
}
