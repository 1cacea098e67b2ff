use axum::Router;

use crate::state::AppState;

pub mod doc;
pub mod health;
pub mod kots;
pub mod orders;
pub mod params;
pub mod stock;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(orders::router())
        .nest("/kot", kots::router())
        .nest("/item", stock::router())
}
