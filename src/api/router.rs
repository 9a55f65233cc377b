use crate::api::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Builds the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::get_scrape_status))
        .route("/scrape_yts", post(handlers::start_scraping))
        .with_state(state)
}
