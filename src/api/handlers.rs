//! Scrape API handlers

use crate::api::{AppError, AppResult, AppState};
use crate::crawler::Coordinator;
use crate::models::{Movie, ScrapeRequest};
use crate::state::RunState;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

/// Body of an accepted trigger
#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub status: &'static str,
}

/// Body of the status endpoint
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Textual run state: idle, running, completed or failed
    pub status: &'static str,
    pub run: RunState,
    /// Contents of the last finalized artifact
    pub movies: Vec<Movie>,
}

/// Starts a background scrape run
///
/// Responds 202 once the run owns the tracker, 409 if a run is already
/// active, and 400 for a malformed body or an invalid page count.
pub async fn start_scraping(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<StartResponse>)> {
    let Json(request) = payload?;

    let coordinator = Coordinator::try_start(
        Arc::clone(&state.config),
        state.client.clone(),
        state.tracker.clone(),
        Arc::clone(&state.store),
        &request,
    )?;

    tracing::info!("Accepted scrape request for {} pages", request.pages);
    coordinator.spawn();

    Ok((
        StatusCode::ACCEPTED,
        Json(StartResponse {
            status: "scraping started",
        }),
    ))
}

/// Reports the run state and the last finalized movies
///
/// A missing, unreadable or corrupt artifact is a 500 with an `{"error"}`
/// body.
pub async fn get_scrape_status(State(state): State<AppState>) -> AppResult<Json<StatusResponse>> {
    let run = state.tracker.current_state();
    let store = Arc::clone(&state.store);

    let loaded = tokio::task::spawn_blocking(move || store.load())
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read movies: {}", e)))?;

    let movies = match loaded {
        Ok(movies) => movies,
        Err(e) if e.is_not_found() => {
            return Err(AppError::Internal(
                "Failed to read movies: no run has finalized yet".to_string(),
            ))
        }
        Err(e) => return Err(AppError::Internal(format!("Failed to read movies: {}", e))),
    };

    Ok(Json(StatusResponse {
        status: run.as_str(),
        run,
        movies,
    }))
}
