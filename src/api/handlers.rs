//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{error, info, warn};

use crate::{
    error::CountdownError,
    state::{AppState, Digit, Effect, TimerSnapshot},
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Turn the outcome of a user intent into a response
fn respond(
    action: &str,
    outcome: Result<(Effect, TimerSnapshot), CountdownError>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match outcome {
        Ok((effect, timer)) => Ok(Json(ApiResponse::from_effect(effect, action, timer))),
        Err(e) => {
            error!("Failed to apply {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /digit/:digit - Append a digit to the input
pub async fn digit_handler(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let mut chars = raw.chars();
    let digit = match (chars.next(), chars.next()) {
        (Some(c), None) => Digit::try_from(c),
        _ => {
            warn!("Rejected keypad input {:?}", raw);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    match digit {
        Ok(digit) => respond("digit", state.press_digit(digit)),
        Err(e) => {
            warn!("Rejected keypad input: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// Handle POST /backspace - Drop the last digit
pub async fn backspace_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("backspace", state.backspace())
}

/// Handle POST /clear - Empty the input
pub async fn clear_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("clear", state.clear())
}

/// Handle POST /toggle - Start, pause or resume the countdown
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("toggle", state.toggle())
}

/// Handle POST /stop - Stop the countdown and clear the input
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("stop", state.stop())
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream every snapshot as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    info!("Event stream subscriber connected");
    let rx = state.watch();

    // First item is the current snapshot, then one per change
    let events = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let snapshot = rx.borrow_and_update().clone();
        let event = Event::default().event("timer").json_data(&snapshot);
        Some((event, (rx, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
