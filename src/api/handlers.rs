//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    state::{ActionOutcome, AppState},
    timer::Mode,
};
use super::responses::{ApiResponse, HealthResponse, MuteRequest, StartRequest, StatusResponse};

fn respond(action: &str, result: Result<ActionOutcome, String>) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(outcome) => {
            info!("{} endpoint called - changed={}, remaining={}s",
                  action, outcome.changed, outcome.snapshot.remaining);
            Ok(Json(ApiResponse::from_outcome(action, outcome)))
        }
        Err(e) => {
            error!("Failed to {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start the timer, optionally with custom duration input
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let input = match body {
        Ok(Json(request)) => Some(request.into()),
        // No JSON body at all: start with whatever input is pending
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(e) => {
            warn!("Rejected start body: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    respond("start", state.start(Utc::now(), input))
}

/// Handle POST /pause - Pause a running timer
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("pause", state.pause())
}

/// Handle POST /resume - Resume a paused timer
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("resume", state.resume(Utc::now()))
}

/// Handle POST /stop - Stop and restore the mode's duration
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("stop", state.stop())
}

/// Handle POST /reset - Stop and clear any custom duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("reset", state.reset())
}

/// Handle POST /mode/:mode - Switch mode while idle or finished
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let mode: Mode = match mode.parse() {
        Ok(mode) => mode,
        Err(e) => {
            warn!("{}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    respond("switch-mode", state.switch_mode(mode))
}

/// Handle POST /mute - Mute or unmute the completion alarm
pub async fn mute_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MuteRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let action = if request.muted { "mute" } else { "unmute" };
    respond(action, state.set_muted(request.muted))
}

/// Handle GET /status - Return current timer snapshot and session metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(snapshot) => snapshot,
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

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
