use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::Value;

use crate::{error::AppError, message::ChatRequest, state::SharedState};

/// `POST /api/chat`: reply text as a plain body, 200 even for the generic
/// upstream error strings.
pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reply = state.proxy.handle(&payload.user_input).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        reply,
    ))
}

pub async fn get_profile_handler(State(state): State<SharedState>) -> Result<Json<Value>, AppError> {
    state
        .profile
        .as_deref()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("profile data is not loaded".to_string()))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub max_concurrency: usize,
    pub in_flight: usize,
    pub waiting: usize,
    pub profile_loaded: bool,
}

pub async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        max_concurrency: state.gate.capacity(),
        in_flight: state.gate.in_flight(),
        waiting: state.gate.waiting(),
        profile_loaded: state.profile.is_some(),
    })
}
