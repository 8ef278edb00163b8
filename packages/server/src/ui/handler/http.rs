//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::http::{HealthDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Get list of rooms
///
/// Answered by the relay loop, so the list is consistent with the rosters
/// clients have been sent.
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomSummaryDto>>, StatusCode> {
    let snapshot = state.relay.snapshot().await.map_err(|e| {
        tracing::error!("Failed to get rooms: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    // Domain Model から DTO への変換
    let rooms = snapshot
        .rooms
        .into_iter()
        .map(RoomSummaryDto::from)
        .collect();

    Ok(Json(rooms))
}
