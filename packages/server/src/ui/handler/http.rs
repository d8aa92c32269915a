//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::{
    infrastructure::dto::http::{ErrorDto, HealthDto, ParticipantDto},
    ui::state::AppState,
};
use conclave_shared::time::to_rfc3339_millis;

/// Name reported by the health endpoint
pub const SERVICE_NAME: &str = "signaling-service";

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: to_rfc3339_millis(Utc::now()),
    })
}

/// Current participants of a meeting; an unknown meeting has none.
pub async fn get_participants(
    State(state): State<Arc<AppState>>,
    Path(meeting_id): Path<String>,
) -> Result<Json<Vec<ParticipantDto>>, (StatusCode, Json<ErrorDto>)> {
    match state.get_participants_usecase.execute(meeting_id).await {
        Ok(participants) => {
            // Domain Model から DTO への変換
            Ok(Json(participants.iter().map(ParticipantDto::from).collect()))
        }
        Err(e) => Err((StatusCode::BAD_REQUEST, Json(ErrorDto::new(e.to_string())))),
    }
}
