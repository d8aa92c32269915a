//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        ws::{WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    infrastructure::dto::http::ErrorDto,
    ui::{
        connection::{ConnectionPhase, run_connection},
        state::AppState,
    },
    usecase::{AdmissionError, Admission},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// `GET /signaling/{meeting_id}?token=...`
///
/// Admission runs before the upgrade is accepted, so a rejected request is
/// answered with a plain HTTP error and never becomes a connection.
pub async fn websocket_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<Arc<AppState>>,
    Path(meeting_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Response {
    let admission = match state
        .admit_participant_usecase
        .execute(meeting_id, query.token)
        .await
    {
        Ok(admission) => admission,
        Err(e) => {
            tracing::warn!("Rejected signaling connection: {}", e);
            return rejection(&e).into_response();
        }
    };

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    tracing::debug!(
        "Participant '{}' is now {:?} to meeting '{}'",
        admission.participant.user_id,
        ConnectionPhase::Admitted,
        admission.meeting_id
    );

    let max_message_size = state.connection_settings.max_message_size;
    ws.max_message_size(max_message_size)
        .max_frame_size(max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state, admission))
}

fn rejection(error: &AdmissionError) -> (StatusCode, Json<ErrorDto>) {
    let status = match error {
        AdmissionError::InvalidMeetingId(_) => StatusCode::BAD_REQUEST,
        AdmissionError::MissingToken
        | AdmissionError::Unauthorized(_)
        | AdmissionError::InvalidDisplayName(_) => StatusCode::UNAUTHORIZED,
    };
    (status, Json(ErrorDto::new(error.to_string())))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, admission: Admission) {
    let user_id = admission.participant.user_id.clone();
    let meeting_id = admission.meeting_id.clone();

    // The connection must be routable before either loop starts
    let session = match state.connect_participant_usecase.execute(admission).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(
                "Failed to register '{}' in meeting '{}': {}",
                user_id,
                meeting_id,
                e
            );
            return;
        }
    };

    tracing::info!(
        "Client '{}' connected to meeting '{}' (connection {})",
        user_id,
        meeting_id,
        session.connection_id
    );

    run_connection(socket, session, state).await;
}
