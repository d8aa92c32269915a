//! Server execution logic.

use std::{future::Future, io, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::ConnectionSettings,
    usecase::{
        AdmitParticipantUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        GetParticipantsUseCase, RelaySignalUseCase,
    },
};

use super::{
    handler::{get_participants, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Signaling server
///
/// This struct wires the use cases into the HTTP and WebSocket routes.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     admit_participant_usecase,
///     connect_participant_usecase,
///     disconnect_participant_usecase,
///     relay_signal_usecase,
///     get_participants_usecase,
///     ConnectionSettings::default(),
/// );
/// server.run(DEFAULT_HOST.to_string(), DEFAULT_PORT).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `admit_participant_usecase` - UseCase for token and meeting id admission
    /// * `connect_participant_usecase` - UseCase for registering a connection
    /// * `disconnect_participant_usecase` - UseCase for unregistering a connection
    /// * `relay_signal_usecase` - UseCase for relaying inbound messages
    /// * `get_participants_usecase` - UseCase for the participants query
    /// * `connection_settings` - Transport limits for every connection
    pub fn new(
        admit_participant_usecase: Arc<AdmitParticipantUseCase>,
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        relay_signal_usecase: Arc<RelaySignalUseCase>,
        get_participants_usecase: Arc<GetParticipantsUseCase>,
        connection_settings: ConnectionSettings,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                admit_participant_usecase,
                connect_participant_usecase,
                disconnect_participant_usecase,
                relay_signal_usecase,
                get_participants_usecase,
                connection_settings,
            }),
        }
    }

    /// Build the router with every route and middleware layer
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/signaling/{meeting_id}", get(websocket_handler))
            // HTTP エンドポイント
            .route(
                "/api/v1/meetings/{meeting_id}/participants",
                get(get_participants),
            )
            .route("/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the signaling server until Ctrl+C or SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (defaults to [`DEFAULT_HOST`](crate::config::DEFAULT_HOST) in the binary)
    /// * `port` - The port number to bind to (defaults to [`DEFAULT_PORT`](crate::config::DEFAULT_PORT))
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Signaling server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/signaling/{{meeting_id}}?token=...", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Serve on an already-bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
