//! Signaling server for Conclave meetings.
//!
//! Relays WebRTC negotiation messages between the participants of each
//! meeting over WebSocket.
//!
//! Run with:
//! ```not_rust
//! JWT_SECRET=... cargo run --bin conclave-server
//! cargo run --bin conclave-server -- --host 0.0.0.0 --port 8081 --jwt-secret ...
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use conclave_server::{
    config::{
        ConnectionSettings, DEFAULT_HOST, DEFAULT_HUB_QUEUE_CAPACITY,
        DEFAULT_KEEPALIVE_INTERVAL_SECS, DEFAULT_MAX_MESSAGE_SIZE,
        DEFAULT_OUTBOUND_QUEUE_CAPACITY, DEFAULT_PORT, DEFAULT_READ_TIMEOUT_SECS,
        DEFAULT_WRITE_TIMEOUT_SECS, ServerConfig,
    },
    infrastructure::{auth::JwtTokenValidator, hub::Hub},
    ui::Server,
    usecase::{
        AdmitParticipantUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        GetParticipantsUseCase, RelaySignalUseCase,
    },
};
use conclave_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "conclave-server")]
#[command(about = "WebRTC signaling server for Conclave meetings", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Shared secret used to verify HS256 access tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Largest inbound message accepted, in bytes
    #[arg(long, env = "MAX_MESSAGE_SIZE", default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    max_message_size: usize,

    /// Seconds a connection may stay silent before it is closed
    #[arg(long, env = "READ_TIMEOUT_SECS", default_value_t = DEFAULT_READ_TIMEOUT_SECS)]
    read_timeout_secs: u64,

    /// Seconds between keepalive pings
    #[arg(long, env = "KEEPALIVE_INTERVAL_SECS", default_value_t = DEFAULT_KEEPALIVE_INTERVAL_SECS)]
    keepalive_interval_secs: u64,

    /// Seconds allowed for a single outbound write
    #[arg(long, env = "WRITE_TIMEOUT_SECS", default_value_t = DEFAULT_WRITE_TIMEOUT_SECS)]
    write_timeout_secs: u64,

    /// Messages buffered per connection before it is evicted
    #[arg(long, env = "OUTBOUND_QUEUE_CAPACITY", default_value_t = DEFAULT_OUTBOUND_QUEUE_CAPACITY)]
    outbound_queue_capacity: usize,

    /// Requests buffered for the hub coordinator
    #[arg(long, env = "HUB_QUEUE_CAPACITY", default_value_t = DEFAULT_HUB_QUEUE_CAPACITY)]
    hub_queue_capacity: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            jwt_secret: args.jwt_secret,
            connection: ConnectionSettings {
                max_message_size: args.max_message_size,
                read_timeout: Duration::from_secs(args.read_timeout_secs),
                keepalive_interval: Duration::from_secs(args.keepalive_interval_secs),
                write_timeout: Duration::from_secs(args.write_timeout_secs),
            },
            outbound_queue_capacity: args.outbound_queue_capacity,
            hub_queue_capacity: args.hub_queue_capacity,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(2);
    }
    tracing::debug!("Loaded configuration: {:?}", config);

    // Initialize dependencies in order:
    // 1. Hub and token validator
    // 2. UseCases
    // 3. Server

    // 1. Start the hub coordinator
    let clock = Arc::new(SystemClock);
    let (hub, _coordinator) = Hub::spawn(config.hub_queue_capacity, clock.clone());
    let hub = Arc::new(hub);
    let token_validator = Arc::new(JwtTokenValidator::new(config.jwt_secret.as_bytes()));

    // 2. Create UseCases
    let admit_participant_usecase = Arc::new(AdmitParticipantUseCase::new(token_validator));
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        hub.clone(),
        config.outbound_queue_capacity,
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(hub.clone()));
    let relay_signal_usecase = Arc::new(RelaySignalUseCase::new(hub.clone(), clock));
    let get_participants_usecase = Arc::new(GetParticipantsUseCase::new(hub));

    // 3. Create and run the server
    let server = Server::new(
        admit_participant_usecase,
        connect_participant_usecase,
        disconnect_participant_usecase,
        relay_signal_usecase,
        get_participants_usecase,
        config.connection,
    );
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
