//! Server configuration.
//!
//! Values come from the binary's command-line arguments (each with an
//! environment-variable fallback) and are checked by
//! [`ServerConfig::validate`] before anything is started. The JWT secret is
//! redacted in Debug output.

use std::{fmt, time::Duration};

use thiserror::Error;

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default bind port
pub const DEFAULT_PORT: u16 = 8081;
/// Default upper bound for one inbound message, in bytes
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;
/// Default time allowed between two inbound frames, in seconds
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;
/// Default keepalive ping period, in seconds
pub const DEFAULT_KEEPALIVE_INTERVAL_SECS: u64 = 54;
/// Default deadline for a single outbound write, in seconds
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;
/// Default capacity of each connection's outbound queue
pub const DEFAULT_OUTBOUND_QUEUE_CAPACITY: usize = 256;
/// Default capacity of the hub's request queue
pub const DEFAULT_HUB_QUEUE_CAPACITY: usize = 1024;

/// Per-connection transport limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub max_message_size: usize,
    pub read_timeout: Duration,
    pub keepalive_interval: Duration,
    pub write_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            keepalive_interval: Duration::from_secs(DEFAULT_KEEPALIVE_INTERVAL_SECS),
            write_timeout: Duration::from_secs(DEFAULT_WRITE_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Shared secret for HS256 token validation
    pub jwt_secret: String,
    pub connection: ConnectionSettings,
    pub outbound_queue_capacity: usize,
    pub hub_queue_capacity: usize,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"[REDACTED]")
            .field("connection", &self.connection)
            .field("outbound_queue_capacity", &self.outbound_queue_capacity)
            .field("hub_queue_capacity", &self.hub_queue_capacity)
            .finish()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT secret must not be empty")]
    MissingSecret,

    #[error("Invalid configuration value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

impl ServerConfig {
    /// Configuration with every tunable at its default.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: jwt_secret.into(),
            connection: ConnectionSettings::default(),
            outbound_queue_capacity: DEFAULT_OUTBOUND_QUEUE_CAPACITY,
            hub_queue_capacity: DEFAULT_HUB_QUEUE_CAPACITY,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        non_zero("max_message_size", self.connection.max_message_size)?;
        non_zero("outbound_queue_capacity", self.outbound_queue_capacity)?;
        non_zero("hub_queue_capacity", self.hub_queue_capacity)?;

        let connection = &self.connection;
        if connection.read_timeout.is_zero() {
            return Err(invalid("read_timeout", "must be greater than zero"));
        }
        if connection.write_timeout.is_zero() {
            return Err(invalid("write_timeout", "must be greater than zero"));
        }
        if connection.keepalive_interval.is_zero() {
            return Err(invalid("keepalive_interval", "must be greater than zero"));
        }
        if connection.keepalive_interval >= connection.read_timeout {
            return Err(invalid(
                "keepalive_interval",
                format!(
                    "must be shorter than the read timeout ({}s >= {}s)",
                    connection.keepalive_interval.as_secs(),
                    connection.read_timeout.as_secs()
                ),
            ));
        }

        Ok(())
    }
}

fn non_zero(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(invalid(name, "must be greater than zero"))
    } else {
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        // テスト項目: デフォルト設定は検証を通る
        // given (前提条件):
        let config = ServerConfig::new("secret");

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(config.connection.max_message_size, 64 * 1024);
        assert_eq!(config.connection.read_timeout, Duration::from_secs(60));
        assert_eq!(config.connection.keepalive_interval, Duration::from_secs(54));
        assert_eq!(config.connection.write_timeout, Duration::from_secs(10));
        assert_eq!(config.outbound_queue_capacity, 256);
        assert_eq!(config.hub_queue_capacity, 1024);
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        // テスト項目: JWT シークレットが空だとエラーになる
        // given (前提条件):
        let config = ServerConfig::new("");

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert_eq!(result, Err(ConfigError::MissingSecret));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        // テスト項目: キュー容量 0 はエラーになる
        // given (前提条件):
        let mut config = ServerConfig::new("secret");
        config.outbound_queue_capacity = 0;

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                name: "outbound_queue_capacity",
                ..
            })
        ));
    }

    #[test]
    fn test_keepalive_must_be_shorter_than_read_timeout() {
        // テスト項目: キープアライブ間隔が読み取りタイムアウト以上だとエラーになる
        // given (前提条件):
        let mut config = ServerConfig::new("secret");
        config.connection.keepalive_interval = Duration::from_secs(60);

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                name: "keepalive_interval",
                ..
            })
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        // テスト項目: Debug 出力に JWT シークレットが含まれない
        // given (前提条件):
        let config = ServerConfig::new("super-secret-value");

        // when (操作):
        let output = format!("{:?}", config);

        // then (期待する結果):
        assert!(!output.contains("super-secret-value"));
        assert!(output.contains("[REDACTED]"));
    }
}
