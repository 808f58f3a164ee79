//! Error types for monitoring client operations

use thiserror::Error;

/// Result type alias for monitoring client operations
pub type Result<T> = std::result::Result<T, MonitoringError>;

/// Errors that can occur during monitoring client operations
///
/// The three runtime kinds (`Transport`, `HttpStatus`, `Decode`) are kept
/// distinct so callers can layer their own retry policy on top.
#[derive(Error, Debug)]
pub enum MonitoringError {
    /// The request never produced an HTTP response
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Server answered with a non-2xx status
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Server answered 2xx but the body is not valid JSON
    #[error("Failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// Invalid construction parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures below the HTTP layer
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection, DNS or TLS failure reported by reqwest
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Transport was closed by its owner
    #[error("Transport is closed")]
    Closed,

    /// Connection failed
    #[error("Connection failed: {0}")]
    Connection(String),
}

impl MonitoringError {
    /// Create an HTTP status error from status code and raw body
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// HTTP status code, if the server produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_http_status(&self) -> bool {
        matches!(self, Self::HttpStatus { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
