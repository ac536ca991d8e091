//! Shared error type across FleetPulse crates.

use thiserror::Error;

/// Stable error codes used in logs and startup diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input (config, fixture list).
    BadRequest,
    /// Peer went away or the socket failed.
    Transport,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Transport => "TRANSPORT",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FleetPulseError>;

/// Unified error type used by core, gateway, and client.
#[derive(Debug, Error)]
pub enum FleetPulseError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl FleetPulseError {
    /// Map internal error to a stable code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            FleetPulseError::BadRequest(_) => ClientCode::BadRequest,
            FleetPulseError::Transport(_) => ClientCode::Transport,
            FleetPulseError::Internal(_) => ClientCode::Internal,
        }
    }
}
