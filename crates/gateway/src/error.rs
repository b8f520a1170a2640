//! Error types for the gateway crate

use fixgate_core::{SessionId, SessionRole};
use thiserror::Error;

/// Session-engine level errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Session engine failed to start: {0}")]
    Start(String),

    #[error("Session engine not started")]
    NotStarted,

    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),

    #[error("Session {0} is not logged on")]
    NotLoggedOn(SessionId),

    #[error("Message to {0} suppressed by the application")]
    Suppressed(SessionId),

    #[error("Send failed: {0}")]
    Send(String),
}

/// Order id store errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to {op} order id store {path}: {source}")]
    Io {
        op: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt order id record in {path}: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Order id store unavailable: {0}")]
    Unavailable(String),

    #[error("Order id space exhausted")]
    Exhausted,
}

/// Gateway-level errors
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Ambiguous or missing role binding
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Timed out after {attempts} attempts waiting for sessions to log on ({pending})")]
    SessionTimeout { attempts: u32, pending: String },

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("No session bound for role {0}")]
    RoleUnbound(SessionRole),

    #[error("Invalid gateway state for {operation}: {state}")]
    InvalidState {
        operation: &'static str,
        state: crate::gateway::GatewayState,
    },
}
