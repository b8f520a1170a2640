//! Error types for the runner crate

use crate::config::ConfigError;
use fixgate_gateway::{GatewayError, PersistenceError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Order id store error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Tick journal error: {0}")]
    Journal(#[from] csv::Error),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}
