//! Runner configuration
//!
//! Loaded from a JSON file. Every section has defaults, so `{}` is a valid
//! configuration for a paper run.

use fixgate_core::{Instrument, Price, Quantity, SessionId};
use fixgate_gateway::{GatewayConfig, SessionSettings};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid session config: {0}")]
    InvalidSession(String),
}

fn default_begin_string() -> String {
    "FIX.4.2".to_string()
}

/// One FIX session and its application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_begin_string")]
    pub begin_string: String,
    pub sender_comp_id: String,
    pub target_comp_id: String,

    #[serde(flatten)]
    pub settings: SessionSettings,
}

impl SessionConfig {
    pub fn session_id(&self) -> SessionId {
        SessionId::new(
            self.begin_string.clone(),
            self.sender_comp_id.clone(),
            self.target_comp_id.clone(),
        )
    }
}

/// Strategy section: what to record and where
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub symbol: String,
    pub maturity_month_year: String,
    pub exchange: String,
    pub account: String,
    pub journal_path: PathBuf,

    /// Send one market buy of this size on the first trade
    pub probe_order_qty: Option<Quantity>,
}

impl StrategyConfig {
    pub fn instrument(&self) -> Instrument {
        Instrument::future(&self.symbol, &self.maturity_month_year, &self.exchange)
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbol: "ES".to_string(),
            maturity_month_year: "202612".to_string(),
            exchange: "CME".to_string(),
            account: "ACC1".to_string(),
            journal_path: PathBuf::from("data/ticks.csv"),
            probe_order_qty: None,
        }
    }
}

/// Quotes served by the paper exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperConfig {
    pub bid: Price,
    pub offer: Price,
    pub last_trade: Price,
    pub size: Quantity,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            bid: dec!(5012.25),
            offer: dec!(5012.50),
            last_trade: dec!(5012.50),
            size: dec!(10),
        }
    }
}

fn default_sessions() -> Vec<SessionConfig> {
    vec![
        SessionConfig {
            begin_string: default_begin_string(),
            sender_comp_id: "CLIENT_MD".to_string(),
            target_comp_id: "CME".to_string(),
            settings: SessionSettings::market_data(),
        },
        SessionConfig {
            begin_string: default_begin_string(),
            sender_comp_id: "CLIENT_OE".to_string(),
            target_comp_id: "CME".to_string(),
            settings: SessionSettings::order_entry(),
        },
    ]
}

fn default_id_store_path() -> PathBuf {
    PathBuf::from("data/last_order_id.json")
}

/// Top-level runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default = "default_sessions")]
    pub sessions: Vec<SessionConfig>,

    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Where the last issued order id is persisted
    #[serde(default = "default_id_store_path")]
    pub id_store_path: PathBuf,

    #[serde(default)]
    pub strategy: StrategyConfig,

    #[serde(default)]
    pub paper: PaperConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            sessions: default_sessions(),
            gateway: GatewayConfig::default(),
            id_store_path: default_id_store_path(),
            strategy: StrategyConfig::default(),
            paper: PaperConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sessions.is_empty() {
            return Err(ConfigError::InvalidSession("no sessions configured".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for session in &self.sessions {
            let id = session.session_id();
            if !seen.insert(id.clone()) {
                return Err(ConfigError::InvalidSession(format!("{} configured twice", id)));
            }
        }
        Ok(())
    }

    pub fn session_table(&self) -> Vec<(SessionId, SessionSettings)> {
        self.sessions
            .iter()
            .map(|s| (s.session_id(), s.settings.clone()))
            .collect()
    }
}
