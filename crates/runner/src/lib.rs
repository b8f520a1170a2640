//! Fixgate Runner
//!
//! Wires a [`Gateway`] to the in-process paper exchange and the tick
//! recorder strategy:
//!
//! ```text
//!  RunnerConfig ──► PaperExchange (SessionEngine)
//!               ──► IdGenerator (FileIdStore)
//!               ──► TickRecorder (Strategy) ──► CSV journal
//! ```

pub mod config;
pub mod error;
pub mod paper;
pub mod recorder;

pub use config::{ConfigError, PaperConfig, RunnerConfig, SessionConfig, StrategyConfig};
pub use error::RunnerError;
pub use paper::PaperExchange;
pub use recorder::{TickJournal, TickRecorder};

use fixgate_gateway::{FileIdStore, Gateway, IdGenerator};
use log::info;
use std::sync::Arc;

/// Build a gateway over the paper exchange from `config`
pub fn build_paper_gateway(config: &RunnerConfig) -> Result<Gateway, RunnerError> {
    let engine = Arc::new(PaperExchange::new(
        config.session_table(),
        config.paper.clone(),
    ));

    let ids = IdGenerator::open(FileIdStore::new(&config.id_store_path))?;
    info!(
        "Order id store {} (last issued {})",
        config.id_store_path.display(),
        ids.current_order_id()
    );

    let strategy_config = &config.strategy;
    let journal = TickJournal::create(&strategy_config.journal_path)?;
    let mut recorder = TickRecorder::new(
        strategy_config.instrument(),
        strategy_config.account.clone(),
        journal,
    );
    if let Some(quantity) = strategy_config.probe_order_qty {
        recorder = recorder.with_probe_order(quantity);
    }

    Ok(Gateway::new(
        engine,
        Arc::new(ids),
        Box::new(recorder),
        config.gateway.clone(),
    ))
}
