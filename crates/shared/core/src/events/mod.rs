//! Typed business events produced from inbound wire messages.
//!
//! Events are ephemeral: produced per inbound message and consumed
//! immediately by the strategy.

mod execution;
mod market_data;

pub use execution::{ExecutionEvent, MdRejectReason, RejectNotice};
pub use market_data::MarketDataEvent;
