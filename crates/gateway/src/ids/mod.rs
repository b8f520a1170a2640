//! Order and market data request identifiers
//!
//! Order ids are durable: every allocation is written to the store before
//! the id is handed out, so a restart can never reuse one. Market data
//! request ids only live as long as the process.

mod generator;
mod store;

pub use generator::IdGenerator;
pub use store::{FileIdStore, MemoryIdStore, OrderIdRecord, OrderIdStore};
