//! Fixgate Core Domain
//!
//! Pure domain types for the fixgate trading gateway.
//! No async and no I/O: identifiers, instruments, sides and the events
//! the gateway hands to strategies.

pub mod entities;
pub mod events;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Instrument, MdRequestId, OrderId, OrderIntent, SessionId, SessionRole, Side,
};
pub use events::{ExecutionEvent, MarketDataEvent, MdRejectReason, RejectNotice};
pub use values::{Price, Quantity};
