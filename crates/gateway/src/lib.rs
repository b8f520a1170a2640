//! Fixgate Gateway
//!
//! Trading gateway between a FIX 4.2 session engine and a trading strategy.
//! Provides:
//! - Session role binding (market data, order entry) and startup readiness
//! - Durable order ids and ephemeral market data request ids
//! - Translation between typed intents/events and FIX messages
//! - Suppression of possible-duplicate outbound application messages
//!
//! ## Architecture
//!
//! ```text
//!  Strategy ──intents──► Gateway ──FIX──► SessionEngine ──► Exchange
//!     ▲                    │  ▲                 │
//!     └──────events────────┘  └────callbacks────┘
//! ```
//!
//! The session engine (sockets, heartbeats, sequence numbers, resend) is
//! external and plugged in through [`SessionEngine`].

pub mod error;
pub mod gateway;
pub mod ids;
pub mod messages;
pub mod session;
pub mod strategy;
pub mod translator;
pub mod transport;

// Re-export commonly used types
pub use error::{GatewayError, PersistenceError, TransportError};
pub use gateway::{Gateway, GatewayConfig, GatewayState, ReadinessPolicy};
pub use ids::{FileIdStore, IdGenerator, MemoryIdStore, OrderIdStore};
pub use messages::{FieldError, FieldMap, FixMessage, Tag, tags};
pub use session::{BindOutcome, DuplicateGuard, SessionRoleRegistry, SessionSettings};
pub use strategy::{Strategy, TradingIntents};
pub use translator::{Diagnostic, InboundKind, MessageTranslator, OrderDefaults};
pub use transport::{
    MessageDispatch, OutboundDecision, SessionApplication, SessionEngine, SessionLifecycle,
};
