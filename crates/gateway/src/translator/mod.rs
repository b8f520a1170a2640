//! Translation between typed intents/events and FIX 4.2 messages
//!
//! Outbound builders live in `outbound`, inbound parsers in `inbound`.
//! Inbound anomalies never fail the session: they surface as [`Diagnostic`]s.

mod inbound;
mod outbound;

pub use inbound::{InboundKind, MdEntries};

use crate::messages::{FieldError, FixMessage, tags};
use fixgate_core::Side;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recoverable inbound anomaly. Logged and forwarded to the strategy; no
/// event is produced for the offending message or entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("Unexpected message shape for MsgType={msg_type}: {reason}")]
    UnknownMessageShape { msg_type: String, reason: String },

    #[error("Not sure what to do with ExecutionReport with ExecType={0}")]
    UnknownExecutionType(char),

    #[error("Unknown MDEntryType: {0}")]
    UnknownEntryType(char),

    #[error("Unknown MDUpdateAction: {0}")]
    UnknownUpdateAction(char),

    #[error("Unknown Side: {0}")]
    UnknownSide(char),
}

impl Diagnostic {
    pub(crate) fn shape(msg: &FixMessage, reason: impl ToString) -> Self {
        Self::UnknownMessageShape {
            msg_type: msg.msg_type().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn field(msg: &FixMessage, error: FieldError) -> Self {
        Self::shape(msg, error)
    }
}

fn default_customer_or_firm() -> u8 {
    0
}

fn default_rule_80a() -> char {
    'A'
}

/// Exchange-mandated fields stamped on every order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDefaults {
    /// CustomerOrFirm (204): 0 = customer, 1 = firm
    #[serde(default = "default_customer_or_firm")]
    pub customer_or_firm: u8,

    /// Rule80A (47) order origin code
    #[serde(default = "default_rule_80a")]
    pub rule_80a: char,
}

impl Default for OrderDefaults {
    fn default() -> Self {
        Self {
            customer_or_firm: default_customer_or_firm(),
            rule_80a: default_rule_80a(),
        }
    }
}

/// Builds outbound messages and parses inbound ones
#[derive(Debug, Clone, Default)]
pub struct MessageTranslator {
    defaults: OrderDefaults,
}

impl MessageTranslator {
    pub fn new(defaults: OrderDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &OrderDefaults {
        &self.defaults
    }
}

pub(crate) fn side_code(side: Side) -> char {
    match side {
        Side::Buy => tags::side::BUY,
        Side::Sell => tags::side::SELL,
    }
}

pub(crate) fn side_from_code(code: char) -> Option<Side> {
    match code {
        tags::side::BUY => Some(Side::Buy),
        tags::side::SELL => Some(Side::Sell),
        _ => None,
    }
}
