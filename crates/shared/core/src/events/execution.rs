use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::Side;
use crate::values::{Price, Quantity};

/// Lifecycle updates for orders sent through the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionEvent {
    /// Full or partial fill; quantity and price are those of the last fill
    Fill {
        side: Side,
        quantity: Quantity,
        price: Price,
    },
    /// Order rejected; quantity is the original order quantity
    Reject { side: Side, quantity: Quantity },
    /// Acknowledged by the exchange, not yet filled
    Accepted,
}

/// Why a market data request was refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MdRejectReason {
    UnknownSymbol,
    DuplicateRequestId,
    InsufficientBandwidth,
    InsufficientPermissions,
    UnsupportedSubscriptionType,
    UnsupportedMarketDepth,
    UnsupportedUpdateType,
    UnsupportedAggregatedBook,
    UnsupportedEntryType,
    /// Code not known to this gateway, kept as received
    Other(String),
}

impl fmt::Display for MdRejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSymbol => f.write_str("unknown symbol"),
            Self::DuplicateRequestId => f.write_str("duplicate request id"),
            Self::InsufficientBandwidth => f.write_str("insufficient bandwidth"),
            Self::InsufficientPermissions => f.write_str("insufficient permissions"),
            Self::UnsupportedSubscriptionType => f.write_str("unsupported subscription type"),
            Self::UnsupportedMarketDepth => f.write_str("unsupported market depth"),
            Self::UnsupportedUpdateType => f.write_str("unsupported update type"),
            Self::UnsupportedAggregatedBook => f.write_str("unsupported aggregated book"),
            Self::UnsupportedEntryType => f.write_str("unsupported entry type"),
            Self::Other(code) => write!(f, "code {}", code),
        }
    }
}

/// Refusal of a market data request. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectNotice {
    pub request_id: Option<String>,
    pub reason: Option<MdRejectReason>,
    pub text: Option<String>,
}

impl fmt::Display for RejectNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MDReqID={}, reason={}, text={}",
            self.request_id.as_deref().unwrap_or("-"),
            self.reason
                .as_ref()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.text.as_deref().unwrap_or("-"),
        )
    }
}
