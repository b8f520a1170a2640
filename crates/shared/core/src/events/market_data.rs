use serde::{Deserialize, Serialize};

use crate::values::{Price, Quantity};

/// Top-of-book and ticker updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketDataEvent {
    BestBidUpdate { quantity: Quantity, price: Price },
    BestOfferUpdate { quantity: Quantity, price: Price },
    LastTradeUpdate { quantity: Quantity, price: Price },
}

impl MarketDataEvent {
    pub fn quantity(&self) -> Quantity {
        match self {
            Self::BestBidUpdate { quantity, .. }
            | Self::BestOfferUpdate { quantity, .. }
            | Self::LastTradeUpdate { quantity, .. } => *quantity,
        }
    }

    pub fn price(&self) -> Price {
        match self {
            Self::BestBidUpdate { price, .. }
            | Self::BestOfferUpdate { price, .. }
            | Self::LastTradeUpdate { price, .. } => *price,
        }
    }

    /// Short label used in logs and journals
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BestBidUpdate { .. } => "BID",
            Self::BestOfferUpdate { .. } => "OFFER",
            Self::LastTradeUpdate { .. } => "LAST_TRADE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_accessors() {
        let event = MarketDataEvent::BestOfferUpdate {
            quantity: dec!(5),
            price: dec!(99.75),
        };
        assert_eq!(event.quantity(), dec!(5));
        assert_eq!(event.price(), dec!(99.75));
        assert_eq!(event.kind(), "OFFER");
    }
}
