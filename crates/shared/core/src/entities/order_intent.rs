use serde::{Deserialize, Serialize};

use super::{Instrument, Side};
use crate::values::Quantity;

/// A strategy's request to trade at market.
///
/// Consumed once by the translator; the gateway keeps no order state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub instrument: Instrument,
    pub account: String,
    pub side: Side,
    pub quantity: Quantity,
}

impl OrderIntent {
    pub fn new(
        instrument: Instrument,
        account: impl Into<String>,
        side: Side,
        quantity: Quantity,
    ) -> Self {
        Self {
            instrument,
            account: account.into(),
            side,
            quantity,
        }
    }

    pub fn buy(instrument: Instrument, account: impl Into<String>, quantity: Quantity) -> Self {
        Self::new(instrument, account, Side::Buy, quantity)
    }

    pub fn sell(instrument: Instrument, account: impl Into<String>, quantity: Quantity) -> Self {
        Self::new(instrument, account, Side::Sell, quantity)
    }
}
