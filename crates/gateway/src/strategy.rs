//! Strategy-facing interfaces
//!
//! A strategy receives typed events from the gateway and answers with
//! intents through the [`TradingIntents`] handle passed to every callback.
//! Callbacks are invoked synchronously, one at a time, in arrival order.

use crate::error::GatewayError;
use crate::translator::Diagnostic;
use fixgate_core::{
    Instrument, MdRequestId, OrderId, OrderIntent, Price, Quantity, RejectNotice, SessionId, Side,
};

/// Business intents a strategy can issue
pub trait TradingIntents: Send + Sync {
    /// Subscribe to best bid, best offer and last trade for one instrument
    fn subscribe_market_data(&self, instrument: &Instrument) -> Result<MdRequestId, GatewayError>;

    /// Send a day market order. The order id is durably recorded before the
    /// message is handed to the session engine.
    fn send_market_order(&self, intent: OrderIntent) -> Result<OrderId, GatewayError>;
}

/// Strategy trait - implement this to consume gateway events
pub trait Strategy: Send {
    /// Strategy name for logging
    fn name(&self) -> &str;

    /// Both sessions are logged on; called exactly once
    fn on_ready(&mut self, gateway: &dyn TradingIntents) -> Result<(), GatewayError>;

    fn on_best_bid_update(&mut self, gateway: &dyn TradingIntents, quantity: Quantity, price: Price);

    fn on_best_offer_update(
        &mut self,
        gateway: &dyn TradingIntents,
        quantity: Quantity,
        price: Price,
    );

    fn on_last_trade_update(
        &mut self,
        gateway: &dyn TradingIntents,
        quantity: Quantity,
        price: Price,
    );

    fn on_order_fill(
        &mut self,
        gateway: &dyn TradingIntents,
        side: Side,
        quantity: Quantity,
        price: Price,
    );

    fn on_order_reject(&mut self, gateway: &dyn TradingIntents, side: Side, quantity: Quantity);

    /// Order acknowledged by the exchange (optional)
    fn on_order_accepted(&mut self, _gateway: &dyn TradingIntents) {}

    /// Market data request refused (optional)
    fn on_request_reject(&mut self, _gateway: &dyn TradingIntents, _notice: &RejectNotice) {}

    /// A session logged out after the gateway was ready (optional)
    fn on_session_logout(&mut self, _session: &SessionId) {}

    /// An inbound message or entry could not be translated (optional)
    fn on_diagnostic(&mut self, _diagnostic: &Diagnostic) {}
}
