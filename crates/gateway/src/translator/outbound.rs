//! Outbound builders: market data subscription and market order

use super::{MessageTranslator, side_code};
use crate::messages::tags::{self, msg_type};
use crate::messages::{FieldMap, FixMessage};
use chrono::Utc;
use fixgate_core::{Instrument, MdRequestId, OrderId, OrderIntent};

/// UTCTimestamp with milliseconds
const TRANSACT_TIME_FORMAT: &str = "%Y%m%d-%H:%M:%S%.3f";

/// Entry types requested on every subscription: best bid, best offer, last trade
const SUBSCRIBED_ENTRY_TYPES: [char; 3] = [
    tags::md_entry_type::BID,
    tags::md_entry_type::OFFER,
    tags::md_entry_type::TRADE,
];

impl MessageTranslator {
    /// MarketDataRequest (V) for one instrument: snapshot plus incremental
    /// updates, top of book, aggregated.
    pub fn build_market_data_subscription(
        &self,
        instrument: &Instrument,
        request_id: MdRequestId,
    ) -> FixMessage {
        let mut msg = FixMessage::new(msg_type::MARKET_DATA_REQUEST);
        let body = msg.body_mut();
        body.set(tags::MD_REQ_ID, request_id)
            .set(
                tags::SUBSCRIPTION_REQUEST_TYPE,
                tags::subscription_request_type::SNAPSHOT_PLUS_UPDATES,
            )
            .set(tags::MARKET_DEPTH, 1)
            .set(
                tags::MD_UPDATE_TYPE,
                tags::md_update_type::INCREMENTAL_REFRESH,
            )
            .set(tags::AGGREGATED_BOOK, tags::YES);

        for entry_type in SUBSCRIBED_ENTRY_TYPES {
            body.add_group(
                tags::NO_MD_ENTRY_TYPES,
                FieldMap::new().with(tags::MD_ENTRY_TYPE, entry_type),
            );
        }

        body.add_group(
            tags::NO_RELATED_SYM,
            FieldMap::new()
                .with(tags::SYMBOL, instrument.symbol())
                .with(tags::MATURITY_MONTH_YEAR, instrument.maturity_month_year())
                .with(tags::SECURITY_EXCHANGE, instrument.exchange_code())
                .with(tags::SECURITY_TYPE, instrument.security_type()),
        );
        msg
    }

    /// NewOrderSingle (D): market, day, stamped with the exchange defaults
    pub fn build_market_order(&self, intent: &OrderIntent, order_id: OrderId) -> FixMessage {
        let instrument = &intent.instrument;
        let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
        msg.body_mut()
            .set(tags::CL_ORD_ID, order_id)
            .set(tags::HANDL_INST, tags::handl_inst::AUTOMATED_PRIVATE)
            .set(tags::SYMBOL, instrument.symbol())
            .set(tags::MATURITY_MONTH_YEAR, instrument.maturity_month_year())
            .set(tags::ACCOUNT, &intent.account)
            .set(tags::SIDE, side_code(intent.side))
            .set(tags::ORDER_QTY, intent.quantity)
            .set(tags::ORD_TYPE, tags::ord_type::MARKET)
            .set(tags::TIME_IN_FORCE, tags::time_in_force::DAY)
            .set(tags::SECURITY_EXCHANGE, instrument.exchange_code())
            .set(tags::SECURITY_TYPE, instrument.security_type())
            .set(tags::CUSTOMER_OR_FIRM, self.defaults.customer_or_firm)
            .set(tags::RULE_80A, self.defaults.rule_80a)
            .set(
                tags::TRANSACT_TIME,
                Utc::now().format(TRANSACT_TIME_FORMAT),
            );
        msg
    }
}
