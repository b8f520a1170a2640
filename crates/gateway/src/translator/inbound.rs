//! Inbound parsers: execution reports, market data refreshes, request rejects

use super::{Diagnostic, MessageTranslator, side_from_code};
use crate::messages::tags::{self, msg_type};
use crate::messages::{FieldMap, FixMessage};
use fixgate_core::{ExecutionEvent, MarketDataEvent, MdRejectReason, RejectNotice, Side};
use log::debug;

/// Application message kinds the gateway understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundKind {
    ExecutionReport,
    SnapshotRefresh,
    IncrementalRefresh,
    RequestReject,
}

impl InboundKind {
    pub fn classify(msg: &FixMessage) -> Result<Self, Diagnostic> {
        match msg.msg_type() {
            msg_type::EXECUTION_REPORT => Ok(Self::ExecutionReport),
            msg_type::MARKET_DATA_SNAPSHOT_FULL_REFRESH => Ok(Self::SnapshotRefresh),
            msg_type::MARKET_DATA_INCREMENTAL_REFRESH => Ok(Self::IncrementalRefresh),
            msg_type::MARKET_DATA_REQUEST_REJECT => Ok(Self::RequestReject),
            _ => Err(Diagnostic::shape(msg, "unsupported message type")),
        }
    }
}

impl MessageTranslator {
    /// Classify an ExecutionReport (8) by ExecType
    pub fn parse_execution_report(&self, msg: &FixMessage) -> Result<ExecutionEvent, Diagnostic> {
        let body = msg.body();
        let exec_type = body
            .get_char(tags::EXEC_TYPE)
            .map_err(|e| Diagnostic::field(msg, e))?;

        match exec_type {
            tags::exec_type::FILL | tags::exec_type::PARTIAL_FILL => {
                let side = read_side(msg)?;
                let quantity = body
                    .get_decimal(tags::LAST_SHARES)
                    .map_err(|e| Diagnostic::field(msg, e))?;
                let price = body
                    .get_decimal(tags::LAST_PX)
                    .map_err(|e| Diagnostic::field(msg, e))?;
                Ok(ExecutionEvent::Fill {
                    side,
                    quantity,
                    price,
                })
            }
            tags::exec_type::REJECTED => {
                let side = read_side(msg)?;
                let quantity = body
                    .get_decimal(tags::ORDER_QTY)
                    .map_err(|e| Diagnostic::field(msg, e))?;
                Ok(ExecutionEvent::Reject { side, quantity })
            }
            tags::exec_type::NEW => Ok(ExecutionEvent::Accepted),
            other => Err(Diagnostic::UnknownExecutionType(other)),
        }
    }

    /// Entries of a MarketDataSnapshotFullRefresh (W)
    pub fn parse_snapshot_refresh<'a>(&self, msg: &'a FixMessage) -> Result<MdEntries<'a>, Diagnostic> {
        MdEntries::new(msg, false)
    }

    /// Entries of a MarketDataIncrementalRefresh (X). Only NEW and CHANGE
    /// actions produce events; DELETE entries are skipped.
    pub fn parse_incremental_refresh<'a>(
        &self,
        msg: &'a FixMessage,
    ) -> Result<MdEntries<'a>, Diagnostic> {
        MdEntries::new(msg, true)
    }

    /// MarketDataRequestReject (Y); every field is optional
    pub fn parse_request_reject(&self, msg: &FixMessage) -> RejectNotice {
        let body = msg.body();
        RejectNotice {
            request_id: body.get(tags::MD_REQ_ID).map(str::to_string),
            reason: body.get(tags::MD_REQ_REJ_REASON).map(reject_reason),
            text: body.get(tags::TEXT).map(str::to_string),
        }
    }
}

fn read_side(msg: &FixMessage) -> Result<Side, Diagnostic> {
    let code = msg
        .body()
        .get_char(tags::SIDE)
        .map_err(|e| Diagnostic::field(msg, e))?;
    side_from_code(code).ok_or(Diagnostic::UnknownSide(code))
}

fn reject_reason(raw: &str) -> MdRejectReason {
    use tags::md_req_rej_reason::*;
    let mut chars = raw.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(code), None) => code,
        _ => {
            debug!("Unrecognized MDReqRejReason '{}'", raw);
            return MdRejectReason::Other(raw.to_string());
        }
    };
    match code {
        UNKNOWN_SYMBOL => MdRejectReason::UnknownSymbol,
        DUPLICATE_MD_REQ_ID => MdRejectReason::DuplicateRequestId,
        INSUFFICIENT_BANDWIDTH => MdRejectReason::InsufficientBandwidth,
        INSUFFICIENT_PERMISSIONS => MdRejectReason::InsufficientPermissions,
        UNSUPPORTED_SUBSCRIPTION_REQUEST_TYPE => MdRejectReason::UnsupportedSubscriptionType,
        UNSUPPORTED_MARKET_DEPTH => MdRejectReason::UnsupportedMarketDepth,
        UNSUPPORTED_MD_UPDATE_TYPE => MdRejectReason::UnsupportedUpdateType,
        UNSUPPORTED_AGGREGATED_BOOK => MdRejectReason::UnsupportedAggregatedBook,
        UNSUPPORTED_MD_ENTRY_TYPE => MdRejectReason::UnsupportedEntryType,
        _ => MdRejectReason::Other(raw.to_string()),
    }
}

/// Lazy, single-pass walk over the NoMDEntries group of a refresh.
///
/// Yields events in entry order. Entries that cannot be translated yield a
/// [`Diagnostic`] in their place; incremental DELETE entries yield nothing.
#[derive(Debug)]
pub struct MdEntries<'a> {
    msg: &'a FixMessage,
    count: usize,
    next_index: usize,
    incremental: bool,
}

impl<'a> MdEntries<'a> {
    fn new(msg: &'a FixMessage, incremental: bool) -> Result<Self, Diagnostic> {
        let count = msg
            .body()
            .group_count(tags::NO_MD_ENTRIES)
            .map_err(|e| Diagnostic::field(msg, e))?;
        Ok(Self {
            msg,
            count,
            next_index: 1,
            incremental,
        })
    }

    fn translate(&self, entry: &FieldMap) -> Result<Option<MarketDataEvent>, Diagnostic> {
        let field = |e| Diagnostic::field(self.msg, e);

        if self.incremental {
            match entry.get_char(tags::MD_UPDATE_ACTION).map_err(field)? {
                tags::md_update_action::NEW | tags::md_update_action::CHANGE => {}
                tags::md_update_action::DELETE => {
                    debug!("Skipping DELETE entry in incremental refresh");
                    return Ok(None);
                }
                other => return Err(Diagnostic::UnknownUpdateAction(other)),
            }
        }

        let entry_type = entry.get_char(tags::MD_ENTRY_TYPE).map_err(field)?;
        if !matches!(
            entry_type,
            tags::md_entry_type::BID | tags::md_entry_type::OFFER | tags::md_entry_type::TRADE
        ) {
            return Err(Diagnostic::UnknownEntryType(entry_type));
        }

        let price = entry.get_decimal(tags::MD_ENTRY_PX).map_err(field)?;
        let quantity = entry.get_decimal(tags::MD_ENTRY_SIZE).map_err(field)?;

        Ok(Some(match entry_type {
            tags::md_entry_type::BID => MarketDataEvent::BestBidUpdate { quantity, price },
            tags::md_entry_type::OFFER => MarketDataEvent::BestOfferUpdate { quantity, price },
            _ => MarketDataEvent::LastTradeUpdate { quantity, price },
        }))
    }
}

impl Iterator for MdEntries<'_> {
    type Item = Result<MarketDataEvent, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_index <= self.count {
            let index = self.next_index;
            self.next_index += 1;

            let result = self
                .msg
                .body()
                .group(tags::NO_MD_ENTRIES, index)
                .map_err(|e| Diagnostic::field(self.msg, e))
                .and_then(|entry| self.translate(entry));

            match result {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => continue,
                Err(diagnostic) => return Some(Err(diagnostic)),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.count + 1 - self.next_index))
    }
}
