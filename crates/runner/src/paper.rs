//! In-process paper exchange
//!
//! A [`SessionEngine`] that needs no counterparty: every configured session
//! logs on as soon as the engine starts, market data requests are answered
//! with a snapshot of fixed quotes and market orders fill in full at the
//! touch. Logons and replies are delivered in order on one worker thread.

use crate::config::PaperConfig;
use crossbeam_channel::{Receiver, Sender, unbounded};
use fixgate_core::{Price, Quantity, SessionId};
use fixgate_gateway::messages::FieldError;
use fixgate_gateway::{
    FieldMap, FixMessage, OutboundDecision, SessionApplication, SessionEngine, SessionSettings,
    TransportError, tags,
};
use log::{debug, info, warn};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

const HEARTBEAT_SECS: u32 = 30;

/// Work item for the delivery thread
enum Delivery {
    Logon(SessionId),
    App(SessionId, FixMessage),
    Shutdown,
}

struct Running {
    app: Arc<dyn SessionApplication>,
    tx: Sender<Delivery>,
    worker: JoinHandle<()>,
}

pub struct PaperExchange {
    sessions: BTreeMap<SessionId, SessionSettings>,
    quotes: PaperConfig,
    running: Mutex<Option<Running>>,
    logged_on: Arc<Mutex<HashSet<SessionId>>>,
    next_exec_id: AtomicU64,
}

impl PaperExchange {
    pub fn new(sessions: Vec<(SessionId, SessionSettings)>, quotes: PaperConfig) -> Self {
        Self {
            sessions: sessions.into_iter().collect(),
            quotes,
            running: Mutex::new(None),
            logged_on: Arc::new(Mutex::new(HashSet::new())),
            next_exec_id: AtomicU64::new(1),
        }
    }

    fn connection(&self) -> Result<(Arc<dyn SessionApplication>, Sender<Delivery>), TransportError> {
        let running = self.running.lock();
        let running = running.as_ref().ok_or(TransportError::NotStarted)?;
        Ok((running.app.clone(), running.tx.clone()))
    }

    fn queue(tx: &Sender<Delivery>, delivery: Delivery) -> Result<(), TransportError> {
        tx.send(delivery)
            .map_err(|_| TransportError::Send("delivery thread stopped".to_string()))
    }

    fn exec_id(&self) -> u64 {
        self.next_exec_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Snapshot reply to a MarketDataRequest (V)
    fn answer_market_data_request(&self, request: &FixMessage) -> FixMessage {
        let body = request.body();
        let request_id = body.get(tags::MD_REQ_ID).unwrap_or_default();
        let symbol = body
            .group(tags::NO_RELATED_SYM, 1)
            .ok()
            .and_then(|instrument| instrument.get(tags::SYMBOL));

        let Some(symbol) = symbol else {
            let mut reject = FixMessage::new(tags::msg_type::MARKET_DATA_REQUEST_REJECT);
            reject
                .body_mut()
                .set(tags::MD_REQ_ID, request_id)
                .set(tags::MD_REQ_REJ_REASON, tags::md_req_rej_reason::UNKNOWN_SYMBOL)
                .set(tags::TEXT, "no instrument in request");
            return reject;
        };

        let quotes = &self.quotes;
        let mut snapshot = FixMessage::new(tags::msg_type::MARKET_DATA_SNAPSHOT_FULL_REFRESH);
        snapshot
            .body_mut()
            .set(tags::MD_REQ_ID, request_id)
            .set(tags::SYMBOL, symbol)
            .add_group(tags::NO_MD_ENTRIES, md_entry(tags::md_entry_type::BID, quotes.bid, quotes.size))
            .add_group(
                tags::NO_MD_ENTRIES,
                md_entry(tags::md_entry_type::OFFER, quotes.offer, quotes.size),
            )
            .add_group(
                tags::NO_MD_ENTRIES,
                md_entry(tags::md_entry_type::TRADE, quotes.last_trade, quotes.size),
            );
        snapshot
    }

    /// Execution reports for a NewOrderSingle (D): NEW then FILL, or REJECTED
    fn answer_order(&self, order: &FixMessage) -> Vec<FixMessage> {
        match self.parse_order(order) {
            Ok((side, quantity)) => {
                let price = if side == tags::side::BUY {
                    self.quotes.offer
                } else {
                    self.quotes.bid
                };
                let order_id = self.exec_id();
                let ack = self
                    .execution_report(order, order_id, tags::exec_type::NEW, tags::ord_status::NEW)
                    .with_fills(Decimal::ZERO, quantity, Decimal::ZERO);
                let mut fill = self
                    .execution_report(order, order_id, tags::exec_type::FILL, tags::ord_status::FILLED)
                    .with_fills(quantity, Decimal::ZERO, price);
                fill.body_mut()
                    .set(tags::LAST_SHARES, quantity)
                    .set(tags::LAST_PX, price);
                vec![ack, fill]
            }
            Err(reason) => {
                warn!("Paper exchange rejecting order: {}", reason);
                let mut reject = self.execution_report(
                    order,
                    self.exec_id(),
                    tags::exec_type::REJECTED,
                    tags::ord_status::REJECTED,
                );
                reject.body_mut().set(tags::TEXT, reason);
                vec![reject]
            }
        }
    }

    fn parse_order(&self, order: &FixMessage) -> Result<(char, Quantity), String> {
        let body = order.body();
        let side = body.get_char(tags::SIDE).map_err(|e: FieldError| e.to_string())?;
        let quantity = body
            .get_decimal(tags::ORDER_QTY)
            .map_err(|e: FieldError| e.to_string())?;
        if quantity <= Decimal::ZERO {
            return Err(format!("invalid quantity {}", quantity));
        }
        if side != tags::side::BUY && side != tags::side::SELL {
            return Err(format!("unsupported side {}", side));
        }
        Ok((side, quantity))
    }

    fn execution_report(&self, order: &FixMessage, order_id: u64, exec_type: char, status: char) -> FixMessage {
        let body = order.body();
        let mut report = FixMessage::new(tags::msg_type::EXECUTION_REPORT);
        let out = report.body_mut();
        out.set(tags::ORDER_ID, format!("PX{}", order_id))
            .set(tags::EXEC_ID, self.exec_id())
            .set(tags::EXEC_TRANS_TYPE, tags::exec_trans_type::NEW)
            .set(tags::EXEC_TYPE, exec_type)
            .set(tags::ORD_STATUS, status);
        for tag in [tags::CL_ORD_ID, tags::SYMBOL, tags::SIDE, tags::ORDER_QTY] {
            if let Some(value) = body.get(tag) {
                out.set(tag, value);
            }
        }
        report
    }
}

trait FillFields {
    fn with_fills(self, cum_qty: Quantity, leaves_qty: Quantity, avg_px: Price) -> Self;
}

impl FillFields for FixMessage {
    fn with_fills(mut self, cum_qty: Quantity, leaves_qty: Quantity, avg_px: Price) -> Self {
        self.body_mut()
            .set(tags::CUM_QTY, cum_qty)
            .set(tags::LEAVES_QTY, leaves_qty)
            .set(tags::AVG_PX, avg_px);
        self
    }
}

fn md_entry(entry_type: char, price: Price, size: Quantity) -> FieldMap {
    FieldMap::new()
        .with(tags::MD_ENTRY_TYPE, entry_type)
        .with(tags::MD_ENTRY_PX, price)
        .with(tags::MD_ENTRY_SIZE, size)
}

/// Delivery loop: logons, then inbound application messages in queue order
fn deliver(
    app: Arc<dyn SessionApplication>,
    rx: Receiver<Delivery>,
    logged_on: Arc<Mutex<HashSet<SessionId>>>,
) {
    while let Ok(delivery) = rx.recv() {
        match delivery {
            Delivery::Logon(session) => {
                let mut logon = FixMessage::new(tags::msg_type::LOGON);
                logon
                    .body_mut()
                    .set(tags::ENCRYPT_METHOD, 0)
                    .set(tags::HEART_BT_INT, HEARTBEAT_SECS);
                app.to_admin(&mut logon, &session);
                debug!("Paper logon {}: {}", session, logon);

                logged_on.lock().insert(session.clone());
                app.on_logon(&session);
            }
            Delivery::App(session, msg) => app.from_app(&msg, &session),
            Delivery::Shutdown => break,
        }
    }

    let sessions: Vec<SessionId> = logged_on.lock().drain().collect();
    for session in sessions {
        app.on_logout(&session);
    }
}

impl SessionEngine for PaperExchange {
    fn start(&self, app: Arc<dyn SessionApplication>) -> Result<(), TransportError> {
        let mut running = self.running.lock();
        if running.is_some() {
            return Err(TransportError::Start("paper exchange already started".to_string()));
        }

        for session in self.sessions.keys() {
            app.on_create(session);
        }

        let (tx, rx) = unbounded();
        for session in self.sessions.keys() {
            Self::queue(&tx, Delivery::Logon(session.clone()))?;
        }

        let worker_app = app.clone();
        let logged_on = self.logged_on.clone();
        let worker = std::thread::Builder::new()
            .name("paper-exchange".to_string())
            .spawn(move || deliver(worker_app, rx, logged_on))
            .map_err(|e| TransportError::Start(e.to_string()))?;

        info!("Paper exchange started with {} sessions", self.sessions.len());
        *running = Some(Running { app, tx, worker });
        Ok(())
    }

    fn stop(&self) {
        let Some(running) = self.running.lock().take() else {
            return;
        };

        let _ = running.tx.send(Delivery::Shutdown);
        if running.worker.thread().id() == std::thread::current().id() {
            return;
        }
        if running.worker.join().is_err() {
            warn!("Paper exchange delivery thread panicked");
        }
        info!("Paper exchange stopped");
    }

    fn send_to_session(&self, mut msg: FixMessage, session: &SessionId) -> Result<(), TransportError> {
        if !self.sessions.contains_key(session) {
            return Err(TransportError::UnknownSession(session.clone()));
        }
        let (app, tx) = self.connection()?;
        if !self.is_logged_on(session) {
            return Err(TransportError::NotLoggedOn(session.clone()));
        }

        if app.to_app(&mut msg, session) == OutboundDecision::Suppress {
            return Err(TransportError::Suppressed(session.clone()));
        }

        let replies = match msg.msg_type() {
            tags::msg_type::MARKET_DATA_REQUEST => vec![self.answer_market_data_request(&msg)],
            tags::msg_type::NEW_ORDER_SINGLE => self.answer_order(&msg),
            other => {
                debug!("Paper exchange ignoring MsgType={}", other);
                Vec::new()
            }
        };
        for reply in replies {
            Self::queue(&tx, Delivery::App(session.clone(), reply))?;
        }
        Ok(())
    }

    fn session_settings(&self, session: &SessionId) -> Option<SessionSettings> {
        self.sessions.get(session).cloned()
    }

    fn is_logged_on(&self, session: &SessionId) -> bool {
        self.logged_on.lock().contains(session)
    }

    fn sessions(&self) -> Vec<SessionId> {
        self.sessions.keys().cloned().collect()
    }
}
