//! Integration tests: Strategy <-> Gateway <-> scripted session engine
//!
//! The scripted engine stands in for a FIX session engine: it logs sessions
//! on when started (or later, on demand), runs every outbound message
//! through the application hooks and records what would have been sent.

use fixgate_core::{
    Instrument, OrderIntent, Price, Quantity, RejectNotice, SessionId, SessionRole, Side,
};
use fixgate_gateway::{
    Diagnostic, FieldMap, FixMessage, Gateway, GatewayConfig, GatewayError, GatewayState,
    IdGenerator, MemoryIdStore, OrderIdStore, OutboundDecision, PersistenceError,
    SessionApplication, SessionEngine, SessionSettings, Strategy, TradingIntents, TransportError,
    tags,
};
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

// =========================================================================
// Scripted session engine
// =========================================================================

#[derive(Default)]
struct ScriptedEngine {
    settings: HashMap<SessionId, SessionSettings>,
    /// Sessions that complete logon as soon as the engine starts
    auto_logon: Vec<SessionId>,
    app: Mutex<Option<Arc<dyn SessionApplication>>>,
    logged_on: Mutex<HashSet<SessionId>>,
    admin_sent: Mutex<Vec<(SessionId, FixMessage)>>,
    app_sent: Mutex<Vec<(SessionId, FixMessage)>>,
    /// Mark outbound application messages as possible duplicates
    resend_mode: AtomicBool,
    /// `stop` only records the request; logout happens later, off-thread
    deferred_stop: AtomicBool,
    /// Sessions with settings that the engine does not list as configured
    unlisted: HashSet<SessionId>,
    started: AtomicBool,
    stopped: AtomicBool,
}

impl ScriptedEngine {
    fn new(sessions: Vec<(SessionId, SessionSettings)>) -> Self {
        let auto_logon = sessions.iter().map(|(id, _)| id.clone()).collect();
        Self {
            settings: sessions.into_iter().collect(),
            auto_logon,
            ..Default::default()
        }
    }

    fn with_auto_logon(mut self, sessions: Vec<SessionId>) -> Self {
        self.auto_logon = sessions;
        self
    }

    fn with_unlisted(mut self, session: SessionId, settings: SessionSettings) -> Self {
        self.settings.insert(session.clone(), settings);
        self.unlisted.insert(session);
        self
    }

    fn with_deferred_stop(self) -> Self {
        self.deferred_stop.store(true, Ordering::SeqCst);
        self
    }

    fn app(&self) -> Arc<dyn SessionApplication> {
        self.app.lock().clone().expect("engine not started")
    }

    fn log_on(&self, session: &SessionId) {
        let app = self.app();
        let mut logon = FixMessage::new(tags::msg_type::LOGON);
        app.to_admin(&mut logon, session);
        self.admin_sent.lock().push((session.clone(), logon));
        self.logged_on.lock().insert(session.clone());
        app.on_logon(session);
    }

    fn log_off(&self, session: &SessionId) {
        self.logged_on.lock().remove(session);
        self.app().on_logout(session);
    }

    fn deliver(&self, msg: FixMessage, session: &SessionId) {
        self.app().from_app(&msg, session);
    }

    fn app_sent(&self) -> Vec<(SessionId, FixMessage)> {
        self.app_sent.lock().clone()
    }

    fn admin_sent(&self) -> Vec<(SessionId, FixMessage)> {
        self.admin_sent.lock().clone()
    }
}

impl SessionEngine for ScriptedEngine {
    fn start(&self, app: Arc<dyn SessionApplication>) -> Result<(), TransportError> {
        self.started.store(true, Ordering::SeqCst);
        for session in self.settings.keys() {
            app.on_create(session);
        }
        *self.app.lock() = Some(app);
        for session in self.auto_logon.clone() {
            self.log_on(&session);
        }
        Ok(())
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        if self.deferred_stop.load(Ordering::SeqCst) {
            return;
        }
        let app = self.app.lock().take();
        let sessions: Vec<SessionId> = self.logged_on.lock().drain().collect();
        if let Some(app) = app {
            for session in sessions {
                app.on_logout(&session);
            }
        }
    }

    fn send_to_session(&self, mut msg: FixMessage, session: &SessionId) -> Result<(), TransportError> {
        if !self.logged_on.lock().contains(session) {
            return Err(TransportError::NotLoggedOn(session.clone()));
        }
        if self.resend_mode.load(Ordering::SeqCst) {
            msg.header_mut().set(tags::POSS_DUP_FLAG, tags::YES);
        }
        match self.app().to_app(&mut msg, session) {
            OutboundDecision::Send => {
                self.app_sent.lock().push((session.clone(), msg));
                Ok(())
            }
            OutboundDecision::Suppress => Err(TransportError::Suppressed(session.clone())),
        }
    }

    fn session_settings(&self, session: &SessionId) -> Option<SessionSettings> {
        self.settings.get(session).cloned()
    }

    fn is_logged_on(&self, session: &SessionId) -> bool {
        self.logged_on.lock().contains(session)
    }

    fn sessions(&self) -> Vec<SessionId> {
        let mut sessions: Vec<SessionId> = self
            .settings
            .keys()
            .filter(|session| !self.unlisted.contains(session))
            .cloned()
            .collect();
        sessions.sort();
        sessions
    }
}

// =========================================================================
// Recording strategy
// =========================================================================

#[derive(Default)]
struct Plan {
    subscribe: Option<Instrument>,
    order: Option<OrderIntent>,
    fail_on_ready: bool,
    /// Runs inside on_ready, before it is recorded
    on_ready_hook: Option<Box<dyn FnOnce() + Send>>,
}

struct RecordingStrategy {
    plan: Plan,
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingStrategy {
    fn new(plan: Plan) -> (Box<Self>, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let strategy = Box::new(Self {
            plan,
            events: events.clone(),
        });
        (strategy, events)
    }

    fn record(&self, event: String) {
        self.events.lock().push(event);
    }
}

impl Strategy for RecordingStrategy {
    fn name(&self) -> &str {
        "recording"
    }

    fn on_ready(&mut self, gateway: &dyn TradingIntents) -> Result<(), GatewayError> {
        if let Some(hook) = self.plan.on_ready_hook.take() {
            hook();
        }
        self.record("ready".to_string());
        if self.plan.fail_on_ready {
            return Err(GatewayError::Configuration("refusing to trade".to_string()));
        }
        if let Some(instrument) = &self.plan.subscribe {
            gateway.subscribe_market_data(instrument)?;
        }
        if let Some(intent) = self.plan.order.clone() {
            gateway.send_market_order(intent)?;
        }
        Ok(())
    }

    fn on_best_bid_update(&mut self, _: &dyn TradingIntents, quantity: Quantity, price: Price) {
        self.record(format!("bid {}@{}", quantity, price));
    }

    fn on_best_offer_update(&mut self, _: &dyn TradingIntents, quantity: Quantity, price: Price) {
        self.record(format!("offer {}@{}", quantity, price));
    }

    fn on_last_trade_update(&mut self, _: &dyn TradingIntents, quantity: Quantity, price: Price) {
        self.record(format!("trade {}@{}", quantity, price));
    }

    fn on_order_fill(&mut self, _: &dyn TradingIntents, side: Side, quantity: Quantity, price: Price) {
        self.record(format!("fill {} {}@{}", side, quantity, price));
    }

    fn on_order_reject(&mut self, _: &dyn TradingIntents, side: Side, quantity: Quantity) {
        self.record(format!("reject {} {}", side, quantity));
    }

    fn on_order_accepted(&mut self, _: &dyn TradingIntents) {
        self.record("accepted".to_string());
    }

    fn on_request_reject(&mut self, _: &dyn TradingIntents, notice: &RejectNotice) {
        self.record(format!("request reject {}", notice));
    }

    fn on_session_logout(&mut self, session: &SessionId) {
        self.record(format!("logout {}", session));
    }

    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.record(format!("diagnostic {}", diagnostic));
    }
}

// =========================================================================
// Fixtures
// =========================================================================

fn md_session() -> SessionId {
    SessionId::fix42("CLIENT_MD", "CME")
}

fn oe_session() -> SessionId {
    SessionId::fix42("CLIENT_OE", "CME")
}

fn split_sessions() -> Vec<(SessionId, SessionSettings)> {
    vec![
        (md_session(), SessionSettings::market_data()),
        (oe_session(), SessionSettings::order_entry().with_password("s3cret")),
    ]
}

fn es() -> Instrument {
    Instrument::future("ES", "202612", "CME")
}

fn gateway_with(
    engine: Arc<ScriptedEngine>,
    ids: IdGenerator,
    strategy: Box<dyn Strategy>,
) -> Gateway {
    Gateway::new(engine, Arc::new(ids), strategy, GatewayConfig::default())
}

fn memory_ids() -> IdGenerator {
    IdGenerator::open(MemoryIdStore::new()).unwrap()
}

fn events(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().clone()
}

// =========================================================================
// Startup and readiness
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_start_reaches_ready_and_runs_strategy_once() {
    let _ = env_logger::try_init();

    let engine = Arc::new(ScriptedEngine::new(split_sessions()));
    let (strategy, log) = RecordingStrategy::new(Plan {
        subscribe: Some(es()),
        order: Some(OrderIntent::buy(es(), "ACC1", dec!(1))),
        ..Default::default()
    });
    let gateway = gateway_with(engine.clone(), memory_ids(), strategy);

    assert_eq!(gateway.state(), GatewayState::Disconnected);
    gateway.start().await.unwrap();

    assert_eq!(gateway.state(), GatewayState::Ready);
    assert_eq!(events(&log), vec!["ready"]);
    assert_eq!(gateway.session_for(SessionRole::MarketData), Some(md_session()));
    assert_eq!(gateway.session_for(SessionRole::OrderEntry), Some(oe_session()));

    let sent = engine.app_sent();
    assert_eq!(sent.len(), 2);

    let (session, subscription) = &sent[0];
    assert_eq!(session, &md_session());
    assert_eq!(subscription.msg_type(), tags::msg_type::MARKET_DATA_REQUEST);
    assert_eq!(subscription.body().get(tags::MD_REQ_ID), Some("1"));

    let (session, order) = &sent[1];
    assert_eq!(session, &oe_session());
    assert_eq!(order.msg_type(), tags::msg_type::NEW_ORDER_SINGLE);
    assert_eq!(order.body().get(tags::CL_ORD_ID), Some("1"));
}

#[tokio::test(start_paused = true)]
async fn test_start_times_out_when_order_session_never_logs_on() {
    let _ = env_logger::try_init();

    let engine = Arc::new(ScriptedEngine::new(split_sessions()).with_auto_logon(vec![md_session()]));
    let (strategy, log) = RecordingStrategy::new(Plan::default());
    let gateway = gateway_with(engine.clone(), memory_ids(), strategy);

    let started = tokio::time::Instant::now();
    let result = gateway.start().await;

    match result {
        Err(GatewayError::SessionTimeout { attempts, pending }) => {
            assert_eq!(attempts, 10);
            assert!(pending.contains("order-entry"), "pending: {}", pending);
        }
        other => panic!("expected timeout, got {:?}", other),
    }

    // Ten checks, nine pauses in between
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(9), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(10), "elapsed {:?}", elapsed);

    assert_eq!(gateway.state(), GatewayState::Closed);
    assert!(engine.stopped.load(Ordering::SeqCst));
    assert!(events(&log).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_start_waits_for_late_logon() {
    let engine = Arc::new(ScriptedEngine::new(split_sessions()).with_auto_logon(vec![md_session()]));
    let (strategy, log) = RecordingStrategy::new(Plan::default());
    let gateway = gateway_with(engine.clone(), memory_ids(), strategy);

    let late = engine.clone();
    let logon = async move {
        tokio::time::sleep(Duration::from_millis(2500)).await;
        late.log_on(&oe_session());
    };

    let (result, ()) = tokio::join!(gateway.start(), logon);
    result.unwrap();

    assert_eq!(gateway.state(), GatewayState::Ready);
    assert_eq!(events(&log), vec!["ready"]);
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_wait_is_terminal() {
    let engine = Arc::new(
        ScriptedEngine::new(split_sessions())
            .with_auto_logon(vec![md_session()])
            .with_deferred_stop(),
    );
    let (strategy, log) = RecordingStrategy::new(Plan::default());
    let gateway = gateway_with(engine.clone(), memory_ids(), strategy);

    let late = engine.clone();
    let interrupt = async {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        gateway.stop();
        // The engine is still winding down and completes a logon anyway
        late.log_on(&oe_session());
    };

    let (result, ()) = tokio::join!(gateway.start(), interrupt);

    assert!(matches!(
        result,
        Err(GatewayError::InvalidState {
            operation: "start",
            state: GatewayState::Closed
        })
    ));
    assert_eq!(gateway.state(), GatewayState::Closed);
    assert!(engine.stopped.load(Ordering::SeqCst));
    assert!(events(&log).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_role_conflict_during_wait_fails_startup() {
    // A session the engine never listed logs on claiming the market data role
    let rogue = SessionId::fix42("ROGUE_MD", "CME");
    let engine = Arc::new(
        ScriptedEngine::new(split_sessions())
            .with_unlisted(rogue.clone(), SessionSettings::market_data())
            .with_auto_logon(vec![md_session(), rogue]),
    );
    let (strategy, log) = RecordingStrategy::new(Plan::default());
    let gateway = gateway_with(engine.clone(), memory_ids(), strategy);

    let result = gateway.start().await;

    match result {
        Err(GatewayError::Configuration(reason)) => {
            assert!(reason.contains("ROGUE_MD"), "reason: {}", reason)
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
    assert_eq!(gateway.state(), GatewayState::Closed);
    assert!(engine.stopped.load(Ordering::SeqCst));
    assert_eq!(gateway.session_for(SessionRole::MarketData), Some(md_session()));
    assert!(events(&log).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_no_callback_overtakes_on_ready() {
    let engine = Arc::new(ScriptedEngine::new(split_sessions()));
    let logout_thread = Arc::new(Mutex::new(None));

    let remote = engine.clone();
    let handle_slot = logout_thread.clone();
    let (strategy, log) = RecordingStrategy::new(Plan {
        on_ready_hook: Some(Box::new(move || {
            // An engine thread logs a session out while on_ready is running
            let handle = std::thread::spawn(move || remote.log_off(&md_session()));
            *handle_slot.lock() = Some(handle);
            std::thread::sleep(Duration::from_millis(50));
        })),
        ..Default::default()
    });
    let gateway = gateway_with(engine, memory_ids(), strategy);

    gateway.start().await.unwrap();
    let handle = logout_thread.lock().take().unwrap();
    handle.join().unwrap();

    assert_eq!(events(&log), vec!["ready", "logout FIX.4.2:CLIENT_MD->CME"]);
    assert_eq!(gateway.state(), GatewayState::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_colocated_session_carries_both_roles() {
    let session = SessionId::fix42("CLIENT", "CME");
    let engine = Arc::new(ScriptedEngine::new(vec![(
        session.clone(),
        SessionSettings::colocated(),
    )]));
    let (strategy, _log) = RecordingStrategy::new(Plan::default());
    let gateway = gateway_with(engine, memory_ids(), strategy);

    gateway.start().await.unwrap();

    assert_eq!(gateway.session_for(SessionRole::MarketData), Some(session.clone()));
    assert_eq!(gateway.session_for(SessionRole::OrderEntry), Some(session));
}

#[tokio::test(start_paused = true)]
async fn test_doubly_declared_role_fails_before_engine_start() {
    let engine = Arc::new(ScriptedEngine::new(vec![
        (md_session(), SessionSettings::market_data()),
        (oe_session(), SessionSettings::colocated()),
    ]));
    let (strategy, _log) = RecordingStrategy::new(Plan::default());
    let gateway = gateway_with(engine.clone(), memory_ids(), strategy);

    let result = gateway.start().await;

    assert!(matches!(result, Err(GatewayError::Configuration(_))));
    assert!(!engine.started.load(Ordering::SeqCst));
    assert_eq!(gateway.state(), GatewayState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_strategy_failure_aborts_startup() {
    let engine = Arc::new(ScriptedEngine::new(split_sessions()));
    let (strategy, _log) = RecordingStrategy::new(Plan {
        fail_on_ready: true,
        ..Default::default()
    });
    let gateway = gateway_with(engine.clone(), memory_ids(), strategy);

    assert!(gateway.start().await.is_err());
    assert_eq!(gateway.state(), GatewayState::Closed);
    assert!(engine.stopped.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_start_twice_is_rejected() {
    let engine = Arc::new(ScriptedEngine::new(split_sessions()));
    let (strategy, log) = RecordingStrategy::new(Plan::default());
    let gateway = gateway_with(engine, memory_ids(), strategy);

    gateway.start().await.unwrap();
    let second = gateway.start().await;

    assert!(matches!(
        second,
        Err(GatewayError::InvalidState {
            operation: "start",
            state: GatewayState::Ready
        })
    ));
    assert_eq!(events(&log), vec!["ready"]);
}

// =========================================================================
// Outbound
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_logon_carries_configured_password() {
    let engine = Arc::new(ScriptedEngine::new(split_sessions()));
    let (strategy, _log) = RecordingStrategy::new(Plan::default());
    let gateway = gateway_with(engine.clone(), memory_ids(), strategy);

    gateway.start().await.unwrap();

    let admin = engine.admin_sent();
    let (_, oe_logon) = admin.iter().find(|(s, _)| s == &oe_session()).unwrap();
    assert_eq!(oe_logon.body().get(tags::RAW_DATA), Some("s3cret"));
    assert_eq!(oe_logon.body().get(tags::RAW_DATA_LENGTH), Some("6"));

    // No password configured: logon goes out untouched
    let (_, md_logon) = admin.iter().find(|(s, _)| s == &md_session()).unwrap();
    assert!(!md_logon.body().has(tags::RAW_DATA));
}

#[tokio::test(start_paused = true)]
async fn test_possible_duplicate_order_is_suppressed() {
    let engine = Arc::new(ScriptedEngine::new(split_sessions()));
    let (strategy, _log) = RecordingStrategy::new(Plan::default());
    let ids = Arc::new(memory_ids());
    let gateway = Gateway::new(engine.clone(), ids.clone(), strategy, GatewayConfig::default());
    gateway.start().await.unwrap();

    engine.resend_mode.store(true, Ordering::SeqCst);
    let result = gateway.send_market_order(OrderIntent::sell(es(), "ACC1", dec!(2)));

    assert!(matches!(
        result,
        Err(GatewayError::Transport(TransportError::Suppressed(_)))
    ));
    assert!(engine.app_sent().is_empty());
    // The id was durably consumed before the send was attempted
    assert_eq!(ids.current_order_id().value(), 1);

    engine.resend_mode.store(false, Ordering::SeqCst);
    let order_id = gateway
        .send_market_order(OrderIntent::sell(es(), "ACC1", dec!(2)))
        .unwrap();
    assert_eq!(order_id.value(), 2);
    assert_eq!(engine.app_sent().len(), 1);
}

struct FailingStore;

impl OrderIdStore for FailingStore {
    fn load(&self) -> Result<Option<u64>, PersistenceError> {
        Ok(Some(41))
    }

    fn save(&self, _last_order_id: u64) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable("disk full".to_string()))
    }
}

#[tokio::test(start_paused = true)]
async fn test_order_not_sent_when_id_cannot_be_persisted() {
    let engine = Arc::new(ScriptedEngine::new(split_sessions()));
    let (strategy, _log) = RecordingStrategy::new(Plan::default());
    let gateway = gateway_with(engine.clone(), IdGenerator::open(FailingStore).unwrap(), strategy);
    gateway.start().await.unwrap();

    let result = gateway.send_market_order(OrderIntent::buy(es(), "ACC1", dec!(1)));

    assert!(matches!(result, Err(GatewayError::Persistence(_))));
    assert!(engine.app_sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_intent_before_binding_reports_unbound_role() {
    let engine = Arc::new(ScriptedEngine::new(split_sessions()));
    let (strategy, _log) = RecordingStrategy::new(Plan::default());
    let gateway = gateway_with(engine, memory_ids(), strategy);

    let result = gateway.subscribe_market_data(&es());

    assert!(matches!(
        result,
        Err(GatewayError::RoleUnbound(SessionRole::MarketData))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_order_ids_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ids").join("last_order_id.json");

    for expected in [1u64, 2] {
        let engine = Arc::new(ScriptedEngine::new(split_sessions()));
        let (strategy, _log) = RecordingStrategy::new(Plan {
            order: Some(OrderIntent::buy(es(), "ACC1", dec!(1))),
            ..Default::default()
        });
        let ids = IdGenerator::open(fixgate_gateway::FileIdStore::new(&path)).unwrap();
        let gateway = gateway_with(engine.clone(), ids, strategy);
        gateway.start().await.unwrap();

        let sent = engine.app_sent();
        let cl_ord_id = expected.to_string();
        assert_eq!(sent[0].1.body().get(tags::CL_ORD_ID), Some(cl_ord_id.as_str()));
    }
}

// =========================================================================
// Inbound
// =========================================================================

fn md_entry(entry_type: char, px: &str, size: &str) -> FieldMap {
    FieldMap::new()
        .with(tags::MD_ENTRY_TYPE, entry_type)
        .with(tags::MD_ENTRY_PX, px)
        .with(tags::MD_ENTRY_SIZE, size)
}

fn execution_report(exec_type: char, side: char) -> FixMessage {
    let mut msg = FixMessage::new(tags::msg_type::EXECUTION_REPORT);
    msg.body_mut()
        .set(tags::CL_ORD_ID, 1)
        .set(tags::EXEC_TYPE, exec_type)
        .set(tags::SIDE, side)
        .set(tags::ORDER_QTY, "3")
        .set(tags::LAST_SHARES, "3")
        .set(tags::LAST_PX, "5012.75");
    msg
}

async fn ready_gateway() -> (Gateway, Arc<ScriptedEngine>, Arc<Mutex<Vec<String>>>) {
    let engine = Arc::new(ScriptedEngine::new(split_sessions()));
    let (strategy, log) = RecordingStrategy::new(Plan::default());
    let gateway = gateway_with(engine.clone(), memory_ids(), strategy);
    gateway.start().await.unwrap();
    log.lock().clear();
    (gateway, engine, log)
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_entries_dispatch_in_order() {
    let (_gateway, engine, log) = ready_gateway().await;

    let mut snapshot = FixMessage::new(tags::msg_type::MARKET_DATA_SNAPSHOT_FULL_REFRESH);
    snapshot
        .body_mut()
        .set(tags::MD_REQ_ID, 1)
        .add_group(tags::NO_MD_ENTRIES, md_entry(tags::md_entry_type::BID, "5012.25", "10"))
        .add_group(tags::NO_MD_ENTRIES, md_entry(tags::md_entry_type::OFFER, "5012.50", "7"))
        .add_group(tags::NO_MD_ENTRIES, md_entry(tags::md_entry_type::TRADE, "5012.50", "2"));
    engine.deliver(snapshot, &md_session());

    assert_eq!(
        events(&log),
        vec!["bid 10@5012.25", "offer 7@5012.50", "trade 2@5012.50"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_incremental_refresh_skips_deletes_and_reports_bad_entries() {
    let (_gateway, engine, log) = ready_gateway().await;

    let mut refresh = FixMessage::new(tags::msg_type::MARKET_DATA_INCREMENTAL_REFRESH);
    refresh
        .body_mut()
        .add_group(
            tags::NO_MD_ENTRIES,
            md_entry(tags::md_entry_type::BID, "100", "1")
                .with(tags::MD_UPDATE_ACTION, tags::md_update_action::DELETE),
        )
        .add_group(
            tags::NO_MD_ENTRIES,
            md_entry('Z', "100", "1").with(tags::MD_UPDATE_ACTION, tags::md_update_action::NEW),
        )
        .add_group(
            tags::NO_MD_ENTRIES,
            md_entry(tags::md_entry_type::OFFER, "101", "4")
                .with(tags::MD_UPDATE_ACTION, tags::md_update_action::CHANGE),
        );
    engine.deliver(refresh, &md_session());

    let seen = events(&log);
    assert_eq!(seen.len(), 2);
    assert!(seen[0].starts_with("diagnostic"), "{:?}", seen);
    assert_eq!(seen[1], "offer 4@101");
}

#[tokio::test(start_paused = true)]
async fn test_execution_reports_reach_strategy() {
    let (_gateway, engine, log) = ready_gateway().await;

    engine.deliver(execution_report(tags::exec_type::NEW, tags::side::BUY), &oe_session());
    engine.deliver(execution_report(tags::exec_type::FILL, tags::side::BUY), &oe_session());
    engine.deliver(execution_report(tags::exec_type::REJECTED, tags::side::SELL), &oe_session());
    engine.deliver(execution_report(tags::exec_type::CANCELED, tags::side::SELL), &oe_session());

    let seen = events(&log);
    assert_eq!(seen[0], "accepted");
    assert_eq!(seen[1], "fill BUY 3@5012.75");
    assert_eq!(seen[2], "reject SELL 3");
    assert!(seen[3].starts_with("diagnostic"), "{:?}", seen);
    assert_eq!(seen.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_message_type_is_a_diagnostic() {
    let (gateway, engine, log) = ready_gateway().await;

    engine.deliver(FixMessage::new("j"), &oe_session());

    let seen = events(&log);
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("diagnostic"));
    assert_eq!(gateway.state(), GatewayState::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_request_reject_reaches_strategy() {
    let (_gateway, engine, log) = ready_gateway().await;

    let mut reject = FixMessage::new(tags::msg_type::MARKET_DATA_REQUEST_REJECT);
    reject
        .body_mut()
        .set(tags::MD_REQ_ID, 1)
        .set(tags::MD_REQ_REJ_REASON, tags::md_req_rej_reason::UNKNOWN_SYMBOL)
        .set(tags::TEXT, "unknown contract");
    engine.deliver(reject, &md_session());

    assert_eq!(
        events(&log),
        vec!["request reject MDReqID=1, reason=unknown symbol, text=unknown contract"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_logout_while_ready_notifies_strategy() {
    let (gateway, engine, log) = ready_gateway().await;

    engine.log_off(&md_session());

    assert_eq!(events(&log), vec!["logout FIX.4.2:CLIENT_MD->CME"]);
    assert_eq!(gateway.state(), GatewayState::Ready);
    // The binding outlives the session's logon
    assert_eq!(gateway.session_for(SessionRole::MarketData), Some(md_session()));
}

#[tokio::test(start_paused = true)]
async fn test_stop_notifies_logout_only_while_ready() {
    let (gateway, engine, log) = ready_gateway().await;

    gateway.stop();

    assert_eq!(gateway.state(), GatewayState::Closed);
    assert!(engine.stopped.load(Ordering::SeqCst));
    // Stop moves to Closed before the engine logs out
    assert!(events(&log).is_empty());
}
