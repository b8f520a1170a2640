//! Gateway orchestration
//!
//! Owns the session engine lifecycle, binds session roles on logon, waits
//! for both roles before declaring readiness, and routes messages between
//! the engine, the translator and the strategy.
//!
//! ```text
//! Disconnected ──start──► Connecting ──► AwaitingBothSessions ──► Ready
//!       │                     │                   │                 │
//!       └─────────────────────┴──── stop / timeout / conflict ─────┴──► Closed
//! ```

use crate::error::{GatewayError, TransportError};
use crate::ids::IdGenerator;
use crate::messages::{FixMessage, tags};
use crate::session::{BindOutcome, DuplicateGuard, SessionRoleRegistry, SessionSettings};
use crate::strategy::{Strategy, TradingIntents};
use crate::transport::{
    MessageDispatch, OutboundDecision, SessionApplication, SessionEngine, SessionLifecycle,
};
use crate::translator::{Diagnostic, InboundKind, MessageTranslator, OrderDefaults};
use dashmap::DashMap;
use fixgate_core::{
    ExecutionEvent, Instrument, MarketDataEvent, MdRequestId, OrderId, OrderIntent, SessionId,
    SessionRole,
};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Gateway lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
    Disconnected,
    Connecting,
    AwaitingBothSessions,
    Ready,
    Closed,
}

impl fmt::Display for GatewayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::AwaitingBothSessions => "awaiting both sessions",
            Self::Ready => "ready",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

fn default_attempts() -> u32 {
    10
}

fn default_backoff_ms() -> u64 {
    1000
}

/// Bounded wait for both sessions to log on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessPolicy {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Fixed pause between attempts
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl ReadinessPolicy {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

/// Gateway configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub readiness: ReadinessPolicy,

    #[serde(default)]
    pub order_defaults: OrderDefaults,
}

/// Trading gateway
///
/// Dropping the gateway stops the session engine.
pub struct Gateway {
    shared: Arc<Shared>,
}

/// State reachable from engine callbacks
struct Shared {
    engine: Arc<dyn SessionEngine>,
    registry: SessionRoleRegistry,
    ids: Arc<IdGenerator>,
    translator: MessageTranslator,
    guard: DuplicateGuard,
    strategy: Mutex<Box<dyn Strategy>>,
    state: Mutex<GatewayState>,
    /// Binding conflict seen during startup, reported by `start`
    startup_fault: Mutex<Option<GatewayError>>,
    /// Serializes outbound sends per session
    send_locks: DashMap<SessionId, Arc<Mutex<()>>>,
    readiness: ReadinessPolicy,
}

impl Gateway {
    pub fn new(
        engine: Arc<dyn SessionEngine>,
        ids: Arc<IdGenerator>,
        strategy: Box<dyn Strategy>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                engine,
                registry: SessionRoleRegistry::new(),
                ids,
                translator: MessageTranslator::new(config.order_defaults),
                guard: DuplicateGuard::new(),
                strategy: Mutex::new(strategy),
                state: Mutex::new(GatewayState::Disconnected),
                startup_fault: Mutex::new(None),
                send_locks: DashMap::new(),
                readiness: config.readiness,
            }),
        }
    }

    pub fn state(&self) -> GatewayState {
        *self.shared.state.lock()
    }

    /// Session currently bound to `role`
    pub fn session_for(&self, role: SessionRole) -> Option<SessionId> {
        self.shared.registry.resolve(role)
    }

    /// Start the session engine and wait for both roles to log on.
    ///
    /// On success the gateway is `Ready` and the strategy's `on_ready` has
    /// run. A timeout or a role conflict leaves the gateway `Closed`; a
    /// `stop` during the wait ends it with `InvalidState`.
    pub async fn start(&self) -> Result<(), GatewayError> {
        let shared = &self.shared;
        let state = self.state();
        if state != GatewayState::Disconnected {
            return Err(GatewayError::InvalidState {
                operation: "start",
                state,
            });
        }

        if let Err(e) = shared.validate_declared_roles() {
            error!("[init] {}", e);
            shared.set_state(GatewayState::Closed);
            return Err(e);
        }

        shared.transition("start", GatewayState::Disconnected, GatewayState::Connecting)?;
        let app: Arc<dyn SessionApplication> = shared.clone();
        if let Err(e) = shared.engine.start(app) {
            error!("[init] Session engine failed to start: {}", e);
            shared.set_state(GatewayState::Closed);
            return Err(e.into());
        }
        shared.transition(
            "start",
            GatewayState::Connecting,
            GatewayState::AwaitingBothSessions,
        )?;

        let policy = &shared.readiness;
        let mut ready = false;
        for attempt in 1..=policy.attempts {
            shared.expect_state("start", GatewayState::AwaitingBothSessions)?;
            if let Some(fault) = shared.startup_fault.lock().take() {
                error!("[init] Fatal error: {}", fault);
                self.stop();
                return Err(fault);
            }
            if shared.sessions_ready() {
                ready = true;
                break;
            }
            info!(
                "[init] Waiting for all sessions to log on (attempt {}/{})",
                attempt, policy.attempts
            );
            if attempt < policy.attempts {
                tokio::time::sleep(policy.backoff()).await;
            }
        }

        if !ready {
            let pending = shared.pending_description();
            error!(
                "[init] Fatal error: timed out waiting for all sessions to log on ({})",
                pending
            );
            self.stop();
            return Err(GatewayError::SessionTimeout {
                attempts: policy.attempts,
                pending,
            });
        }

        // Inbound callbacks wait on the strategy lock until on_ready returns
        let result = {
            let mut strategy = shared.strategy.lock();
            shared.transition(
                "start",
                GatewayState::AwaitingBothSessions,
                GatewayState::Ready,
            )?;
            info!("[init] All sessions logged on, gateway ready");
            info!("[init] Starting strategy {}", strategy.name());
            strategy.on_ready(&**shared)
        };
        if let Err(e) = result {
            error!("[init] Strategy failed to initialize: {}", e);
            self.stop();
            return Err(e);
        }
        Ok(())
    }

    /// Stop the session engine; the gateway ends `Closed`
    pub fn stop(&self) {
        let previous = std::mem::replace(&mut *self.shared.state.lock(), GatewayState::Closed);
        if previous != GatewayState::Closed {
            info!("Shutting down gateway (was {})", previous);
            self.shared.engine.stop();
        }
    }

    /// Intent handle for callers outside strategy callbacks
    pub fn intents(&self) -> &dyn TradingIntents {
        &*self.shared
    }

    pub fn subscribe_market_data(&self, instrument: &Instrument) -> Result<MdRequestId, GatewayError> {
        self.shared.subscribe_market_data(instrument)
    }

    pub fn send_market_order(&self, intent: OrderIntent) -> Result<OrderId, GatewayError> {
        self.shared.send_market_order(intent)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    fn set_state(&self, state: GatewayState) {
        let mut current = self.state.lock();
        debug!("Gateway state {} -> {}", *current, state);
        *current = state;
    }

    fn state(&self) -> GatewayState {
        *self.state.lock()
    }

    fn expect_state(&self, operation: &'static str, expected: GatewayState) -> Result<(), GatewayError> {
        let state = self.state();
        if state != expected {
            return Err(GatewayError::InvalidState { operation, state });
        }
        Ok(())
    }

    /// Move `from -> to` atomically; fails if another transition (stop)
    /// got there first
    fn transition(
        &self,
        operation: &'static str,
        from: GatewayState,
        to: GatewayState,
    ) -> Result<(), GatewayError> {
        let mut current = self.state.lock();
        if *current != from {
            return Err(GatewayError::InvalidState {
                operation,
                state: *current,
            });
        }
        debug!("Gateway state {} -> {}", *current, to);
        *current = to;
        Ok(())
    }

    fn validate_declared_roles(&self) -> Result<(), GatewayError> {
        let declared: Vec<(SessionId, SessionSettings)> = self
            .engine
            .sessions()
            .into_iter()
            .map(|session| {
                let settings = self.engine.session_settings(&session).unwrap_or_default();
                (session, settings)
            })
            .collect();
        SessionRoleRegistry::validate_declared(declared.iter().map(|(id, s)| (id, s)))
    }

    /// Both roles bound and every bound session logged on
    fn sessions_ready(&self) -> bool {
        self.registry.is_complete()
            && self
                .registry
                .bound_sessions()
                .iter()
                .all(|session| self.engine.is_logged_on(session))
    }

    fn pending_description(&self) -> String {
        let mut pending: Vec<String> = self
            .registry
            .unbound_roles()
            .into_iter()
            .map(|role| format!("{} role unbound", role))
            .collect();
        pending.extend(
            self.registry
                .bound_sessions()
                .into_iter()
                .filter(|session| !self.engine.is_logged_on(session))
                .map(|session| format!("{} not logged on", session)),
        );
        pending.join(", ")
    }

    fn session_for(&self, role: SessionRole) -> Result<SessionId, GatewayError> {
        self.registry
            .resolve(role)
            .ok_or(GatewayError::RoleUnbound(role))
    }

    fn send(&self, msg: FixMessage, session: &SessionId) -> Result<(), TransportError> {
        let lock = self.send_locks.entry(session.clone()).or_default().clone();
        let _serialized = lock.lock();
        self.engine.send_to_session(msg, session)
    }

    fn report(&self, strategy: &mut dyn Strategy, diagnostic: Diagnostic, msg: &FixMessage) {
        warn!("{}: {}", diagnostic, msg);
        strategy.on_diagnostic(&diagnostic);
    }

    fn dispatch_market_data(&self, strategy: &mut dyn Strategy, event: MarketDataEvent) {
        match event {
            MarketDataEvent::BestBidUpdate { quantity, price } => {
                strategy.on_best_bid_update(self, quantity, price)
            }
            MarketDataEvent::BestOfferUpdate { quantity, price } => {
                strategy.on_best_offer_update(self, quantity, price)
            }
            MarketDataEvent::LastTradeUpdate { quantity, price } => {
                strategy.on_last_trade_update(self, quantity, price)
            }
        }
    }

    fn dispatch_execution(&self, strategy: &mut dyn Strategy, event: ExecutionEvent, msg: &FixMessage) {
        match event {
            ExecutionEvent::Fill {
                side,
                quantity,
                price,
            } => {
                info!("RECEIVED FILL: side={}, price={}, qty={}", side, price, quantity);
                strategy.on_order_fill(self, side, quantity, price);
            }
            ExecutionEvent::Reject { side, quantity } => {
                warn!("RECEIVED REJECT: {}", msg);
                strategy.on_order_reject(self, side, quantity);
            }
            ExecutionEvent::Accepted => {
                debug!("Order acknowledged: {}", msg);
                strategy.on_order_accepted(self);
            }
        }
    }
}

impl SessionLifecycle for Shared {
    fn on_create(&self, session: &SessionId) {
        debug!("[onCreate] {}", session);
    }

    fn on_logon(&self, session: &SessionId) {
        let Some(settings) = self.engine.session_settings(session) else {
            warn!("[onLogon] {} has no settings, no role bound", session);
            return;
        };

        let roles = SessionRoleRegistry::classify(session, &settings);
        if roles.is_empty() {
            warn!("[onLogon] {} declares no role", session);
        }

        for role in roles {
            match self.registry.bind(role, session) {
                Ok(BindOutcome::Bound) => info!("[onLogon] {} ({})", session, role),
                Ok(BindOutcome::AlreadyBound) => debug!("[onLogon] {} re-logon ({})", session, role),
                Err(e) => {
                    error!("[onLogon] {}", e);
                    if self.state() != GatewayState::Ready {
                        self.startup_fault.lock().get_or_insert(e);
                    }
                }
            }
        }
    }

    fn on_logout(&self, session: &SessionId) {
        info!("[onLogout] {}", session);
        if self.state() == GatewayState::Ready {
            self.strategy.lock().on_session_logout(session);
        }
    }
}

impl MessageDispatch for Shared {
    fn to_admin(&self, msg: &mut FixMessage, session: &SessionId) {
        if msg.msg_type() != tags::msg_type::LOGON {
            return;
        }

        let password = self
            .engine
            .session_settings(session)
            .and_then(|settings| settings.password);
        match password {
            Some(password) => {
                msg.body_mut()
                    .set(tags::RAW_DATA_LENGTH, password.len())
                    .set(tags::RAW_DATA, password);
            }
            None => warn!("Warning: password not configured for session {}", session),
        }
    }

    fn to_app(&self, msg: &mut FixMessage, session: &SessionId) -> OutboundDecision {
        if self.guard.inspect(msg) {
            warn!(
                "Suppressing possible duplicate MsgType={} to {}",
                msg.msg_type(),
                session
            );
            return OutboundDecision::Suppress;
        }
        info!("OUT: {}", msg);
        OutboundDecision::Send
    }

    fn from_admin(&self, msg: &FixMessage, session: &SessionId) {
        debug!("ADMIN IN {}: {}", session, msg);
    }

    fn from_app(&self, msg: &FixMessage, session: &SessionId) {
        debug!("IN {}: {}", session, msg);
        let mut guard = self.strategy.lock();
        let strategy: &mut dyn Strategy = &mut **guard;

        let kind = match InboundKind::classify(msg) {
            Ok(kind) => kind,
            Err(diagnostic) => return self.report(strategy, diagnostic, msg),
        };

        match kind {
            InboundKind::ExecutionReport => match self.translator.parse_execution_report(msg) {
                Ok(event) => self.dispatch_execution(strategy, event, msg),
                Err(diagnostic) => self.report(strategy, diagnostic, msg),
            },
            InboundKind::SnapshotRefresh | InboundKind::IncrementalRefresh => {
                let entries = if kind == InboundKind::SnapshotRefresh {
                    self.translator.parse_snapshot_refresh(msg)
                } else {
                    self.translator.parse_incremental_refresh(msg)
                };
                match entries {
                    Ok(entries) => {
                        for entry in entries {
                            match entry {
                                Ok(event) => self.dispatch_market_data(strategy, event),
                                Err(diagnostic) => self.report(strategy, diagnostic, msg),
                            }
                        }
                    }
                    Err(diagnostic) => self.report(strategy, diagnostic, msg),
                }
            }
            InboundKind::RequestReject => {
                let notice = self.translator.parse_request_reject(msg);
                warn!("MarketDataRequestReject: {}", notice);
                strategy.on_request_reject(self, &notice);
            }
        }
    }
}

impl TradingIntents for Shared {
    fn subscribe_market_data(&self, instrument: &Instrument) -> Result<MdRequestId, GatewayError> {
        let session = self.session_for(SessionRole::MarketData)?;
        let request_id = self.ids.allocate_md_request_id();
        let msg = self
            .translator
            .build_market_data_subscription(instrument, request_id);
        self.send(msg, &session)?;

        info!("Subscribed to {} (MDReqID={})", instrument, request_id);
        Ok(request_id)
    }

    fn send_market_order(&self, intent: OrderIntent) -> Result<OrderId, GatewayError> {
        let session = self.session_for(SessionRole::OrderEntry)?;
        let order_id = self.ids.allocate_order_id()?;
        let msg = self.translator.build_market_order(&intent, order_id);
        self.send(msg, &session)?;

        info!(
            "Sent market order {}: {} {} {} for {}",
            order_id, intent.side, intent.quantity, intent.instrument, intent.account
        );
        Ok(order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_policy_defaults() {
        let policy = ReadinessPolicy::default();
        assert_eq!(policy.attempts, 10);
        assert_eq!(policy.backoff(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_fills_missing_sections() {
        let config: GatewayConfig =
            serde_json::from_str(r#"{"readiness": {"attempts": 3}}"#).unwrap();
        assert_eq!(config.readiness.attempts, 3);
        assert_eq!(config.readiness.backoff_ms, 1000);
        assert_eq!(config.order_defaults, OrderDefaults::default());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(GatewayState::AwaitingBothSessions.to_string(), "awaiting both sessions");
        assert_eq!(GatewayState::Ready.to_string(), "ready");
    }
}
