//! Session engine abstraction
//!
//! The session engine owns connections, heartbeats, logon/logout, sequence
//! numbers, resend and framing. The gateway configures it and receives
//! callbacks through two narrow capability traits:
//!
//! - [`SessionLifecycle`]: session created, logged on, logged out
//! - [`MessageDispatch`]: outbound admin/app hooks and inbound delivery
//!
//! Callbacks may arrive on engine-managed threads. An engine must not deliver
//! inbound callbacks re-entrantly from inside [`SessionEngine::send_to_session`].

use crate::error::TransportError;
use crate::messages::FixMessage;
use crate::session::SessionSettings;
use fixgate_core::SessionId;
use std::sync::Arc;

/// Verdict of the outbound application hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundDecision {
    Send,
    /// Drop the message instead of transmitting it
    Suppress,
}

/// Session lifecycle callbacks
pub trait SessionLifecycle: Send + Sync {
    /// Session object created, not yet logged on
    fn on_create(&self, _session: &SessionId) {}

    /// Logon handshake completed
    fn on_logon(&self, session: &SessionId);

    /// Logged out or disconnected
    fn on_logout(&self, session: &SessionId);
}

/// Message-level callbacks
pub trait MessageDispatch: Send + Sync {
    /// Admin message (logon, heartbeat, ...) about to be sent; may be amended
    fn to_admin(&self, msg: &mut FixMessage, session: &SessionId);

    /// Application message about to be sent, including engine resends
    fn to_app(&self, msg: &mut FixMessage, session: &SessionId) -> OutboundDecision;

    /// Admin message received
    fn from_admin(&self, _msg: &FixMessage, _session: &SessionId) {}

    /// Application message received, in session order
    fn from_app(&self, msg: &FixMessage, session: &SessionId);
}

/// Everything an engine calls back into
pub trait SessionApplication: SessionLifecycle + MessageDispatch {}

impl<T: SessionLifecycle + MessageDispatch + ?Sized> SessionApplication for T {}

/// External session engine
pub trait SessionEngine: Send + Sync {
    /// Start connecting all configured sessions, calling back into `app`
    fn start(&self, app: Arc<dyn SessionApplication>) -> Result<(), TransportError>;

    /// Log out and disconnect every session, releasing `app`
    fn stop(&self);

    /// Queue an application message on a session. The engine runs it
    /// through [`MessageDispatch::to_app`] before transmission.
    fn send_to_session(&self, msg: FixMessage, session: &SessionId) -> Result<(), TransportError>;

    /// Settings declared for a session
    fn session_settings(&self, session: &SessionId) -> Option<SessionSettings>;

    fn is_logged_on(&self, session: &SessionId) -> bool;

    /// All configured sessions
    fn sessions(&self) -> Vec<SessionId>;
}
