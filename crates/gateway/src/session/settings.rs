//! Per-session application settings

use fixgate_core::SessionRole;
use serde::{Deserialize, Serialize};

/// Role markers and credentials declared for one session.
///
/// Loaded by whoever configures the session engine; the gateway only reads
/// them through [`crate::transport::SessionEngine::session_settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// This session carries market data requests and refreshes
    #[serde(default)]
    pub market_data_session: bool,

    /// This session carries orders and execution reports
    #[serde(default)]
    pub order_session: bool,

    /// Sent in RawData on logon when present
    #[serde(default)]
    pub password: Option<String>,
}

impl SessionSettings {
    pub fn market_data() -> Self {
        Self {
            market_data_session: true,
            ..Default::default()
        }
    }

    pub fn order_entry() -> Self {
        Self {
            order_session: true,
            ..Default::default()
        }
    }

    /// One session carrying both roles
    pub fn colocated() -> Self {
        Self {
            market_data_session: true,
            order_session: true,
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Roles this session declares, market data first
    pub fn roles(&self) -> Vec<SessionRole> {
        let mut roles = Vec::with_capacity(2);
        if self.market_data_session {
            roles.push(SessionRole::MarketData);
        }
        if self.order_session {
            roles.push(SessionRole::OrderEntry);
        }
        roles
    }
}
