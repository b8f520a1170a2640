use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a session plays towards the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionRole {
    OrderEntry,
    MarketData,
}

impl SessionRole {
    pub const ALL: [SessionRole; 2] = [SessionRole::OrderEntry, SessionRole::MarketData];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderEntry => "order-entry",
            Self::MarketData => "market-data",
        }
    }
}

impl fmt::Display for SessionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a sequenced session with a counterparty
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId {
    pub begin_string: String,
    pub sender_comp_id: String,
    pub target_comp_id: String,
}

impl SessionId {
    pub fn new(
        begin_string: impl Into<String>,
        sender_comp_id: impl Into<String>,
        target_comp_id: impl Into<String>,
    ) -> Self {
        Self {
            begin_string: begin_string.into(),
            sender_comp_id: sender_comp_id.into(),
            target_comp_id: target_comp_id.into(),
        }
    }

    /// FIX 4.2 session between `sender` and `target`
    pub fn fix42(sender: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new("FIX.4.2", sender, target)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}->{}",
            self.begin_string, self.sender_comp_id, self.target_comp_id
        )
    }
}
