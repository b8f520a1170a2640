//! Possible-duplicate suppression for outbound application messages
//!
//! Application messages flagged PossDupFlag=Y are never re-sent by the
//! session engine's automatic resend. Admin traffic is not inspected.

use crate::messages::{FixMessage, tags};
use log::warn;

#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateGuard;

impl DuplicateGuard {
    pub fn new() -> Self {
        Self
    }

    /// `true` when the marker is present and set
    pub fn should_suppress(&self, poss_dup_flag: Option<bool>) -> bool {
        poss_dup_flag.unwrap_or(false)
    }

    /// Read PossDupFlag from the outbound header and decide
    pub fn inspect(&self, msg: &FixMessage) -> bool {
        let header = msg.header();
        let flag = if header.has(tags::POSS_DUP_FLAG) {
            match header.get_bool(tags::POSS_DUP_FLAG) {
                Ok(flag) => Some(flag),
                Err(e) => {
                    warn!("Ignoring unreadable PossDupFlag on outbound {}: {}", msg.msg_type(), e);
                    None
                }
            }
        } else {
            None
        };
        self.should_suppress(flag)
    }
}
