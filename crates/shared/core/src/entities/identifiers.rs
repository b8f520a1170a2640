//! Identifiers handed out by the gateway's id generator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Client order identifier (ClOrdID).
///
/// A strictly increasing integer that is rendered as a decimal string on the
/// wire. Uniqueness across restarts is the generator's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Market data request identifier (MDReqID), unique within one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MdRequestId(pub u64);

impl MdRequestId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MdRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
