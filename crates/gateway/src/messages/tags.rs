//! FIX 4.2 tag numbers and enumerated values used by the gateway

use super::Tag;

// Header

pub const MSG_TYPE: Tag = 35;
pub const POSS_DUP_FLAG: Tag = 43;

// Logon

pub const RAW_DATA_LENGTH: Tag = 95;
pub const RAW_DATA: Tag = 96;
pub const ENCRYPT_METHOD: Tag = 98;
pub const HEART_BT_INT: Tag = 108;

// Orders and executions

pub const ACCOUNT: Tag = 1;
pub const AVG_PX: Tag = 6;
pub const CL_ORD_ID: Tag = 11;
pub const CUM_QTY: Tag = 14;
pub const EXEC_ID: Tag = 17;
pub const EXEC_TRANS_TYPE: Tag = 20;
pub const HANDL_INST: Tag = 21;
pub const LAST_PX: Tag = 31;
pub const LAST_SHARES: Tag = 32;
pub const ORDER_ID: Tag = 37;
pub const ORDER_QTY: Tag = 38;
pub const ORD_STATUS: Tag = 39;
pub const ORD_TYPE: Tag = 40;
pub const RULE_80A: Tag = 47;
pub const SIDE: Tag = 54;
pub const SYMBOL: Tag = 55;
pub const TEXT: Tag = 58;
pub const TIME_IN_FORCE: Tag = 59;
pub const TRANSACT_TIME: Tag = 60;
pub const EXEC_TYPE: Tag = 150;
pub const LEAVES_QTY: Tag = 151;
pub const SECURITY_TYPE: Tag = 167;
pub const MATURITY_MONTH_YEAR: Tag = 200;
pub const CUSTOMER_OR_FIRM: Tag = 204;
pub const SECURITY_EXCHANGE: Tag = 207;

// Market data

pub const NO_RELATED_SYM: Tag = 146;
pub const MD_REQ_ID: Tag = 262;
pub const SUBSCRIPTION_REQUEST_TYPE: Tag = 263;
pub const MARKET_DEPTH: Tag = 264;
pub const MD_UPDATE_TYPE: Tag = 265;
pub const AGGREGATED_BOOK: Tag = 266;
pub const NO_MD_ENTRY_TYPES: Tag = 267;
pub const NO_MD_ENTRIES: Tag = 268;
pub const MD_ENTRY_TYPE: Tag = 269;
pub const MD_ENTRY_PX: Tag = 270;
pub const MD_ENTRY_SIZE: Tag = 271;
pub const MD_UPDATE_ACTION: Tag = 279;
pub const MD_REQ_REJ_REASON: Tag = 281;

pub mod msg_type {
    pub const EXECUTION_REPORT: &str = "8";
    pub const LOGON: &str = "A";
    pub const NEW_ORDER_SINGLE: &str = "D";
    pub const MARKET_DATA_REQUEST: &str = "V";
    pub const MARKET_DATA_SNAPSHOT_FULL_REFRESH: &str = "W";
    pub const MARKET_DATA_INCREMENTAL_REFRESH: &str = "X";
    pub const MARKET_DATA_REQUEST_REJECT: &str = "Y";
}

pub mod exec_type {
    pub const NEW: char = '0';
    pub const PARTIAL_FILL: char = '1';
    pub const FILL: char = '2';
    pub const CANCELED: char = '4';
    pub const REJECTED: char = '8';
}

pub mod exec_trans_type {
    pub const NEW: char = '0';
}

pub mod ord_status {
    pub const NEW: char = '0';
    pub const FILLED: char = '2';
    pub const REJECTED: char = '8';
}

pub mod side {
    pub const BUY: char = '1';
    pub const SELL: char = '2';
}

pub mod ord_type {
    pub const MARKET: char = '1';
}

pub mod time_in_force {
    pub const DAY: char = '0';
}

pub mod handl_inst {
    pub const AUTOMATED_PRIVATE: char = '1';
}

pub mod subscription_request_type {
    pub const SNAPSHOT_PLUS_UPDATES: char = '1';
}

pub mod md_update_type {
    pub const INCREMENTAL_REFRESH: char = '1';
}

pub mod md_entry_type {
    pub const BID: char = '0';
    pub const OFFER: char = '1';
    pub const TRADE: char = '2';
}

pub mod md_update_action {
    pub const NEW: char = '0';
    pub const CHANGE: char = '1';
    pub const DELETE: char = '2';
}

pub mod md_req_rej_reason {
    pub const UNKNOWN_SYMBOL: char = '0';
    pub const DUPLICATE_MD_REQ_ID: char = '1';
    pub const INSUFFICIENT_BANDWIDTH: char = '2';
    pub const INSUFFICIENT_PERMISSIONS: char = '3';
    pub const UNSUPPORTED_SUBSCRIPTION_REQUEST_TYPE: char = '4';
    pub const UNSUPPORTED_MARKET_DEPTH: char = '5';
    pub const UNSUPPORTED_MD_UPDATE_TYPE: char = '6';
    pub const UNSUPPORTED_AGGREGATED_BOOK: char = '7';
    pub const UNSUPPORTED_MD_ENTRY_TYPE: char = '8';
}

/// FIX boolean encoding
pub const YES: char = 'Y';
pub const NO: char = 'N';
