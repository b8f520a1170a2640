//! Wire message model for the FIX 4.2 application layer
//!
//! Messages are kept as ordered tag/value field maps with nested repeating
//! groups. Framing, body length and checksum belong to the session engine;
//! `Display` renders a `|`-separated form for logs.

pub mod message;
pub mod tags;

pub use message::{FieldError, FieldMap, FixMessage, Tag};
