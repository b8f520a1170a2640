mod identifiers;
mod instrument;
mod order_intent;
mod session;
mod side;

pub use identifiers::{MdRequestId, OrderId};
pub use instrument::Instrument;
pub use order_intent::OrderIntent;
pub use session::{SessionId, SessionRole};
pub use side::Side;
