//! Session classification and outbound duplicate handling

mod guard;
mod registry;
mod settings;

pub use guard::DuplicateGuard;
pub use registry::{BindOutcome, SessionRoleRegistry};
pub use settings::SessionSettings;
