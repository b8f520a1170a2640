//! Role-to-session bindings

use super::SessionSettings;
use crate::error::GatewayError;
use fixgate_core::{SessionId, SessionRole};
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Result of a successful bind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// First binding for the role
    Bound,
    /// Role was already bound to the same session
    AlreadyBound,
}

/// Maps each role to the one session that carries it.
///
/// Bindings are made on logon and never reassigned for the lifetime of the
/// process. A session may carry both roles.
#[derive(Debug, Default)]
pub struct SessionRoleRegistry {
    bindings: Mutex<HashMap<SessionRole, SessionId>>,
}

impl SessionRoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roles a session declares through its settings
    pub fn classify(session: &SessionId, settings: &SessionSettings) -> Vec<SessionRole> {
        let roles = settings.roles();
        debug!("Session {} declares roles {:?}", session, roles);
        roles
    }

    /// Check the declared configuration before any session logs on: every
    /// role must be declared by exactly one session.
    pub fn validate_declared<'a>(
        sessions: impl IntoIterator<Item = (&'a SessionId, &'a SessionSettings)>,
    ) -> Result<(), GatewayError> {
        let mut declared: HashMap<SessionRole, &SessionId> = HashMap::new();
        for (session, settings) in sessions {
            for role in settings.roles() {
                if let Some(previous) = declared.insert(role, session) {
                    return Err(GatewayError::Configuration(format!(
                        "role {} declared by both {} and {}",
                        role, previous, session
                    )));
                }
            }
        }

        let missing: Vec<&str> = SessionRole::ALL
            .iter()
            .filter(|role| !declared.contains_key(*role))
            .map(|role| role.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(GatewayError::Configuration(format!(
                "no session declares role {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    /// Bind `role` to `session`.
    ///
    /// Rebinding to the same session is a no-op; a different session
    /// claiming a bound role is a configuration error.
    pub fn bind(&self, role: SessionRole, session: &SessionId) -> Result<BindOutcome, GatewayError> {
        let mut bindings = self.bindings.lock();
        match bindings.get(&role) {
            Some(bound) if bound == session => Ok(BindOutcome::AlreadyBound),
            Some(bound) => Err(GatewayError::Configuration(format!(
                "role {} already bound to {}, refusing {}",
                role, bound, session
            ))),
            None => {
                bindings.insert(role, session.clone());
                Ok(BindOutcome::Bound)
            }
        }
    }

    pub fn resolve(&self, role: SessionRole) -> Option<SessionId> {
        self.bindings.lock().get(&role).cloned()
    }

    pub fn is_complete(&self) -> bool {
        self.unbound_roles().is_empty()
    }

    pub fn unbound_roles(&self) -> Vec<SessionRole> {
        let bindings = self.bindings.lock();
        SessionRole::ALL
            .into_iter()
            .filter(|role| !bindings.contains_key(role))
            .collect()
    }

    /// Distinct sessions holding at least one role
    pub fn bound_sessions(&self) -> Vec<SessionId> {
        let mut sessions: Vec<SessionId> = self.bindings.lock().values().cloned().collect();
        sessions.sort();
        sessions.dedup();
        sessions
    }
}
