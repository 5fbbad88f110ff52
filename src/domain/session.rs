//! Session identity and notification destinations
//!
//! Broadcast is not a separate code path: it is a reserved session
//! identifier, so the registry and scheduler treat "watch for everyone"
//! exactly like any other session's watches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved session identifier routed to the broadcast topic
pub const BROADCAST_SESSION: &str = "_broadcast";

/// Identifier of one client session (or the reserved broadcast session)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The reserved broadcast session
    pub fn broadcast() -> Self {
        Self(BROADCAST_SESSION.to_string())
    }

    pub fn is_broadcast(&self) -> bool {
        self.0 == BROADCAST_SESSION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Delivery destination for notifications owned by this session
    pub fn destination(&self) -> Destination {
        if self.is_broadcast() {
            Destination::Broadcast
        } else {
            Destination::Session(self.clone())
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a notification is delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// One client session's private queue
    Session(SessionId),
    /// The shared broadcast topic
    Broadcast,
}

impl Destination {
    /// Marker suffix appended to per-session update messages
    ///
    /// Broadcast updates carry no suffix. The suffix applies to change
    /// notifications only, never to watch-added confirmations.
    pub fn update_suffix(&self) -> &'static str {
        match self {
            Destination::Session(_) => " (Session update)",
            Destination::Broadcast => "",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Session(id) => write!(f, "session:{id}"),
            Destination::Broadcast => f.write_str("broadcast"),
        }
    }
}
