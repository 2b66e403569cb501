//! Participant identity

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::invariants::assert_identity_invariants;

/// A participant in a room (self or partner)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub is_online: bool,
    /// Set when the participant goes offline, cleared when they come back
    pub last_seen: Option<DateTime<Utc>>,
}

impl Identity {
    /// Create an online identity
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_online: true,
            last_seen: None,
        }
    }

    pub fn go_offline(&mut self) {
        self.is_online = false;
        self.last_seen = Some(Utc::now());
        assert_identity_invariants(self);
    }

    pub fn go_online(&mut self) {
        self.is_online = true;
        self.last_seen = None;
        assert_identity_invariants(self);
    }

    /// Presence line shown under the partner's name
    pub fn status_text(&self) -> String {
        if self.is_online {
            return format!("{} is online", self.username);
        }

        match self.last_seen {
            Some(ts) => format!(
                "Last seen {}",
                ts.with_timezone(&Local).format("%H:%M:%S")
            ),
            None => "Offline".to_string(),
        }
    }
}
