//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::Identity;
use crate::store::Session;

/// Validate that an identity is internally consistent
pub fn assert_identity_invariants(identity: &Identity) {
    debug_assert!(
        !identity.username.trim().is_empty(),
        "Identity has empty username"
    );

    // last_seen is only meaningful while offline
    debug_assert!(
        !(identity.is_online && identity.last_seen.is_some()),
        "Identity {} is online but has last_seen {:?}",
        identity.username,
        identity.last_seen
    );
}

/// Validate a session that the chat surface is about to render
pub fn assert_joined_session(session: &Session) {
    debug_assert!(
        session.is_joined(),
        "Chat surface entered with user {:?} and room {:?}",
        session.current_user.as_ref().map(|u| &u.username),
        session.room_code
    );

    if let Some(user) = &session.current_user {
        assert_identity_invariants(user);
    }
}

/// Validate that a session has been fully reset
pub fn assert_empty_session(session: &Session) {
    debug_assert!(
        *session == Session::default(),
        "Session not empty after reset: user {:?}, room {:?}, {} messages",
        session.current_user.as_ref().map(|u| &u.username),
        session.room_code,
        session.messages.len()
    );
}
