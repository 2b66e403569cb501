//! Session store
//!
//! Single authoritative holder of the chat session: the current user, the
//! active room code and the append-only message log. Every mutation is total
//! and runs to completion under the channel lock, after which subscribers are
//! notified with the new state.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::invariants::assert_empty_session;
use crate::models::{Identity, Message};

/// Session aggregate observed by every surface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub current_user: Option<Identity>,
    pub room_code: Option<String>,
    pub messages: Vec<Message>,
}

impl Session {
    /// Both user and room are set
    pub fn is_joined(&self) -> bool {
        self.current_user.is_some() && self.room_code.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.current_user.as_ref().map(|u| u.username.as_str())
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Owner of the session state.
///
/// Share it by `Arc` with the surfaces and tasks that need it. Reads return
/// clones; `subscribe` hands out a receiver that wakes on every mutation.
pub struct SessionStore {
    state: watch::Sender<Session>,
    /// Bumped by every `leave_room`; tasks scheduled under an older epoch are stale
    epoch: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            state,
            epoch: AtomicU64::new(0),
        }
    }

    /// Replace the current identity
    pub fn set_current_user(&self, identity: Identity) {
        debug!(username = %identity.username, "Setting current user");
        self.state.send_modify(|s| s.current_user = Some(identity));
    }

    /// Replace the active room code
    pub fn set_room_code(&self, code: impl Into<String>) {
        let code = code.into();
        debug!(room = %code, "Setting room code");
        self.state.send_modify(|s| s.room_code = Some(code));
    }

    /// Append to the end of the message log
    pub fn add_message(&self, message: Message) {
        log_append(&message);
        self.state.send_modify(|s| s.messages.push(message));
    }

    /// Append only if no `leave_room` happened since `epoch` was read.
    ///
    /// Returns false, without notifying subscribers, when the message was dropped.
    pub fn add_message_in_epoch(&self, epoch: u64, message: Message) -> bool {
        self.state.send_if_modified(|s| {
            let current = self.epoch.load(Ordering::Acquire);
            if current != epoch {
                debug!(
                    message_id = %message.id,
                    scheduled_epoch = epoch,
                    current_epoch = current,
                    "Dropping message from ended session"
                );
                return false;
            }
            log_append(&message);
            s.messages.push(message);
            true
        })
    }

    /// Clear user, room and messages in one step
    pub fn leave_room(&self) {
        self.state.send_modify(|s| {
            let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
            info!(
                username = ?s.username(),
                room = ?s.room_code,
                messages = s.messages.len(),
                epoch,
                "Leaving room"
            );
            *s = Session::default();
            assert_empty_session(s);
        });
    }

    /// Current session epoch
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Clone of the full aggregate
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.state.borrow().current_user.clone()
    }

    pub fn room_code(&self) -> Option<String> {
        self.state.borrow().room_code.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.state.borrow().messages.len()
    }

    pub fn is_joined(&self) -> bool {
        self.state.borrow().is_joined()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn log_append(message: &Message) {
    if !message.has_content() {
        warn!(
            message_id = %message.id,
            sender = %message.sender,
            "Appending message with neither text nor image"
        );
    }
    debug!(message_id = %message.id, sender = %message.sender, "Appending message");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined_store() -> SessionStore {
        let store = SessionStore::new();
        store.set_current_user(Identity::new("alice"));
        store.set_room_code("room1");
        store
    }

    #[test]
    fn test_join_scenario() {
        let store = joined_store();
        let session = store.snapshot();
        assert_eq!(session.username(), Some("alice"));
        assert_eq!(session.room_code.as_deref(), Some("room1"));
        assert!(session.messages.is_empty());
        assert!(store.is_joined());
    }

    #[test]
    fn test_setter_order_does_not_matter() {
        let a = SessionStore::new();
        a.set_current_user(Identity::new("first"));
        a.set_room_code("aaaa");
        a.set_current_user(Identity::new("alice"));
        a.set_room_code("room1");

        let b = SessionStore::new();
        b.set_room_code("room1");
        b.set_current_user(Identity::new("alice"));

        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_add_message_preserves_order() {
        let store = joined_store();
        let sent: Vec<Message> = (0..20)
            .map(|i| Message::text(if i % 2 == 0 { "alice" } else { "Partner" }, format!("m{}", i)))
            .collect();

        for msg in &sent {
            store.add_message(msg.clone());
        }

        assert_eq!(store.messages(), sent);
    }

    #[test]
    fn test_add_message_does_not_deduplicate() {
        let store = SessionStore::new();
        let msg = Message::text("alice", "hi");
        store.add_message(msg.clone());
        store.add_message(msg.clone());

        let messages = store.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, messages[1].id);
    }

    #[test]
    fn test_add_message_appends_one() {
        let store = joined_store();
        store.add_message(Message::text("Partner", "Hey alice!"));
        let before = store.message_count();

        store.add_message(Message::text("alice", "hi"));

        assert_eq!(store.message_count(), before + 1);
        assert_eq!(
            store.snapshot().last_message().and_then(|m| m.text.clone()),
            Some("hi".to_string())
        );
    }

    #[test]
    fn test_store_accepts_empty_message() {
        let store = SessionStore::new();
        store.add_message(Message::new("alice", None, None));
        assert_eq!(store.message_count(), 1);
    }

    #[test]
    fn test_leave_room_resets_and_is_idempotent() {
        let store = joined_store();
        store.add_message(Message::text("alice", "hi"));

        store.leave_room();
        assert_eq!(store.snapshot(), Session::default());
        assert!(store.current_user().is_none());
        assert!(store.room_code().is_none());

        store.leave_room();
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn test_epoch_guard_drops_stale_message() {
        let store = joined_store();
        let epoch = store.epoch();

        assert!(store.add_message_in_epoch(epoch, Message::text("Partner", "before")));
        store.leave_room();
        assert!(!store.add_message_in_epoch(epoch, Message::text("Partner", "after")));

        assert!(store.messages().is_empty());
        assert_eq!(store.epoch(), epoch + 1);
    }

    #[test]
    fn test_subscribers_see_mutations() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.set_current_user(Identity::new("alice"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().username(), Some("alice"));

        store.leave_room();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().current_user.is_none());
    }

    #[test]
    fn test_stale_append_does_not_notify() {
        let store = joined_store();
        let epoch = store.epoch();
        store.leave_room();

        let mut rx = store.subscribe();
        rx.borrow_and_update();
        store.add_message_in_epoch(epoch, Message::text("Partner", "late"));
        assert!(!rx.has_changed().unwrap());
    }
}
