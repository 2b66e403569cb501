//! Chat view model

use std::sync::{Arc, Mutex, MutexGuard};

use parichat_core::invariants::assert_joined_session;
use parichat_core::{
    Cue, Error, Identity, Message, MessageId, PartnerBehavior, Reply, Result, SessionStore,
    TaskScope,
};
use tracing::{debug, info, warn};

use super::{CallViewModel, ComposeViewModel};
use crate::state::AppState;

const APP_TITLE: &str = "Parichat";

/// One rendered bubble
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub id: MessageId,
    pub sender: String,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub time: String,
    pub is_own: bool,
}

impl MessageRow {
    pub fn new(message: &Message, current_username: Option<&str>) -> Self {
        Self {
            id: message.id,
            sender: message.sender.clone(),
            text: message.text.clone(),
            image_url: message.image_url.clone(),
            time: message.format_timestamp(),
            is_own: current_username.is_some_and(|u| message.is_from(u)),
        }
    }
}

/// Header bar contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub title: &'static str,
    pub partner_name: Option<String>,
    pub partner_status: Option<String>,
}

/// Chat surface. Owns the partner simulation and every task it scheduled;
/// dropping the view model cancels them.
pub struct ChatViewModel {
    state: Arc<AppState>,
    behavior: Box<dyn PartnerBehavior>,
    /// Absent until the partner-join cue lands
    partner: Arc<Mutex<Option<Identity>>>,
    tasks: TaskScope,
    /// Store epoch at entry
    epoch: u64,
    pub compose: ComposeViewModel,
    pub call: CallViewModel,
}

impl ChatViewModel {
    /// Enter the chat surface.
    ///
    /// Fails with `Error::NotJoined` when user or room is missing; the caller
    /// should send the user back to the join surface.
    pub fn enter(state: Arc<AppState>, behavior: Box<dyn PartnerBehavior>) -> Result<Self> {
        let session = state.store.snapshot();
        if !session.is_joined() {
            warn!("Chat entered without an active session, redirecting");
            return Err(Error::NotJoined);
        }
        assert_joined_session(&session);

        let max_len = state.config.compose.max_message_len;
        let epoch = state.store.epoch();
        let mut vm = Self {
            state,
            behavior,
            partner: Arc::new(Mutex::new(None)),
            tasks: TaskScope::new(),
            epoch,
            compose: ComposeViewModel::new(max_len),
            call: CallViewModel::default(),
        };

        let username = session.username().unwrap_or_default();
        if let Some(reply) = vm
            .behavior
            .react(Cue::Joined { username }, &session.messages)
        {
            vm.schedule(reply, true);
        }

        info!(username = %username, room = ?session.room_code, epoch, "Entered chat");
        Ok(vm)
    }

    /// Send whatever is in the composer.
    ///
    /// The composer is cleared only when the message was appended.
    pub fn send_composed(&mut self) -> Result<MessageId> {
        self.ensure_active()?;

        let draft = self.compose.draft();
        draft.validate(self.state.config.compose.max_message_len)?;

        let username = self
            .state
            .store
            .current_user()
            .map(|u| u.username)
            .ok_or(Error::NotJoined)?;

        let message = draft.into_message(username);
        let id = message.id;
        self.state.store.add_message(message.clone());
        self.compose.clear();

        if self.partner().is_some() {
            let log = self.state.store.messages();
            if let Some(reply) = self.behavior.react(Cue::MessageSent(&message), &log) {
                self.schedule(reply, false);
            }
        } else {
            debug!(message_id = %id, "No partner present, no reply scheduled");
        }

        Ok(id)
    }

    /// Leave the room: cancel pending partner tasks, mark the partner
    /// offline and reset the store.
    pub fn leave(&mut self) {
        self.tasks.cancel_all();
        self.call.close();

        if let Some(partner) = lock_partner(&self.partner).as_mut() {
            partner.go_offline();
        }

        self.state.store.leave_room();
    }

    pub fn is_loading(&self) -> bool {
        self.partner().is_none()
    }

    pub fn partner(&self) -> Option<Identity> {
        lock_partner(&self.partner).clone()
    }

    #[allow(dead_code)]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }

    pub fn header(&self) -> HeaderView {
        let partner = self.partner();
        HeaderView {
            title: APP_TITLE,
            partner_name: partner.as_ref().map(|p| p.username.clone()),
            partner_status: partner.as_ref().map(Identity::status_text),
        }
    }

    pub fn rows(&self) -> Vec<MessageRow> {
        let session = self.state.store.snapshot();
        let username = session.username();
        session
            .messages
            .iter()
            .map(|m| MessageRow::new(m, username))
            .collect()
    }

    pub fn start_call(&mut self) {
        info!(partner = ?self.partner().map(|p| p.username), "Starting video call");
        self.call.open();
    }

    fn ensure_active(&self) -> Result<()> {
        if self.state.store.epoch() != self.epoch || !self.state.store.is_joined() {
            return Err(Error::NotJoined);
        }
        Ok(())
    }

    fn schedule(&mut self, reply: Reply, announces_presence: bool) {
        let store: Arc<SessionStore> = self.state.store.clone();
        let partner = self.partner.clone();
        let epoch = self.epoch;

        self.tasks.spawn_after(reply.delay, move || {
            if store.epoch() != epoch {
                return;
            }
            if announces_presence {
                *lock_partner(&partner) = Some(Identity::new(reply.sender.clone()));
            }
            store.add_message_in_epoch(epoch, reply.into_message());
        });
    }
}

fn lock_partner(partner: &Mutex<Option<Identity>>) -> MutexGuard<'_, Option<Identity>> {
    match partner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("Partner mutex poisoned, recovering");
            poisoned.into_inner()
        }
    }
}
