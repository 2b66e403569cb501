//! Join view model

use std::sync::Arc;
use std::time::Duration;

use parichat_core::invariants::assert_identity_invariants;
use parichat_core::{validate_join, FieldErrors, Identity};
use tracing::info;

use crate::state::AppState;

pub struct JoinViewModel {
    state: Arc<AppState>,
    pub username: String,
    pub room_code: String,
    pub errors: FieldErrors,
    pub is_loading: bool,
}

impl JoinViewModel {
    /// Username is pre-filled from the store when a user is already set
    pub fn new(state: Arc<AppState>) -> Self {
        let username = state
            .store
            .current_user()
            .map(|u| u.username)
            .unwrap_or_default();

        Self {
            state,
            username,
            room_code: String::new(),
            errors: FieldErrors::default(),
            is_loading: false,
        }
    }

    /// Validate, wait out the simulated join call, then populate the store.
    ///
    /// On failure the inline field errors are kept on the view model.
    pub async fn join(&mut self) -> Result<(), FieldErrors> {
        let request = match validate_join(&self.username, &self.room_code, &self.state.config.join) {
            Ok(r) => r,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(errors);
            }
        };
        self.errors = FieldErrors::default();

        self.is_loading = true;
        tokio::time::sleep(Duration::from_millis(self.state.config.join.delay_ms)).await;

        let identity = Identity::new(request.username.clone());
        assert_identity_invariants(&identity);

        self.state.store.set_current_user(identity);
        self.state.store.set_room_code(request.room_code.clone());
        self.is_loading = false;

        info!(username = %request.username, room = %request.room_code, "Joined room");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parichat_core::ChatConfig;

    fn app() -> Arc<AppState> {
        Arc::new(AppState::new(ChatConfig::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_populates_store() {
        let state = app();
        let mut vm = JoinViewModel::new(state.clone());
        vm.username = "alice".to_string();
        vm.room_code = "room1".to_string();

        vm.join().await.unwrap();

        let session = state.store.snapshot();
        assert_eq!(session.username(), Some("alice"));
        assert_eq!(session.room_code.as_deref(), Some("room1"));
        assert!(session.messages.is_empty());
        assert!(!vm.is_loading);
        assert!(vm.errors.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_form_never_reaches_store() {
        let state = app();
        let mut vm = JoinViewModel::new(state.clone());
        vm.username = "al".to_string();
        vm.room_code = String::new();

        let errors = vm.join().await.unwrap_err();

        assert_eq!(
            errors.username.as_deref(),
            Some("Username must be at least 3 characters")
        );
        assert_eq!(vm.errors.room_code.as_deref(), Some("Room code is required"));
        assert!(!state.store.is_joined());
        assert!(!vm.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prefills_username() {
        let state = app();
        state.store.set_current_user(Identity::new("alice"));

        let vm = JoinViewModel::new(state);
        assert_eq!(vm.username, "alice");
        assert!(vm.room_code.is_empty());
    }
}
