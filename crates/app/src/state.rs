//! Application state

use std::sync::Arc;

use parichat_core::{CannedPartner, ChatConfig, PartnerBehavior, SessionStore};

/// Shared by every surface for the lifetime of the process
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub config: ChatConfig,
}

impl AppState {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            store: Arc::new(SessionStore::new()),
            config,
        }
    }

    /// Fresh partner simulation for a chat surface
    pub fn partner_behavior(&self) -> Box<dyn PartnerBehavior> {
        Box::new(CannedPartner::new(self.config.partner.clone()))
    }
}
