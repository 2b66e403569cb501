//! Parichat Core Library
//!
//! Session store, data model, join validation and simulated partner behavior
//! for a two-person private chat.

pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod partner;
pub mod scope;
pub mod store;
pub mod validation;

pub use config::{ChatConfig, ComposeConfig, JoinConfig, PartnerConfig};
pub use error::{Error, Result};
pub use models::*;
pub use partner::{CannedPartner, Cue, PartnerBehavior, Reply};
pub use scope::TaskScope;
pub use store::{Session, SessionStore};
pub use validation::{validate_join, FieldErrors, JoinRequest};
