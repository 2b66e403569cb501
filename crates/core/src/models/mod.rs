//! Data models for Parichat

mod message;
mod user;

pub use message::*;
pub use user::*;
