//! View models for the chat surfaces

mod call;
mod chat;
mod compose;
mod join;

pub use call::CallViewModel;
pub use chat::{ChatViewModel, HeaderView, MessageRow};
pub use compose::ComposeViewModel;
pub use join::JoinViewModel;

/// Top-level navigation target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Join,
    Chat,
}
