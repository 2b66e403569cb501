//! Error types for Parichat Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Message has neither text nor an image")]
    EmptyMessage,

    #[error("Message is {len} characters, maximum is {max}")]
    MessageTooLong { len: usize, max: usize },

    #[error("No active session: join a room first")]
    NotJoined,
}

pub type Result<T> = std::result::Result<T, Error>;
