//! Configuration loading
//!
//! All settings are optional in `parichat.toml`; missing keys take the
//! defaults below. Lookup order: explicit path, then the platform config dir.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Config file name inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "parichat.toml";

const DEFAULT_IMAGE_URL: &str = "https://images.unsplash.com/photo-1522075469751-3a6694fb2f61?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=800&q=80";

const DEFAULT_RESPONSES: [&str; 10] = [
    "Hey there! How are you doing today?",
    "That's interesting! Tell me more.",
    "I'm not sure I understand. Could you explain?",
    "Haha, that's funny! 😄",
    "I've been thinking about that too.",
    "Let's talk about something else.",
    "Do you have any plans for the weekend?",
    "I miss our conversations.",
    "What do you think about the new movie that just came out?",
    "I'm a bit busy right now, but I'll get back to you soon.",
];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub join: JoinConfig,
    pub compose: ComposeConfig,
    pub partner: PartnerConfig,
}

/// Join form rules and simulated latency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    pub min_username_len: usize,
    pub min_room_code_len: usize,
    pub delay_ms: u64,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            min_username_len: 3,
            min_room_code_len: 4,
            delay_ms: 1000,
        }
    }
}

/// Message composer limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    pub max_message_len: usize,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            max_message_len: 500,
        }
    }
}

/// Simulated partner behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartnerConfig {
    pub name: String,
    pub join_delay_ms: u64,
    pub reply_delay_min_ms: u64,
    pub reply_delay_max_ms: u64,
    /// Chance in [0, 1] that a reply carries `image_url`
    pub image_probability: f64,
    pub image_url: String,
    pub responses: Vec<String>,
}

impl Default for PartnerConfig {
    fn default() -> Self {
        Self {
            name: "Partner".to_string(),
            join_delay_ms: 1500,
            reply_delay_min_ms: 1000,
            reply_delay_max_ms: 3000,
            image_probability: 0.2,
            image_url: DEFAULT_IMAGE_URL.to_string(),
            responses: DEFAULT_RESPONSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ChatConfig {
    /// Parse and check a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: ChatConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; the file must exist
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load from `path` if given, else from the platform config dir.
    ///
    /// A missing file yields the defaults. A malformed one is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => {
                    debug!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load(&path)
    }

    /// `<config_dir>/parichat.toml`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "parichat", "parichat")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    fn validate(&self) -> Result<()> {
        if self.join.min_username_len == 0 || self.join.min_room_code_len == 0 {
            return Err(Error::Config(
                "minimum username and room code lengths must be at least 1".to_string(),
            ));
        }

        if self.compose.max_message_len == 0 {
            return Err(Error::Config("max_message_len must be at least 1".to_string()));
        }

        let p = &self.partner;
        if p.name.trim().is_empty() {
            return Err(Error::Config("partner name must not be empty".to_string()));
        }
        if p.reply_delay_min_ms > p.reply_delay_max_ms {
            return Err(Error::Config(format!(
                "reply_delay_min_ms ({}) exceeds reply_delay_max_ms ({})",
                p.reply_delay_min_ms, p.reply_delay_max_ms
            )));
        }
        if !(0.0..=1.0).contains(&p.image_probability) {
            return Err(Error::Config(format!(
                "image_probability must be within 0..=1, got {}",
                p.image_probability
            )));
        }

        Ok(())
    }
}
