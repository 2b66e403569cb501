//! Partner behavior
//!
//! The seam between the chat surface and whatever produces incoming messages.
//! The surface reports a cue, the behavior answers with at most one reply and
//! the delay after which it should land. Scheduling is the caller's job.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::PartnerConfig;
use crate::models::Message;

/// Something the partner can react to
#[derive(Debug, Clone, Copy)]
pub enum Cue<'a> {
    /// The local user entered the room
    Joined { username: &'a str },
    /// A message was appended to the log
    MessageSent(&'a Message),
}

/// A message the partner wants delivered after `delay`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub delay: Duration,
    pub sender: String,
    pub text: Option<String>,
    pub image_url: Option<String>,
}

impl Reply {
    /// Stamp the reply into a message at delivery time
    pub fn into_message(self) -> Message {
        Message::new(self.sender, self.text, self.image_url)
    }
}

/// Trait for partner implementations
pub trait PartnerBehavior: Send {
    /// Given a cue and the current log, produce zero or one reply
    fn react(&mut self, cue: Cue<'_>, log: &[Message]) -> Option<Reply>;
}

/// Local stand-in for a remote peer: a greeting on join and a random canned
/// line after each message from someone else.
pub struct CannedPartner<R = StdRng> {
    config: PartnerConfig,
    rng: R,
}

impl CannedPartner<StdRng> {
    pub fn new(config: PartnerConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic partner for tests and demos
    pub fn seeded(config: PartnerConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> CannedPartner<R> {
    pub fn with_rng(config: PartnerConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    fn greeting(&self, username: &str) -> Reply {
        Reply {
            delay: Duration::from_millis(self.config.join_delay_ms),
            sender: self.config.name.clone(),
            text: Some(format!(
                "Hey {}! Welcome to our private chat room.",
                username
            )),
            image_url: None,
        }
    }

    fn canned_reply(&mut self) -> Option<Reply> {
        let text = self.config.responses.choose(&mut self.rng)?.clone();

        let min = self.config.reply_delay_min_ms;
        let max = self.config.reply_delay_max_ms;
        let delay_ms = if min < max {
            self.rng.gen_range(min..max)
        } else {
            min
        };

        let p = self.config.image_probability.clamp(0.0, 1.0);
        let image_url = if self.rng.gen_bool(p) {
            Some(self.config.image_url.clone())
        } else {
            None
        };

        Some(Reply {
            delay: Duration::from_millis(delay_ms),
            sender: self.config.name.clone(),
            text: Some(text),
            image_url,
        })
    }
}

impl<R: Rng + Send> PartnerBehavior for CannedPartner<R> {
    fn react(&mut self, cue: Cue<'_>, log: &[Message]) -> Option<Reply> {
        let reply = match cue {
            Cue::Joined { username } => Some(self.greeting(username)),
            // Never answer our own lines
            Cue::MessageSent(msg) if msg.is_from(&self.config.name) => None,
            Cue::MessageSent(_) => self.canned_reply(),
        };

        if let Some(r) = &reply {
            debug!(
                partner = %self.config.name,
                delay_ms = r.delay.as_millis() as u64,
                log_len = log.len(),
                has_image = r.image_url.is_some(),
                "Partner scheduled reply"
            );
        }

        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partner(seed: u64) -> CannedPartner {
        CannedPartner::seeded(PartnerConfig::default(), seed)
    }

    #[test]
    fn test_greeting_on_join() {
        let mut p = partner(1);
        let reply = p.react(Cue::Joined { username: "alice" }, &[]).unwrap();

        assert_eq!(reply.sender, "Partner");
        assert_eq!(
            reply.text.as_deref(),
            Some("Hey alice! Welcome to our private chat room.")
        );
        assert_eq!(reply.delay, Duration::from_millis(1500));
        assert!(reply.image_url.is_none());
    }

    #[test]
    fn test_reply_is_canned_and_in_delay_window() {
        let config = PartnerConfig::default();
        let mut p = partner(7);
        let sent = Message::text("alice", "hi");

        for _ in 0..50 {
            let reply = p.react(Cue::MessageSent(&sent), std::slice::from_ref(&sent)).unwrap();
            let text = reply.text.unwrap();
            assert!(config.responses.contains(&text));
            assert!(reply.delay >= Duration::from_millis(1000));
            assert!(reply.delay < Duration::from_millis(3000));
            if let Some(url) = reply.image_url {
                assert_eq!(url, config.image_url);
            }
        }
    }

    #[test]
    fn test_ignores_own_messages() {
        let mut p = partner(3);
        let own = Message::text("Partner", "Hey there!");
        assert!(p.react(Cue::MessageSent(&own), &[]).is_none());
    }

    #[test]
    fn test_image_probability_bounds() {
        let sent = Message::text("alice", "hi");

        let mut always = CannedPartner::seeded(
            PartnerConfig {
                image_probability: 1.0,
                ..PartnerConfig::default()
            },
            11,
        );
        let reply = always.react(Cue::MessageSent(&sent), &[]).unwrap();
        assert!(reply.image_url.is_some());

        let mut never = CannedPartner::seeded(
            PartnerConfig {
                image_probability: 0.0,
                ..PartnerConfig::default()
            },
            11,
        );
        let reply = never.react(Cue::MessageSent(&sent), &[]).unwrap();
        assert!(reply.image_url.is_none());
    }

    #[test]
    fn test_fixed_delay_and_empty_table() {
        let sent = Message::text("alice", "hi");
        let mut fixed = CannedPartner::seeded(
            PartnerConfig {
                reply_delay_min_ms: 200,
                reply_delay_max_ms: 200,
                ..PartnerConfig::default()
            },
            5,
        );
        assert_eq!(
            fixed.react(Cue::MessageSent(&sent), &[]).unwrap().delay,
            Duration::from_millis(200)
        );

        let mut silent = CannedPartner::seeded(
            PartnerConfig {
                responses: Vec::new(),
                ..PartnerConfig::default()
            },
            5,
        );
        assert!(silent.react(Cue::MessageSent(&sent), &[]).is_none());
    }

    #[test]
    fn test_same_seed_same_replies() {
        let sent = Message::text("alice", "hi");
        let mut a = partner(42);
        let mut b = partner(42);
        for _ in 0..10 {
            assert_eq!(
                a.react(Cue::MessageSent(&sent), &[]),
                b.react(Cue::MessageSent(&sent), &[])
            );
        }
    }
}
