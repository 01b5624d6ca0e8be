//! Per-team rate limiting, validation, and logging of transmissions.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::classify::{Classifier, MessageType};
use crate::core::{GameConfig, Millis, TeamId, TeamMap};

/// An accepted transmission. Immutable once logged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Position in the global log.
    pub seq: u64,
    pub team: TeamId,
    pub text: String,
    pub at: Millis,
    pub kind: MessageType,
}

/// Why a transmission was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// Nothing but whitespace.
    Empty,
    TooLong { len: usize, cap: usize },
    QuotaExceeded { quota: u32 },
    /// Sent again before `retry_at`.
    Cooldown { retry_at: Millis },
}

/// Gate decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accepted {
        kind: MessageType,
        seq: u64,
        /// Tokens this team had never used before.
        new_tokens: usize,
    },
    Rejected(Rejection),
}

impl Verdict {
    /// Was the transmission accepted?
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }
}

/// One team's transmission record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub accepted: u32,
    pub rejected: u32,
    pub last_accepted: Option<Millis>,
    /// Token -> number of accepted messages using it.
    pub vocabulary: OrdMap<String, u32>,
    pub log: Vector<Message>,
}

/// Split text into vocabulary tokens: upper-cased alphanumeric runs.
pub fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
}

/// Rate limiter, validator, and classifier for inbound transmissions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransmissionGate {
    cap: usize,
    quota: u32,
    cooldown: Millis,
    #[serde(skip)]
    classifier: Classifier,
    channels: TeamMap<Channel>,
    log: Vector<Message>,
}

impl TransmissionGate {
    /// Gate with explicit limits and the default classifier.
    #[must_use]
    pub fn new(cap: usize, quota: u32, cooldown: Millis) -> Self {
        Self {
            cap,
            quota,
            cooldown,
            classifier: Classifier::default(),
            channels: TeamMap::with_default(),
            log: Vector::new(),
        }
    }

    /// Gate with limits taken from a configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.message_cap, config.transmission_quota, config.cooldown)
    }

    /// Replace the classifier (builder pattern).
    #[must_use]
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Check, classify, and log a transmission.
    pub fn submit(&mut self, team: TeamId, text: &str, now: Millis) -> Verdict {
        if let Err(rejection) = self.check(team, text, now) {
            self.channels[team].rejected += 1;
            return Verdict::Rejected(rejection);
        }

        let kind = self.classifier.classify(text);
        let seq = self.log.len() as u64;
        let message = Message {
            seq,
            team,
            text: text.to_owned(),
            at: now,
            kind,
        };

        let channel = &mut self.channels[team];
        let mut new_tokens = 0;
        for token in tokens(text) {
            let count = channel.vocabulary.entry(token).or_insert(0);
            if *count == 0 {
                new_tokens += 1;
            }
            *count += 1;
        }
        channel.accepted += 1;
        channel.last_accepted = Some(now);
        channel.log.push_back(message.clone());
        self.log.push_back(message);

        Verdict::Accepted { kind, seq, new_tokens }
    }

    fn check(&self, team: TeamId, text: &str, now: Millis) -> Result<(), Rejection> {
        if text.trim().is_empty() {
            return Err(Rejection::Empty);
        }
        let len = text.chars().count();
        if len > self.cap {
            return Err(Rejection::TooLong { len, cap: self.cap });
        }
        let channel = &self.channels[team];
        if channel.accepted >= self.quota {
            return Err(Rejection::QuotaExceeded { quota: self.quota });
        }
        if let Some(last) = channel.last_accepted {
            if now.saturating_sub(last) < self.cooldown {
                return Err(Rejection::Cooldown {
                    retry_at: last + self.cooldown,
                });
            }
        }
        Ok(())
    }

    /// A team's record.
    #[must_use]
    pub fn channel(&self, team: TeamId) -> &Channel {
        &self.channels[team]
    }

    /// Every team's record.
    #[must_use]
    pub fn channels(&self) -> &TeamMap<Channel> {
        &self.channels
    }

    /// Global log of accepted transmissions, in acceptance order.
    #[must_use]
    pub fn log(&self) -> &Vector<Message> {
        &self.log
    }

    /// The last `n` accepted transmissions.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Message> {
        self.log.iter().skip(self.log.len().saturating_sub(n))
    }

    /// Distinct tokens across all teams' vocabularies (counted per team).
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.channels.values().map(|c| c.vocabulary.len()).sum()
    }

    /// Transmissions `team` may still send.
    #[must_use]
    pub fn remaining_quota(&self, team: TeamId) -> u32 {
        self.quota.saturating_sub(self.channels[team].accepted)
    }
}
