//! Engine error types.
//!
//! Rejected transmissions and denied resource requests are ordinary
//! outcomes, not errors. What remains here is fatal to the call that
//! raised it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::ConfigError;
use super::location::LocationId;

/// Errors surfaced by the game controller.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GameError {
    /// Startup parameters were rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A broken precondition was detected mid-tick; the tick was discarded.
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Internal consistency failures. Each one signals a bug elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum InvariantViolation {
    #[error("rescue of {requested} at {location} exceeds {remaining} remaining victims")]
    NegativeVictims {
        location: LocationId,
        remaining: u32,
        requested: u32,
    },

    #[error("rescue at {0} credited no team")]
    UncreditedRescue(LocationId),

    #[error("{rescued} rescued + {remaining} remaining != {expected} victims on record")]
    VictimsUnaccounted {
        rescued: u64,
        remaining: u64,
        expected: u64,
    },

    #[error("adding {count} victims at {location} overflows the victim count")]
    VictimOverflow { location: LocationId, count: u32 },
}
