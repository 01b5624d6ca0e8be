//! # crisis-comms
//!
//! Deterministic core of a three-team crisis-response exercise. FIRE,
//! MEDICAL and POLICE share a handful of scarce resources, talk over a
//! rate-limited channel, and try to get victims out of a failing building
//! before time runs out.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: simulated time advances only on `tick()`. The only
//!    randomness is an optional seeded shuffle of the flash script.
//!
//! 2. **One Owner**: all state lives in a single `GameState` owned by the
//!    `GameController`. Collaborators see snapshots and events.
//!
//! 3. **Atomic Ticks**: a tick runs on a persistent-structure clone and is
//!    committed whole or not at all.
//!
//! ## Modules
//!
//! - `core`: teams, locations, configuration, RNG, errors
//! - `ledger`: exclusive resource ownership
//! - `crisis`: hazards, victims, flash script, scheduler
//! - `gate`: transmission validation, classification, directives
//! - `rescue`: per-tick rescue eligibility
//! - `scoring`: score breakdown
//! - `game`: controller, events, snapshots, report, threading
//!
//! ## Example
//!
//! ```
//! use crisis_comms::{GameConfig, GameController, LocationId, ResourceId, TeamId};
//!
//! let mut game = GameController::start(GameConfig::default()).unwrap();
//! game.submit_message(TeamId::Fire, "L→F3?");
//! game.request_resource(TeamId::Medical, ResourceId::Ambulance1, LocationId::Floor3);
//! game.tick().unwrap();
//!
//! assert_eq!(game.snapshot().rescued, 2);
//! ```

pub mod core;
pub mod ledger;
pub mod crisis;
pub mod gate;
pub mod rescue;
pub mod scoring;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    secs, AccessClass, ConfigError, GameConfig, GameError, GameRng, HighAccessRule,
    InvariantViolation, LocationId, Millis, Priority, SiteSetup, TeamId, TeamMap,
};

pub use crate::ledger::{DenyReason, Ledger, ReleaseOutcome, RequestOutcome, Resource, ResourceId};

pub use crate::crisis::{CrisisState, FlashEffect, FlashEvent, FlashPlan, FlashScript, Schedule};

pub use crate::gate::{Classifier, Message, MessageType, Rejection, TransmissionGate, Verdict};

pub use crate::rescue::{RescueEvaluator, RescueRecord};

pub use crate::scoring::{Penalties, ScoreBreakdown, ScoreInputs};

pub use crate::game::{
    Briefing, GameController, GameEvent, GameState, LedgerOutcome, Outcome, Report, SharedGame,
    Snapshot, SubmitOutcome, TickDriver, TickOutcome,
};
