//! Core engine types: teams, locations, configuration, RNG, errors.
//!
//! These are the leaves every other module builds on.

pub mod team;
pub mod location;
pub mod config;
pub mod rng;
pub mod error;

pub use team::{Priority, TeamId, TeamMap};
pub use location::{AccessClass, LocationId};
pub use config::{secs, ConfigError, GameConfig, HighAccessRule, Millis, SiteSetup};
pub use rng::GameRng;
pub use error::{GameError, InvariantViolation};
