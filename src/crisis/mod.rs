//! Crisis situation and the scheduler that evolves it.
//!
//! - [`CrisisState`]: hazard levels and per-location victims, fires, blockages
//! - [`FlashScript`]: the finite, ordered list of scripted bulletins
//! - [`Schedule`]: which boundaries a tick crosses

mod flash;
mod schedule;
mod state;

pub use flash::{standard_flashes, FlashEffect, FlashEvent, FlashPlan, FlashScript};
pub use schedule::{crossings, Schedule, TickPlan};
pub use state::{CrisisState, Location, HAZARD_MAX};
