//! Game controller and everything it exposes to collaborators.
//!
//! ## Surface
//!
//! - [`GameController`]: start, transmit, tick, snapshot, end
//! - [`GameEvent`]: what observers are told, drained from the controller
//! - [`Snapshot`] and [`Briefing`]: read-only views
//! - [`Report`]: the exported end-of-exercise account
//! - [`SharedGame`] and [`TickDriver`]: mutex-guarded sharing and a
//!   background tick timer

mod briefing;
mod controller;
mod events;
mod report;
mod shared;
mod snapshot;
mod state;

pub use briefing::Briefing;
pub use controller::{GameController, LedgerOutcome, SubmitOutcome, TickOutcome};
pub use events::GameEvent;
pub use report::{Efficiency, Outcome, Report, ReportError, TeamPerformance};
pub use shared::{SharedGame, TickDriver};
pub use snapshot::{Snapshot, TeamSnapshot, RECENT_MESSAGES};
pub use state::{CoordinationEvent, GameState, TeamStats};
