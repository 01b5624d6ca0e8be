//! Events pushed to observers.
//!
//! The controller appends to an outbox as it works; the transport drains it
//! with `GameController::drain_events` or through a `TickDriver`. Events
//! from a tick that was aborted are discarded along with the tick.

use serde::{Deserialize, Serialize};

use super::report::Outcome;
use super::snapshot::Snapshot;
use super::state::CoordinationEvent;
use crate::core::{InvariantViolation, LocationId, Millis, TeamId};
use crate::gate::{Message, Rejection};
use crate::ledger::{DenyReason, ResourceId};
use crate::rescue::RescueRecord;

/// Something observers should hear about.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    MessageAccepted(Message),
    MessageRejected {
        team: TeamId,
        reason: Rejection,
    },
    ResourceGranted {
        team: TeamId,
        resource: ResourceId,
        location: LocationId,
        until: Millis,
    },
    ResourceDenied {
        team: TeamId,
        resource: ResourceId,
        reason: DenyReason,
    },
    ResourceReleased {
        team: TeamId,
        resource: ResourceId,
        /// Released because its usage window ran out.
        expired: bool,
    },
    /// Gas and stability after an escalation step.
    Escalated { gas: u8, stability: u8 },
    Flash { at: Millis, label: String },
    Rescue { at: Millis, record: RescueRecord },
    Coordination(CoordinationEvent),
    FireContained { at: Millis, location: LocationId },
    Status(Box<Snapshot>),
    Terminal { outcome: Outcome, score: f64 },
    /// A tick failed an internal check; the driver stopped ticking.
    Aborted { at: Millis, reason: InvariantViolation },
}

impl GameEvent {
    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::MessageAccepted(_) => "message_accepted",
            GameEvent::MessageRejected { .. } => "message_rejected",
            GameEvent::ResourceGranted { .. } => "resource_granted",
            GameEvent::ResourceDenied { .. } => "resource_denied",
            GameEvent::ResourceReleased { .. } => "resource_released",
            GameEvent::Escalated { .. } => "escalated",
            GameEvent::Flash { .. } => "flash",
            GameEvent::Rescue { .. } => "rescue",
            GameEvent::Coordination(_) => "coordination",
            GameEvent::FireContained { .. } => "fire_contained",
            GameEvent::Status(_) => "status",
            GameEvent::Terminal { .. } => "terminal",
            GameEvent::Aborted { .. } => "aborted",
        }
    }

    /// Does this event end the stream?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::Terminal { .. } | GameEvent::Aborted { .. })
    }
}
