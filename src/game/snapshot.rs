//! Read-only views of the exercise.

use serde::{Deserialize, Serialize};

use super::report::Outcome;
use super::state::GameState;
use crate::core::{GameConfig, Millis, TeamId, TeamMap};
use crate::crisis::Location;
use crate::gate::Message;
use crate::ledger::{Resource, ResourceId};
use crate::scoring::{Penalties, ScoreBreakdown};

/// Transmissions included in a snapshot's recent history.
pub const RECENT_MESSAGES: usize = 5;

/// One team as seen in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub saved: u32,
    pub fire_contained: u32,
    pub evacuated: u32,
    pub accepted: u32,
    pub rejected: u32,
    pub remaining_quota: u32,
    pub vocabulary_size: usize,
    /// Resources this team holds.
    pub holding: Vec<ResourceId>,
}

/// Point-in-time copy of everything observers may see.
///
/// Taking a snapshot never changes the game, so two snapshots with no
/// mutation in between compare equal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub clock: Millis,
    pub time_remaining: Millis,
    pub gas_pressure: u8,
    pub stability: u8,
    pub locations: Vec<Location>,
    pub resources: Vec<Resource>,
    pub teams: TeamMap<TeamSnapshot>,
    pub initial_victims: u32,
    pub rescued: u32,
    pub remaining_victims: u32,
    pub coordination_events: usize,
    pub flashes_remaining: usize,
    /// Most recent accepted transmissions, oldest first.
    pub recent_messages: Vec<Message>,
    pub score: ScoreBreakdown,
    pub outcome: Option<Outcome>,
}

impl Snapshot {
    /// Capture `state`.
    #[must_use]
    pub fn capture(state: &GameState, config: &GameConfig) -> Self {
        let crisis = &state.crisis;
        let gate = &state.gate;

        let teams = TeamMap::new(|team: TeamId| {
            let stats = &state.teams[team];
            let channel = gate.channel(team);
            TeamSnapshot {
                saved: stats.saved,
                fire_contained: stats.fire_contained,
                evacuated: stats.evacuated,
                accepted: channel.accepted,
                rejected: channel.rejected,
                remaining_quota: gate.remaining_quota(team),
                vocabulary_size: channel.vocabulary.len(),
                holding: state.ledger.held_by(team).map(|r| r.id).collect(),
            }
        });

        Self {
            clock: state.clock,
            time_remaining: config.duration.saturating_sub(state.clock),
            gas_pressure: crisis.gas_pressure,
            stability: crisis.stability,
            locations: crisis.locations().copied().collect(),
            resources: state.ledger.iter().cloned().collect(),
            teams,
            initial_victims: crisis.initial_victims,
            rescued: crisis.rescued,
            remaining_victims: crisis.remaining_victims(),
            coordination_events: state.coordination.len(),
            flashes_remaining: state.flashes.remaining(),
            recent_messages: gate.recent(RECENT_MESSAGES).cloned().collect(),
            score: ScoreBreakdown::compute(&state.score_inputs(), &Penalties::from_config(config)),
            outcome: state.outcome,
        }
    }

    /// Locations that still have victims.
    pub fn victims(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter().filter(|l| l.victims > 0)
    }

    /// Locations on fire.
    pub fn fires(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter().filter(|l| l.fire)
    }
}
