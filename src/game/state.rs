//! Authoritative exercise state.
//!
//! ## Persistence
//!
//! Every large collection here is an `im` persistent structure, so cloning
//! a `GameState` is cheap. The controller relies on this: each tick runs on
//! a clone that only replaces the live state once the whole tick succeeded.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::report::Outcome;
use crate::core::{GameConfig, LocationId, Millis, TeamId, TeamMap};
use crate::crisis::{CrisisState, FlashScript};
use crate::gate::TransmissionGate;
use crate::ledger::Ledger;
use crate::rescue::RescueRecord;
use crate::scoring::ScoreInputs;

/// Outcome counters kept for each team.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    /// Victims rescued with this team's resources on scene. Shared credit.
    pub saved: u32,
    pub fire_contained: u32,
    pub evacuated: u32,
    /// Joint rescues this team took part in.
    pub coordination_events: u32,
}

/// A rescue that needed more than one team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinationEvent {
    pub at: Millis,
    pub location: LocationId,
    pub teams: SmallVec<[TeamId; 3]>,
    pub victims: u32,
}

/// Everything the controller owns about one exercise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Simulated time since start.
    pub clock: Millis,
    pub teams: TeamMap<TeamStats>,
    pub ledger: Ledger,
    pub crisis: CrisisState,
    pub flashes: FlashScript,
    pub gate: TransmissionGate,
    pub coordination: Vector<CoordinationEvent>,
    /// Rescue operations carried out, joint or not.
    pub rescue_operations: u32,
    /// Set once, when the exercise ends.
    pub outcome: Option<Outcome>,
}

impl GameState {
    /// Opening state for a (validated) configuration.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            clock: 0,
            teams: TeamMap::with_default(),
            ledger: Ledger::new(),
            crisis: CrisisState::new(
                &config.site,
                config.initial_gas,
                config.initial_stability,
                config.stability_floor,
            ),
            flashes: FlashScript::from_plan(&config.flashes),
            gate: TransmissionGate::from_config(config),
            coordination: Vector::new(),
            rescue_operations: 0,
            outcome: None,
        }
    }

    /// Has the exercise ended?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Book a rescue against the team counters.
    ///
    /// Returns the coordination event it produced, if any.
    pub fn credit(&mut self, record: &RescueRecord) -> Option<CoordinationEvent> {
        self.rescue_operations += 1;
        for &team in &record.credited {
            self.teams[team].saved += record.count;
        }
        if record.is_evacuation() {
            self.teams[TeamId::Police].evacuated += record.count;
        }
        if !record.is_coordinated() {
            return None;
        }

        for &team in &record.credited {
            self.teams[team].coordination_events += 1;
        }
        let event = CoordinationEvent {
            at: self.clock,
            location: record.location,
            teams: record.credited.clone(),
            victims: record.count,
        };
        self.coordination.push_back(event.clone());
        Some(event)
    }

    /// Counters feeding the scorer.
    #[must_use]
    pub fn score_inputs(&self) -> ScoreInputs {
        ScoreInputs {
            saved: self.crisis.rescued,
            fire_contained: self.teams.values().map(|t| t.fire_contained).sum(),
            evacuated: self.teams.values().map(|t| t.evacuated).sum(),
            coordination_events: self.coordination.len() as u32,
            vocab_tokens: self.gate.vocabulary_size() as u32,
            elapsed: self.clock,
            initial_stability: self.crisis.initial_stability,
            stability: self.crisis.stability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_credit_shared_and_coordinated() {
        let mut state = GameState::new(&GameConfig::default());
        let record = RescueRecord {
            location: LocationId::Floor3,
            count: 2,
            credited: smallvec![TeamId::Fire, TeamId::Medical],
        };

        let event = state.credit(&record).unwrap();

        assert_eq!(event.teams.as_slice(), &[TeamId::Fire, TeamId::Medical]);
        assert_eq!(state.teams[TeamId::Fire].saved, 2);
        assert_eq!(state.teams[TeamId::Medical].saved, 2);
        assert_eq!(state.teams[TeamId::Police].saved, 0);
        assert_eq!(state.teams[TeamId::Medical].coordination_events, 1);
        assert_eq!(state.coordination.len(), 1);
    }

    #[test]
    fn test_exterior_credit_counts_evacuation() {
        let mut state = GameState::new(&GameConfig::default());
        let record = RescueRecord {
            location: LocationId::Exterior,
            count: 1,
            credited: smallvec![TeamId::Police],
        };

        assert!(state.credit(&record).is_none());
        assert_eq!(state.teams[TeamId::Police].evacuated, 1);
        assert_eq!(state.rescue_operations, 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let state = GameState::new(&GameConfig::default());
        let mut scratch = state.clone();
        scratch.clock = 5_000;
        scratch.crisis.escalate();

        assert_eq!(state.clock, 0);
        assert_eq!(state.crisis.gas_pressure, 3);
    }
}
