//! Terminal outcomes and the exported end-of-exercise report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{CoordinationEvent, GameState};
use crate::core::{GameConfig, Millis, Priority, TeamId, TeamMap};
use crate::gate::{Message, MessageType};
use crate::scoring::{Penalties, ScoreBreakdown};

/// How an exercise ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Enough victims saved, or the site fully cleared.
    Success,
    /// Time ran out with at least one victim saved, short of the success
    /// fraction.
    TimeoutPartial,
    /// Time ran out with zero victims saved. A single rescue makes it
    /// `TimeoutPartial` instead.
    TimeoutFail,
}

impl Outcome {
    /// Decide the outcome of a state, or `None` if it should keep running.
    ///
    /// Success is checked before the clock, so a tick that both reaches the
    /// duration and meets the success threshold counts as a success.
    #[must_use]
    pub fn judge(state: &GameState, config: &GameConfig) -> Option<Self> {
        if Self::succeeded(state, config) {
            return Some(Outcome::Success);
        }
        (state.clock >= config.duration).then(|| Self::timeout(state))
    }

    /// Outcome of an exercise stopped early.
    #[must_use]
    pub fn on_stop(state: &GameState, config: &GameConfig) -> Self {
        if Self::succeeded(state, config) {
            Outcome::Success
        } else {
            Self::timeout(state)
        }
    }

    fn succeeded(state: &GameState, config: &GameConfig) -> bool {
        let crisis = &state.crisis;
        let threshold_met = crisis.initial_victims > 0
            && f64::from(crisis.rescued) / f64::from(crisis.initial_victims)
                >= config.success_fraction;
        let cleared = crisis.remaining_victims() == 0 && crisis.hazards_nominal();
        threshold_met || cleared
    }

    fn timeout(state: &GameState) -> Self {
        if state.crisis.rescued > 0 {
            Outcome::TimeoutPartial
        } else {
            Outcome::TimeoutFail
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Outcome::Success => "SUCCESS",
            Outcome::TimeoutPartial => "TIMEOUT_PARTIAL",
            Outcome::TimeoutFail => "TIMEOUT_FAIL",
        })
    }
}

/// One team's results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPerformance {
    pub priority: Priority,
    pub saved: u32,
    pub fire_contained: u32,
    pub evacuated: u32,
    pub coordination_events: u32,
    pub accepted: u32,
    pub rejected: u32,
    /// Every token the team used, alphabetical.
    pub vocabulary: Vec<String>,
}

/// Efficiency figures derived from the final state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Efficiency {
    /// Share of rescue operations that were joint.
    pub coordination_rate: f64,
    /// Elapsed seconds per accepted transmission.
    pub seconds_per_message: f64,
    /// Share of resource-time spent committed.
    pub resource_utilisation: f64,
    /// Share of transmissions classified as coordination chatter.
    pub coordination_chatter: f64,
}

/// Codec failure while exporting or importing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report codec failed: {0}")]
    Codec(#[from] bincode::Error),
}

/// Final account of an exercise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub outcome: Outcome,
    pub duration: Millis,
    pub score: ScoreBreakdown,
    pub initial_victims: u32,
    pub injected_victims: u32,
    pub rescued: u32,
    pub remaining_victims: u32,
    pub final_gas: u8,
    pub final_stability: u8,
    pub teams: TeamMap<TeamPerformance>,
    pub messages: Vec<Message>,
    pub coordination: Vec<CoordinationEvent>,
    pub efficiency: Efficiency,
}

impl Report {
    /// Build the report for a finished state.
    #[must_use]
    pub fn build(state: &GameState, config: &GameConfig, outcome: Outcome) -> Self {
        let crisis = &state.crisis;
        let gate = &state.gate;

        let teams = TeamMap::new(|team: TeamId| {
            let stats = &state.teams[team];
            let channel = gate.channel(team);
            TeamPerformance {
                priority: team.priority(),
                saved: stats.saved,
                fire_contained: stats.fire_contained,
                evacuated: stats.evacuated,
                coordination_events: stats.coordination_events,
                accepted: channel.accepted,
                rejected: channel.rejected,
                vocabulary: channel.vocabulary.keys().cloned().collect(),
            }
        });

        let messages: Vec<Message> = gate.log().iter().cloned().collect();
        let chatter = messages
            .iter()
            .filter(|m| m.kind == MessageType::Coordination)
            .count();
        let efficiency = Efficiency {
            coordination_rate: ratio(state.coordination.len(), state.rescue_operations as usize),
            seconds_per_message: state.clock as f64 / 1000.0 / messages.len().max(1) as f64,
            resource_utilisation: state.ledger.utilisation(state.clock),
            coordination_chatter: ratio(chatter, messages.len()),
        };

        Self {
            outcome,
            duration: state.clock,
            score: ScoreBreakdown::compute(&state.score_inputs(), &Penalties::from_config(config)),
            initial_victims: crisis.initial_victims,
            injected_victims: crisis.injected_victims,
            rescued: crisis.rescued,
            remaining_victims: crisis.remaining_victims(),
            final_gas: crisis.gas_pressure,
            final_stability: crisis.stability,
            teams,
            messages,
            coordination: state.coordination.iter().cloned().collect(),
            efficiency,
        }
    }

    /// Serialize to a compact binary form.
    pub fn encode(&self) -> Result<Vec<u8>, ReportError> {
        Ok(bincode::serialize(self)?)
    }

    /// Read a report produced by [`Report::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, ReportError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{secs, LocationId, SiteSetup};

    fn config() -> GameConfig {
        GameConfig::default().with_site(SiteSetup::empty().with_victims(LocationId::Lobby, 5))
    }

    #[test]
    fn test_judge_running_and_timeouts() {
        let config = config();
        let mut state = GameState::new(&config);

        assert_eq!(Outcome::judge(&state, &config), None);

        state.clock = config.duration;
        assert_eq!(Outcome::judge(&state, &config), Some(Outcome::TimeoutFail));

        state.crisis.rescue(LocationId::Lobby, 1).unwrap();
        assert_eq!(Outcome::judge(&state, &config), Some(Outcome::TimeoutPartial));
    }

    #[test]
    fn test_success_beats_timeout() {
        let config = config();
        let mut state = GameState::new(&config);
        state.clock = config.duration;
        state.crisis.rescue(LocationId::Lobby, 3).unwrap();

        assert_eq!(Outcome::judge(&state, &config), Some(Outcome::Success));
    }

    #[test]
    fn test_cleared_site_is_success() {
        let config = GameConfig::default().with_site(SiteSetup::empty());
        let state = GameState::new(&config);

        assert_eq!(Outcome::judge(&state, &config), Some(Outcome::Success));
    }

    #[test]
    fn test_on_stop() {
        let config = config();
        let state = GameState::new(&config);
        assert_eq!(Outcome::on_stop(&state, &config), Outcome::TimeoutFail);
    }

    #[test]
    fn test_display() {
        assert_eq!(Outcome::TimeoutPartial.to_string(), "TIMEOUT_PARTIAL");
    }

    #[test]
    fn test_report_codec() {
        let config = config();
        let mut state = GameState::new(&config);
        state.gate.submit(TeamId::Police, "EVAC LB", 0);
        state.clock = secs(10);

        let report = Report::build(&state, &config, Outcome::TimeoutFail);
        assert_eq!(report.teams[TeamId::Police].vocabulary, vec!["EVAC", "LB"]);
        assert_eq!(report.efficiency.coordination_chatter, 1.0);
        assert_eq!(report.efficiency.seconds_per_message, 10.0);

        let bytes = report.encode().unwrap();
        assert_eq!(Report::decode(&bytes).unwrap(), report);
        assert!(Report::decode(&bytes[..3]).is_err());
    }
}
