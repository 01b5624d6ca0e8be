//! The game controller: sole owner and mutator of an exercise's state.
//!
//! ## Atomicity
//!
//! `submit_message` has no failure path and mutates in place. `tick` runs on
//! a clone of the state and swaps it in only when every step succeeded, so
//! an invariant violation leaves the exercise exactly as it was. Events are
//! buffered the same way.
//!
//! ## After the end
//!
//! Once an outcome is set, every mutating call is a no-op that reports the
//! outcome.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::briefing::Briefing;
use super::events::GameEvent;
use super::report::{Outcome, Report};
use super::snapshot::Snapshot;
use super::state::GameState;
use crate::core::{ConfigError, GameConfig, GameError, InvariantViolation, LocationId, Millis, TeamId};
use crate::crisis::Schedule;
use crate::gate::{directive, Directive, MessageType, Rejection, ResourceHint, Verdict};
use crate::ledger::{ReleaseOutcome, RequestOutcome, ResourceId};
use crate::rescue::RescueEvaluator;
use crate::scoring::{Penalties, ScoreBreakdown};

/// Result of a ledger command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerOutcome {
    Request(RequestOutcome),
    Release(ReleaseOutcome),
    /// The exercise is over; nothing changed.
    Finished(Outcome),
}

/// Result of a transmission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    Accepted {
        kind: MessageType,
        seq: u64,
        /// Ledger effect of a resource directive in the text.
        directive: Option<LedgerOutcome>,
    },
    Rejected(Rejection),
    Finished(Outcome),
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

/// Result of a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// Still running at `now`.
    Running { now: Millis },
    Finished(Outcome),
}

impl TickOutcome {
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            TickOutcome::Running { .. } => None,
            TickOutcome::Finished(outcome) => Some(*outcome),
        }
    }
}

/// Owns one exercise and serializes every change to it.
#[derive(Clone, Debug)]
pub struct GameController {
    config: GameConfig,
    schedule: Schedule,
    evaluator: RescueEvaluator,
    state: GameState,
    outbox: Vec<GameEvent>,
}

impl GameController {
    /// Validate `config` and set up the opening state.
    pub fn start(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let state = GameState::new(&config);
        info!(
            "exercise started: {} victims, {} flashes scheduled, duration {} ms",
            state.crisis.initial_victims,
            state.flashes.remaining(),
            config.duration
        );

        Ok(Self {
            schedule: Schedule::from_config(&config),
            evaluator: RescueEvaluator::from_config(&config),
            state,
            outbox: Vec::new(),
            config,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The live state. Read-only.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn clock(&self) -> Millis {
        self.state.clock
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    // === Commands ===

    /// Pass a transmission through the gate and act on any directive in it.
    pub fn submit_message(&mut self, team: TeamId, text: &str) -> SubmitOutcome {
        if let Some(outcome) = self.state.outcome {
            return SubmitOutcome::Finished(outcome);
        }

        let now = self.state.clock;
        let (kind, seq) = match self.state.gate.submit(team, text, now) {
            Verdict::Accepted { kind, seq, .. } => (kind, seq),
            Verdict::Rejected(reason) => {
                debug!("{team} transmission rejected: {reason:?}");
                self.outbox.push(GameEvent::MessageRejected { team, reason });
                return SubmitOutcome::Rejected(reason);
            }
        };
        if let Some(message) = self.state.gate.log().back() {
            self.outbox.push(GameEvent::MessageAccepted(message.clone()));
        }

        let directive = match directive::parse(text) {
            Some(Directive::Request { resource, location }) if kind == MessageType::Request => {
                let id = self.resolve_request(resource);
                Some(LedgerOutcome::Request(self.grant(team, id, location)))
            }
            Some(Directive::Release { resource }) => {
                let id = self.resolve_release(team, resource);
                Some(LedgerOutcome::Release(self.give_back(team, id)))
            }
            _ => None,
        };

        SubmitOutcome::Accepted { kind, seq, directive }
    }

    /// Ask the ledger for a resource on behalf of a team.
    pub fn request_resource(
        &mut self,
        team: TeamId,
        resource: ResourceId,
        location: LocationId,
    ) -> LedgerOutcome {
        match self.state.outcome {
            Some(outcome) => LedgerOutcome::Finished(outcome),
            None => LedgerOutcome::Request(self.grant(team, resource, location)),
        }
    }

    /// Hand a resource back. Refused unless `team` holds it.
    pub fn release_resource(&mut self, team: TeamId, resource: ResourceId) -> LedgerOutcome {
        match self.state.outcome {
            Some(outcome) => LedgerOutcome::Finished(outcome),
            None => LedgerOutcome::Release(self.give_back(team, resource)),
        }
    }

    /// Advance simulated time by one tick interval.
    pub fn tick(&mut self) -> Result<TickOutcome, GameError> {
        if let Some(outcome) = self.state.outcome {
            return Ok(TickOutcome::Finished(outcome));
        }

        let mut next = self.state.clone();
        let mut events = Vec::new();
        match self.advance(&mut next, &mut events) {
            Ok(outcome) => {
                self.state = next;
                self.outbox.append(&mut events);
                Ok(outcome)
            }
            Err(violation) => {
                warn!("tick at {} ms aborted: {violation}", self.state.clock);
                Err(violation.into())
            }
        }
    }

    /// Read-only view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, &self.config)
    }

    /// Situation briefing for one team.
    #[must_use]
    pub fn briefing(&self, team: TeamId) -> Briefing {
        Briefing::new(team, self.snapshot(), self.config.message_cap)
    }

    /// Finish the exercise (if still running) and produce the report.
    pub fn end(&mut self) -> Report {
        let outcome = match self.state.outcome {
            Some(outcome) => outcome,
            None => {
                let outcome = Outcome::on_stop(&self.state, &self.config);
                self.finish(outcome);
                outcome
            }
        };
        Report::build(&self.state, &self.config, outcome)
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    // === Internals ===

    fn resolve_request(&self, hint: ResourceHint) -> ResourceId {
        match hint {
            ResourceHint::Exact(id) => id,
            // Falls back to the first ambulance so the denial says why.
            ResourceHint::AnyAmbulance => self
                .state
                .ledger
                .free_ambulance(self.state.clock)
                .unwrap_or(ResourceId::Ambulance1),
        }
    }

    fn resolve_release(&self, team: TeamId, hint: ResourceHint) -> ResourceId {
        match hint {
            ResourceHint::Exact(id) => id,
            ResourceHint::AnyAmbulance => ResourceId::AMBULANCES
                .into_iter()
                .find(|&id| self.state.ledger.get(id).holder == Some(team))
                .unwrap_or(ResourceId::Ambulance1),
        }
    }

    fn grant(&mut self, team: TeamId, resource: ResourceId, location: LocationId) -> RequestOutcome {
        let now = self.state.clock;
        let outcome = self
            .state
            .ledger
            .request(team, resource, location, now, self.config.usage_duration);

        match outcome {
            RequestOutcome::Granted { until, .. } => {
                debug!("{resource} granted to {team} at {location} until {until} ms");
                if resource == ResourceId::Route && team == TeamId::Police {
                    self.state.crisis.set_blocked(location, false);
                }
                self.outbox.push(GameEvent::ResourceGranted {
                    team,
                    resource,
                    location,
                    until,
                });
            }
            RequestOutcome::Denied { reason, .. } => {
                debug!("{resource} denied to {team}: {reason:?}");
                self.outbox.push(GameEvent::ResourceDenied { team, resource, reason });
            }
        }
        outcome
    }

    fn give_back(&mut self, team: TeamId, resource: ResourceId) -> ReleaseOutcome {
        let outcome = self.state.ledger.release_by(team, resource, self.state.clock);
        if let ReleaseOutcome::Released { .. } = outcome {
            debug!("{resource} released by {team}");
            self.outbox.push(GameEvent::ResourceReleased {
                team,
                resource,
                expired: false,
            });
        }
        outcome
    }

    fn advance(
        &self,
        state: &mut GameState,
        events: &mut Vec<GameEvent>,
    ) -> Result<TickOutcome, InvariantViolation> {
        let plan = self.schedule.plan(state.clock);
        let now = plan.now;
        state.clock = now;
        state.crisis.elapsed = now;

        if self.config.auto_release {
            for (resource, team) in state.ledger.expire(now) {
                debug!("{resource} usage by {team} expired");
                events.push(GameEvent::ResourceReleased {
                    team,
                    resource,
                    expired: true,
                });
            }
        }

        for _ in 0..plan.escalations {
            state.crisis.escalate();
            events.push(GameEvent::Escalated {
                gas: state.crisis.gas_pressure,
                stability: state.crisis.stability,
            });
        }

        for _ in 0..plan.flashes {
            let Some(flash) = state.flashes.next_flash() else {
                break;
            };
            debug!("{} at {now} ms", flash.label);
            flash.apply(&mut state.crisis, &mut state.ledger, now)?;
            events.push(GameEvent::Flash {
                at: now,
                label: flash.label,
            });
        }

        // Police holding the route keep it clear of new debris.
        let route = state.ledger.get(ResourceId::Route);
        if let (Some(TeamId::Police), Some(location)) = (route.holder, route.location) {
            if state.crisis.location(location).blocked {
                debug!("police route clears {location}");
                state.crisis.set_blocked(location, false);
            }
        }

        let report = self.evaluator.evaluate(&mut state.crisis, &state.ledger)?;
        state.crisis.check_conservation()?;
        for record in report.rescues {
            debug!(
                "{} rescued at {} (credit: {:?})",
                record.count, record.location, record.credited
            );
            if let Some(joint) = state.credit(&record) {
                events.push(GameEvent::Coordination(joint));
            }
            events.push(GameEvent::Rescue { at: now, record });
        }
        for location in report.contained {
            debug!("fire at {location} contained");
            state.teams[TeamId::Fire].fire_contained += 1;
            events.push(GameEvent::FireContained { at: now, location });
        }

        if plan.status_report {
            events.push(GameEvent::Status(Box::new(Snapshot::capture(state, &self.config))));
        }

        match Outcome::judge(state, &self.config) {
            Some(outcome) => {
                state.outcome = Some(outcome);
                let score = self.score(state).total;
                info!("exercise ended at {now} ms: {outcome} (score {score:.1})");
                events.push(GameEvent::Terminal { outcome, score });
                Ok(TickOutcome::Finished(outcome))
            }
            None => Ok(TickOutcome::Running { now }),
        }
    }

    fn score(&self, state: &GameState) -> ScoreBreakdown {
        ScoreBreakdown::compute(&state.score_inputs(), &Penalties::from_config(&self.config))
    }

    fn finish(&mut self, outcome: Outcome) {
        self.state.outcome = Some(outcome);
        let score = self.score(&self.state).total;
        info!("exercise stopped at {} ms: {outcome} (score {score:.1})", self.state.clock);
        self.outbox.push(GameEvent::Terminal { outcome, score });
    }
}
