//! Per-tick rescue eligibility and execution.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{AccessClass, GameConfig, HighAccessRule, InvariantViolation, LocationId, TeamId};
use crate::crisis::CrisisState;
use crate::ledger::{Ledger, ResourceId};

/// Victims brought out of one location on one tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescueRecord {
    pub location: LocationId,
    pub count: u32,
    /// Distinct teams sharing the credit, in canonical order.
    pub credited: SmallVec<[TeamId; 3]>,
}

impl RescueRecord {
    /// Was this a joint operation between teams?
    #[must_use]
    pub fn is_coordinated(&self) -> bool {
        self.credited.len() >= 2
    }

    /// Exterior rescues count as evacuations for police.
    #[must_use]
    pub fn is_evacuation(&self) -> bool {
        self.location.access() == AccessClass::Exterior
    }
}

/// Everything the evaluator changed on one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RescueReport {
    pub rescues: SmallVec<[RescueRecord; 4]>,
    /// Fires put out by the ladder crew.
    pub contained: SmallVec<[LocationId; 2]>,
}

/// Decides which locations can be rescued from this tick and applies it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RescueEvaluator {
    cap: u32,
    rule: HighAccessRule,
}

impl RescueEvaluator {
    #[must_use]
    pub fn new(cap: u32, rule: HighAccessRule) -> Self {
        Self { cap, rule }
    }

    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.rescue_cap, config.high_access_rule)
    }

    /// Can victims at `location` be reached with the current deployment?
    #[must_use]
    pub fn eligible(&self, crisis: &CrisisState, ledger: &Ledger, location: LocationId) -> bool {
        match location.access() {
            AccessClass::HighAccess => {
                let ladder = ledger.get(ResourceId::Ladder).deployed_at(location);
                match self.rule {
                    HighAccessRule::LadderAndAmbulance => ladder && ledger.ambulance_at(location),
                    HighAccessRule::LadderOnly => ladder,
                }
            }
            AccessClass::Standard => ledger.ambulance_at(location),
            AccessClass::Exterior => {
                ledger.ambulance_at(location)
                    && ledger.get(ResourceId::Route).holder == Some(TeamId::Police)
                    && !crisis.location(location).blocked
            }
        }
    }

    /// Teams credited for a rescue at `location`.
    fn credited(ledger: &Ledger, location: LocationId) -> SmallVec<[TeamId; 3]> {
        let mut teams: SmallVec<[TeamId; 3]> =
            ledger.deployed_at(location).filter_map(|r| r.holder).collect();
        if location.access() == AccessClass::Exterior {
            teams.extend(ledger.get(ResourceId::Route).holder);
        }
        teams.sort_unstable();
        teams.dedup();
        teams
    }

    /// Run rescues and suppression for one tick.
    ///
    /// Locations are visited in fixed order. On error the crisis may be
    /// partly modified; callers run this on a scratch copy.
    pub fn evaluate(
        &self,
        crisis: &mut CrisisState,
        ledger: &Ledger,
    ) -> Result<RescueReport, InvariantViolation> {
        let mut report = RescueReport::default();

        for location in LocationId::all() {
            let victims = crisis.location(location).victims;
            if victims == 0 || !self.eligible(crisis, ledger, location) {
                continue;
            }

            let credited = Self::credited(ledger, location);
            if credited.is_empty() {
                return Err(InvariantViolation::UncreditedRescue(location));
            }

            let count = victims.min(self.cap);
            crisis.rescue(location, count)?;
            report.rescues.push(RescueRecord {
                location,
                count,
                credited,
            });
        }

        let ladder = ledger.get(ResourceId::Ladder);
        if ladder.holder == Some(TeamId::Fire) {
            if let Some(location) = ladder.location {
                if crisis.extinguish(location) {
                    report.contained.push(location);
                }
            }
        }

        Ok(report)
    }
}
