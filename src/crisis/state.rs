//! Hazard levels and per-location victims, fires, and blockages.

use serde::{Deserialize, Serialize};

use crate::core::{InvariantViolation, LocationId, Millis, SiteSetup};

/// Maximum gas pressure and stability.
pub const HAZARD_MAX: u8 = 10;

/// State of one location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    /// Victims still trapped here.
    pub victims: u32,
    /// Access route blocked.
    pub blocked: bool,
    /// Fire present.
    pub fire: bool,
}

/// Crisis situation: hazards and site.
///
/// Gas pressure only rises (capped at 10) and stability only falls
/// (floored at the configured minimum). Victim counts only fall through
/// [`CrisisState::rescue`]; flash events may add new victims, which are
/// tracked separately in `injected`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisState {
    pub gas_pressure: u8,
    pub stability: u8,
    pub stability_floor: u8,
    /// Stability at the start, for damage accounting.
    pub initial_stability: u8,
    /// Victims on site when the exercise began.
    pub initial_victims: u32,
    /// Victims added by flash events since.
    pub injected_victims: u32,
    /// Victims rescued so far, across all teams.
    pub rescued: u32,
    pub elapsed: Millis,
    locations: [Location; 8],
}

impl CrisisState {
    /// Build the opening situation.
    #[must_use]
    pub fn new(site: &SiteSetup, gas: u8, stability: u8, floor: u8) -> Self {
        let mut locations = LocationId::ALL.map(|id| Location {
            id,
            victims: 0,
            blocked: false,
            fire: false,
        });
        // Totals are bounded by `GameConfig::validate`.
        for &(loc, count) in &site.victims {
            let victims = &mut locations[slot(loc)].victims;
            *victims = victims.saturating_add(count);
        }
        for &loc in &site.fires {
            locations[slot(loc)].fire = true;
        }
        for &loc in &site.blocked {
            locations[slot(loc)].blocked = true;
        }

        let stability = stability.min(HAZARD_MAX).max(floor);
        Self {
            gas_pressure: gas.min(HAZARD_MAX),
            stability,
            stability_floor: floor,
            initial_stability: stability,
            initial_victims: locations.iter().fold(0, |acc, l| acc.saturating_add(l.victims)),
            injected_victims: 0,
            rescued: 0,
            elapsed: 0,
            locations,
        }
    }

    /// Look up a location.
    #[must_use]
    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[slot(id)]
    }

    fn location_mut(&mut self, id: LocationId) -> &mut Location {
        &mut self.locations[slot(id)]
    }

    /// Iterate over locations in evaluation order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// Victims still on site.
    #[must_use]
    pub fn remaining_victims(&self) -> u32 {
        self.locations.iter().fold(0, |acc, l| acc.saturating_add(l.victims))
    }

    /// Locations currently burning.
    pub fn burning(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.locations.iter().filter(|l| l.fire).map(|l| l.id)
    }

    /// No fire anywhere on site.
    #[must_use]
    pub fn hazards_nominal(&self) -> bool {
        self.burning().next().is_none()
    }

    /// One escalation step: gas +1, stability -1, within bounds.
    pub fn escalate(&mut self) {
        self.surge_gas(1);
        self.damage_structure(1);
    }

    /// Raise gas pressure, capped at 10.
    pub fn surge_gas(&mut self, amount: u8) {
        self.gas_pressure = self.gas_pressure.saturating_add(amount).min(HAZARD_MAX);
    }

    /// Lower stability, floored at the configured minimum.
    pub fn damage_structure(&mut self, amount: u8) {
        self.stability = self.stability.saturating_sub(amount).max(self.stability_floor);
    }

    /// Newly discovered victims.
    ///
    /// Refused if the site total would no longer fit in a `u32`.
    pub fn add_victims(&mut self, id: LocationId, count: u32) -> Result<(), InvariantViolation> {
        let overflow = InvariantViolation::VictimOverflow { location: id, count };
        let injected = self.injected_victims.checked_add(count).ok_or(overflow.clone())?;
        self.initial_victims.checked_add(injected).ok_or(overflow.clone())?;
        let victims = self.location(id).victims.checked_add(count).ok_or(overflow)?;

        self.location_mut(id).victims = victims;
        self.injected_victims = injected;
        Ok(())
    }

    /// Set a location on fire.
    pub fn ignite(&mut self, id: LocationId) {
        self.location_mut(id).fire = true;
    }

    /// Put out a fire. Returns `false` if nothing was burning.
    pub fn extinguish(&mut self, id: LocationId) -> bool {
        std::mem::replace(&mut self.location_mut(id).fire, false)
    }

    /// Block or clear a location's access route.
    pub fn set_blocked(&mut self, id: LocationId, blocked: bool) {
        self.location_mut(id).blocked = blocked;
    }

    /// Remove `count` rescued victims from a location.
    ///
    /// Asking for more than remain is a defect in the caller.
    pub fn rescue(&mut self, id: LocationId, count: u32) -> Result<(), InvariantViolation> {
        let location = self.location_mut(id);
        if count > location.victims {
            return Err(InvariantViolation::NegativeVictims {
                location: id,
                remaining: location.victims,
                requested: count,
            });
        }
        location.victims -= count;
        self.rescued = self.rescued.saturating_add(count);
        Ok(())
    }

    /// Every victim ever on site is either rescued or still there.
    pub fn check_conservation(&self) -> Result<(), InvariantViolation> {
        let rescued = u64::from(self.rescued);
        let remaining: u64 = self.locations.iter().map(|l| u64::from(l.victims)).sum();
        let expected = u64::from(self.initial_victims) + u64::from(self.injected_victims);
        if rescued + remaining != expected {
            return Err(InvariantViolation::VictimsUnaccounted {
                rescued,
                remaining,
                expected,
            });
        }
        Ok(())
    }
}

fn slot(id: LocationId) -> usize {
    // LocationId::ALL is declared in discriminant order.
    id as usize
}
