//! Scripted flash events.
//!
//! A flash is a crisis bulletin injected at a fixed cadence. The script is
//! a finite ordered list decided at startup; once it runs dry no further
//! flashes fire. Ordering may be shuffled from a seed, but never drawn
//! during play.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use super::state::CrisisState;
use crate::core::{GameRng, InvariantViolation, LocationId, Millis};
use crate::ledger::{Ledger, ResourceId};

/// One change a flash applies to the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashEffect {
    AddVictims { location: LocationId, count: u32 },
    Ignite { location: LocationId },
    Block { location: LocationId },
    Unblock { location: LocationId },
    GasSurge { amount: u8 },
    StructuralDamage { amount: u8 },
    /// Resource cannot be granted for `delay` from now.
    DelayResource { resource: ResourceId, delay: Millis },
}

impl FlashEffect {
    /// Apply this effect.
    pub fn apply(
        &self,
        crisis: &mut CrisisState,
        ledger: &mut Ledger,
        now: Millis,
    ) -> Result<(), InvariantViolation> {
        match *self {
            FlashEffect::AddVictims { location, count } => return crisis.add_victims(location, count),
            FlashEffect::Ignite { location } => crisis.ignite(location),
            FlashEffect::Block { location } => crisis.set_blocked(location, true),
            FlashEffect::Unblock { location } => crisis.set_blocked(location, false),
            FlashEffect::GasSurge { amount } => crisis.surge_gas(amount),
            FlashEffect::StructuralDamage { amount } => crisis.damage_structure(amount),
            FlashEffect::DelayResource { resource, delay } => ledger.delay(resource, now, delay),
        }
        Ok(())
    }

    /// Victims this effect adds to the site.
    #[must_use]
    pub fn victims_added(&self) -> u32 {
        match *self {
            FlashEffect::AddVictims { count, .. } => count,
            _ => 0,
        }
    }
}

/// A crisis bulletin and its effects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashEvent {
    /// Bulletin text relayed to teams.
    pub label: String,
    pub effects: SmallVec<[FlashEffect; 2]>,
}

impl FlashEvent {
    /// Create a flash with a single effect.
    pub fn new(label: impl Into<String>, effect: FlashEffect) -> Self {
        Self {
            label: label.into(),
            effects: smallvec![effect],
        }
    }

    /// Add another effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: FlashEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Apply every effect in order, stopping at the first failure.
    pub fn apply(
        &self,
        crisis: &mut CrisisState,
        ledger: &mut Ledger,
        now: Millis,
    ) -> Result<(), InvariantViolation> {
        self.effects
            .iter()
            .try_for_each(|effect| effect.apply(crisis, ledger, now))
    }
}

/// The six standard bulletins, in canonical order.
#[must_use]
pub fn standard_flashes() -> Vec<FlashEvent> {
    vec![
        FlashEvent::new(
            "FLASH#1: Fire spreading to west wing",
            FlashEffect::Ignite { location: LocationId::WestWing },
        ),
        FlashEvent::new(
            "FLASH#2: Victim found on floor 3",
            FlashEffect::AddVictims { location: LocationId::Floor3, count: 1 },
        ),
        FlashEvent::new("FLASH#3: Gas pressure building", FlashEffect::GasSurge { amount: 2 }),
        FlashEvent::new(
            "FLASH#4: Structure collapse on floor 2",
            FlashEffect::StructuralDamage { amount: 1 },
        )
        .with_effect(FlashEffect::AddVictims { location: LocationId::Floor2, count: 1 }),
        FlashEvent::new(
            "FLASH#5: Ambulance arrival delayed",
            FlashEffect::DelayResource {
                resource: ResourceId::Ambulance1,
                delay: 20_000,
            },
        ),
        FlashEvent::new(
            "FLASH#6: Evac route blocked by debris",
            FlashEffect::Block { location: LocationId::Exterior },
        ),
    ]
}

/// Which flashes an exercise runs, and in what order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashPlan {
    /// Standard bulletins in canonical order.
    #[default]
    Standard,
    /// Standard bulletins in a seed-determined order.
    Shuffled { seed: u64 },
    /// Caller-supplied bulletins.
    Custom(Vec<FlashEvent>),
    /// No flashes.
    Disabled,
}

impl FlashPlan {
    /// The bulletins this plan runs, in order.
    #[must_use]
    pub fn events(&self) -> Vec<FlashEvent> {
        match self {
            FlashPlan::Standard => standard_flashes(),
            FlashPlan::Shuffled { seed } => {
                let mut events = standard_flashes();
                GameRng::new(*seed).for_context("flash").shuffle(&mut events);
                events
            }
            FlashPlan::Custom(events) => events.clone(),
            FlashPlan::Disabled => Vec::new(),
        }
    }
}

/// Remaining flashes, consumed front to back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashScript {
    pending: Vector<FlashEvent>,
}

impl FlashScript {
    /// Materialise a plan.
    #[must_use]
    pub fn from_plan(plan: &FlashPlan) -> Self {
        Self {
            pending: plan.events().into_iter().collect(),
        }
    }

    /// Take the next flash, if any remain.
    pub fn next_flash(&mut self) -> Option<FlashEvent> {
        self.pending.pop_front()
    }

    /// Flashes still to come.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}
