//! Team identification and per-team data storage.
//!
//! ## TeamId
//!
//! The three emergency services taking part in an exercise.
//!
//! ## TeamMap
//!
//! Per-team data storage backed by `Vec` for O(1) access.
//! Supports iteration and indexing by `TeamId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Emergency team identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TeamId {
    /// Fire service: ladder, suppression.
    Fire,
    /// Medical service: ambulances, triage.
    Medical,
    /// Police: evacuation route and traffic control.
    Police,
}

impl TeamId {
    /// Number of teams in every exercise.
    pub const COUNT: usize = 3;

    /// All teams in canonical order.
    pub const ALL: [TeamId; Self::COUNT] = [TeamId::Fire, TeamId::Medical, TeamId::Police];

    /// Index into per-team storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            TeamId::Fire => 0,
            TeamId::Medical => 1,
            TeamId::Police => 2,
        }
    }

    /// Iterate over all teams.
    pub fn all() -> impl Iterator<Item = TeamId> {
        Self::ALL.into_iter()
    }

    /// Upper-case call sign used in transcripts and briefings.
    #[must_use]
    pub const fn call_sign(self) -> &'static str {
        match self {
            TeamId::Fire => "FIRE",
            TeamId::Medical => "MEDICAL",
            TeamId::Police => "POLICE",
        }
    }

    /// The team's standing priority.
    #[must_use]
    pub const fn priority(self) -> Priority {
        match self {
            TeamId::Fire => Priority::FireSuppression,
            TeamId::Medical => Priority::VictimRescue,
            TeamId::Police => Priority::EvacuationControl,
        }
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.call_sign())
    }
}

/// Priority descriptor carried by each team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Control and extinguish fires.
    FireSuppression,
    /// Reach and treat victims.
    VictimRescue,
    /// Keep evacuation routes open.
    EvacuationControl,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Priority::FireSuppression => "FIRE_SUPPRESSION",
            Priority::VictimRescue => "VICTIM_RESCUE",
            Priority::EvacuationControl => "EVACUATION_CONTROL",
        })
    }
}

/// Per-team data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use crisis_comms::core::{TeamId, TeamMap};
///
/// let mut saved: TeamMap<u32> = TeamMap::with_default();
/// saved[TeamId::Medical] += 2;
///
/// assert_eq!(saved[TeamId::Medical], 2);
/// assert_eq!(saved[TeamId::Fire], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamMap<T> {
    data: Vec<T>,
}

impl<T> TeamMap<T> {
    /// Create a new TeamMap with values from a factory function.
    pub fn new(factory: impl Fn(TeamId) -> T) -> Self {
        Self {
            data: TeamId::all().map(factory).collect(),
        }
    }

    /// Create a new TeamMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a team's data.
    #[must_use]
    pub fn get(&self, team: TeamId) -> &T {
        &self.data[team.index()]
    }

    /// Get a mutable reference to a team's data.
    pub fn get_mut(&mut self, team: TeamId) -> &mut T {
        &mut self.data[team.index()]
    }

    /// Iterate over (TeamId, &T) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &T)> {
        TeamId::all().zip(self.data.iter())
    }

    /// Iterate over (TeamId, &mut T) pairs in canonical order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TeamId, &mut T)> {
        TeamId::all().zip(self.data.iter_mut())
    }

    /// Iterate over values in canonical order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<TeamId> for TeamMap<T> {
    type Output = T;

    fn index(&self, team: TeamId) -> &Self::Output {
        self.get(team)
    }
}

impl<T> IndexMut<TeamId> for TeamMap<T> {
    fn index_mut(&mut self, team: TeamId) -> &mut Self::Output {
        self.get_mut(team)
    }
}
