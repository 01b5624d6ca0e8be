//! Incident site locations and their access classes.

use serde::{Deserialize, Serialize};

/// A location on the incident site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LocationId {
    Floor1,
    Floor2,
    Floor3,
    Floor4,
    EastWing,
    WestWing,
    Lobby,
    Exterior,
}

impl LocationId {
    /// All locations in evaluation order.
    pub const ALL: [LocationId; 8] = [
        LocationId::Floor1,
        LocationId::Floor2,
        LocationId::Floor3,
        LocationId::Floor4,
        LocationId::EastWing,
        LocationId::WestWing,
        LocationId::Lobby,
        LocationId::Exterior,
    ];

    /// Iterate over all locations in evaluation order.
    pub fn all() -> impl Iterator<Item = LocationId> {
        Self::ALL.into_iter()
    }

    /// Radio shorthand for this location (`F3`, `LB`, `EXT`, ...).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            LocationId::Floor1 => "F1",
            LocationId::Floor2 => "F2",
            LocationId::Floor3 => "F3",
            LocationId::Floor4 => "F4",
            LocationId::EastWing => "EW",
            LocationId::WestWing => "WW",
            LocationId::Lobby => "LB",
            LocationId::Exterior => "EXT",
        }
    }

    /// Parse a radio shorthand code (case-sensitive, upper-case).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().find(|loc| loc.code() == code)
    }

    /// How rescuers reach victims here.
    #[must_use]
    pub const fn access(self) -> AccessClass {
        match self {
            LocationId::Floor3 | LocationId::Floor4 => AccessClass::HighAccess,
            LocationId::Exterior => AccessClass::Exterior,
            LocationId::Floor1
            | LocationId::Floor2
            | LocationId::EastWing
            | LocationId::WestWing
            | LocationId::Lobby => AccessClass::Standard,
        }
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Rescue access class of a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessClass {
    /// Upper floors: needs the ladder (and, by default, an ambulance).
    HighAccess,
    /// Reachable on foot: an ambulance is enough.
    Standard,
    /// Outside the building: ambulance plus a police-held route.
    Exterior,
}
