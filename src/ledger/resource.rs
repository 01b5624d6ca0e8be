//! Shared resources and the request/grant/release protocol.
//!
//! ## Protocol
//!
//! - A request is granted only when nobody holds the resource and its
//!   `busy_until` has passed. The grant records holder and position and
//!   commits the resource until `now + usage`.
//! - A release clears holder and position and marks the resource
//!   available from `now`, or from the end of a pending delay.
//! - A delay never lengthens the current hold; it only holds back the next
//!   grant.
//! - Nothing is ever taken from a holder because someone else wants it.
//!   Contention shows up as `Denied` outcomes; retrying is the caller's
//!   business.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{LocationId, Millis, TeamId};

/// Shared resource identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceId {
    /// Aerial ladder, needed for high-access rescues and suppression.
    Ladder,
    Ambulance1,
    Ambulance2,
    /// Evacuation route; clear when police hold it.
    Route,
}

impl ResourceId {
    /// All resources in ledger order.
    pub const ALL: [ResourceId; 4] = [
        ResourceId::Ladder,
        ResourceId::Ambulance1,
        ResourceId::Ambulance2,
        ResourceId::Route,
    ];

    /// Both ambulances, in preference order.
    pub const AMBULANCES: [ResourceId; 2] = [ResourceId::Ambulance1, ResourceId::Ambulance2];

    const fn index(self) -> usize {
        match self {
            ResourceId::Ladder => 0,
            ResourceId::Ambulance1 => 1,
            ResourceId::Ambulance2 => 2,
            ResourceId::Route => 3,
        }
    }

    /// Is this one of the ambulances?
    #[must_use]
    pub const fn is_ambulance(self) -> bool {
        matches!(self, ResourceId::Ambulance1 | ResourceId::Ambulance2)
    }

    /// Radio shorthand.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            ResourceId::Ladder => "LDR",
            ResourceId::Ambulance1 => "AMB1",
            ResourceId::Ambulance2 => "AMB2",
            ResourceId::Route => "RTE",
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Current allocation of one resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    /// Team currently holding it.
    pub holder: Option<TeamId>,
    /// Where it is deployed. Cleared on release.
    pub location: Option<LocationId>,
    /// Cannot be granted before this time. While held, the end of the
    /// usage window.
    pub busy_until: Millis,
    /// Earliest time the next grant may happen after a delay.
    delayed_until: Millis,
    /// When the current holder got it.
    held_since: Option<Millis>,
    /// Completed holding time, excluding the current holder.
    held_total: Millis,
}

impl Resource {
    fn new(id: ResourceId) -> Self {
        Self {
            id,
            holder: None,
            location: None,
            busy_until: 0,
            delayed_until: 0,
            held_since: None,
            held_total: 0,
        }
    }

    /// Is the resource held and deployed at `location`?
    #[must_use]
    pub fn deployed_at(&self, location: LocationId) -> bool {
        self.holder.is_some() && self.location == Some(location)
    }

    /// Total time this resource has been held up to `now`.
    #[must_use]
    pub fn held_time(&self, now: Millis) -> Millis {
        self.held_total + self.held_since.map_or(0, |since| now.saturating_sub(since))
    }
}

/// Result of a resource request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestOutcome {
    Granted {
        resource: ResourceId,
        location: LocationId,
        until: Millis,
    },
    Denied {
        resource: ResourceId,
        reason: DenyReason,
    },
}

impl RequestOutcome {
    /// Was the request granted?
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, RequestOutcome::Granted { .. })
    }
}

/// Why a request was denied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenyReason {
    /// Another team (or the requester) already holds it.
    AlreadyHeld { holder: TeamId },
    /// Free, but still on its way back until the given time.
    InTransit { until: Millis },
}

/// Result of a release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseOutcome {
    Released {
        resource: ResourceId,
        from: TeamId,
    },
    /// The caller does not hold the resource.
    NotHolder {
        resource: ResourceId,
        holder: Option<TeamId>,
    },
}

/// Allocation state of every shared resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    resources: [Resource; 4],
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// All resources free and parked.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: ResourceId::ALL.map(Resource::new),
        }
    }

    /// Look up a resource.
    #[must_use]
    pub fn get(&self, id: ResourceId) -> &Resource {
        &self.resources[id.index()]
    }

    fn get_mut(&mut self, id: ResourceId) -> &mut Resource {
        &mut self.resources[id.index()]
    }

    /// Iterate over all resources in ledger order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Request `id` for `team` at `location`.
    pub fn request(
        &mut self,
        team: TeamId,
        id: ResourceId,
        location: LocationId,
        now: Millis,
        usage: Millis,
    ) -> RequestOutcome {
        let resource = self.get_mut(id);

        if let Some(holder) = resource.holder {
            return RequestOutcome::Denied {
                resource: id,
                reason: DenyReason::AlreadyHeld { holder },
            };
        }
        if now < resource.busy_until {
            return RequestOutcome::Denied {
                resource: id,
                reason: DenyReason::InTransit {
                    until: resource.busy_until,
                },
            };
        }

        let until = now + usage;
        resource.holder = Some(team);
        resource.location = Some(location);
        resource.busy_until = until;
        resource.held_since = Some(now);

        RequestOutcome::Granted {
            resource: id,
            location,
            until,
        }
    }

    /// Release `id` regardless of who holds it.
    ///
    /// Returns the previous holder, or `None` if it was free.
    pub fn release(&mut self, id: ResourceId, now: Millis) -> Option<TeamId> {
        let resource = self.get_mut(id);
        let holder = resource.holder.take()?;

        resource.location = None;
        resource.busy_until = now.max(resource.delayed_until);
        if let Some(since) = resource.held_since.take() {
            resource.held_total += now.saturating_sub(since);
        }
        Some(holder)
    }

    /// Release `id` on behalf of `team`, refusing if `team` is not the holder.
    pub fn release_by(&mut self, team: TeamId, id: ResourceId, now: Millis) -> ReleaseOutcome {
        let holder = self.get(id).holder;
        if holder != Some(team) {
            return ReleaseOutcome::NotHolder { resource: id, holder };
        }
        self.release(id, now);
        ReleaseOutcome::Released { resource: id, from: team }
    }

    /// Release every held resource whose usage window has closed.
    ///
    /// Returns the released resources with their former holders.
    pub fn expire(&mut self, now: Millis) -> SmallVec<[(ResourceId, TeamId); 4]> {
        let due: SmallVec<[ResourceId; 4]> = self
            .iter()
            .filter(|r| r.holder.is_some() && now >= r.busy_until)
            .map(|r| r.id)
            .collect();

        due.into_iter()
            .filter_map(|id| self.release(id, now).map(|team| (id, team)))
            .collect()
    }

    /// Keep a resource from being granted again before `now + delay`.
    ///
    /// A held resource keeps its usage window; the delay applies once it is
    /// released.
    pub fn delay(&mut self, id: ResourceId, now: Millis, delay: Millis) {
        let resource = self.get_mut(id);
        resource.delayed_until = resource.delayed_until.max(now.saturating_add(delay));
        if resource.holder.is_none() {
            resource.busy_until = resource.busy_until.max(resource.delayed_until);
        }
    }

    /// Resources held by `team`.
    pub fn held_by(&self, team: TeamId) -> impl Iterator<Item = &Resource> {
        self.iter().filter(move |r| r.holder == Some(team))
    }

    /// Held resources deployed at `location`.
    pub fn deployed_at(&self, location: LocationId) -> impl Iterator<Item = &Resource> {
        self.iter().filter(move |r| r.deployed_at(location))
    }

    /// Is any ambulance deployed at `location`?
    #[must_use]
    pub fn ambulance_at(&self, location: LocationId) -> bool {
        ResourceId::AMBULANCES
            .iter()
            .any(|&id| self.get(id).deployed_at(location))
    }

    /// First ambulance that could be granted right now.
    #[must_use]
    pub fn free_ambulance(&self, now: Millis) -> Option<ResourceId> {
        ResourceId::AMBULANCES.into_iter().find(|&id| {
            let r = self.get(id);
            r.holder.is_none() && now >= r.busy_until
        })
    }

    /// Fraction of total resource-time spent held, over `elapsed`.
    #[must_use]
    pub fn utilisation(&self, now: Millis) -> f64 {
        if now == 0 {
            return 0.0;
        }
        let held: Millis = self.iter().map(|r| r.held_time(now)).sum();
        held as f64 / (now as f64 * self.resources.len() as f64)
    }
}
