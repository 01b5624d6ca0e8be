//! Resource ledger: exclusive ownership of the ladder, ambulances, and
//! evacuation route.

mod resource;

pub use resource::{DenyReason, Ledger, ReleaseOutcome, RequestOutcome, Resource, ResourceId};
