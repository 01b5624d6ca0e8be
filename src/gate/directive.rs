//! Resource directives embedded in radio shorthand.
//!
//! Teams ask for resources in free text such as `L→F3?`, `AMB2 LB?` or
//! `RTE EXT?`, and hand them back with `REL LDR`. This module extracts
//! those intents with keyword heuristics; it never tries to understand
//! anything else in the message.

use crate::core::LocationId;
use crate::ledger::ResourceId;

/// Resource named in a directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceHint {
    Exact(ResourceId),
    /// An ambulance without a number: take whichever is free.
    AnyAmbulance,
}

/// A parsed directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    Request {
        resource: ResourceHint,
        location: LocationId,
    },
    Release {
        resource: ResourceHint,
    },
}

const LADDER_KEYS: [&str; 3] = ["LADDER", "LDR", "L→"];
const ROUTE_KEYS: [&str; 2] = ["ROUTE", "RTE"];
const AMBULANCE_KEYS: [&str; 2] = ["AMBULANCE", "AMB"];
const RELEASE_KEY: &str = "REL";

/// Extract a directive from message text.
///
/// Requests need both a resource and a location; releases need only the
/// resource.
#[must_use]
pub fn parse(text: &str) -> Option<Directive> {
    let upper = text.to_uppercase();
    let (resource, stripped) = find_resource(&upper)?;

    if stripped.contains(RELEASE_KEY) {
        return Some(Directive::Release { resource });
    }

    let location = find_location(&stripped)?;
    Some(Directive::Request { resource, location })
}

/// Find the resource keyword and return the text with it blanked out, so
/// that e.g. the `1` in `AMB1` cannot be read as part of a location code.
fn find_resource(upper: &str) -> Option<(ResourceHint, String)> {
    if let Some(key) = LADDER_KEYS.iter().find(|k| upper.contains(*k)) {
        return Some((
            ResourceHint::Exact(ResourceId::Ladder),
            upper.replacen(key, " ", 1),
        ));
    }

    if let Some(key) = AMBULANCE_KEYS.iter().find(|k| upper.contains(*k)) {
        let start = upper.find(key)?;
        let rest = &upper[start + key.len()..];
        let digit = rest.chars().find(|c| !matches!(c, '-' | '#' | ' ' | '_'));
        let (hint, consumed) = match digit {
            Some('1') => (ResourceHint::Exact(ResourceId::Ambulance1), true),
            Some('2') => (ResourceHint::Exact(ResourceId::Ambulance2), true),
            _ => (ResourceHint::AnyAmbulance, false),
        };
        let mut stripped = upper.replacen(key, " ", 1);
        if consumed {
            let digit_char = if hint == ResourceHint::Exact(ResourceId::Ambulance1) { "1" } else { "2" };
            if let Some(pos) = stripped[start..].find(digit_char) {
                stripped.replace_range(start + pos..start + pos + 1, " ");
            }
        }
        return Some((hint, stripped));
    }

    ROUTE_KEYS
        .iter()
        .find(|k| upper.contains(*k))
        .map(|key| (ResourceHint::Exact(ResourceId::Route), upper.replacen(key, " ", 1)))
}

/// Earliest location code in the text.
fn find_location(text: &str) -> Option<LocationId> {
    LocationId::all()
        .filter_map(|loc| text.find(loc.code()).map(|pos| (pos, loc)))
        .min_by_key(|&(pos, loc)| (pos, std::cmp::Reverse(loc.code().len())))
        .map(|(_, loc)| loc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(resource: ResourceHint, location: LocationId) -> Option<Directive> {
        Some(Directive::Request { resource, location })
    }

    #[test]
    fn test_ladder_request() {
        assert_eq!(
            parse("L→F3?"),
            request(ResourceHint::Exact(ResourceId::Ladder), LocationId::Floor3)
        );
        assert_eq!(
            parse("ldr f4?"),
            request(ResourceHint::Exact(ResourceId::Ladder), LocationId::Floor4)
        );
    }

    #[test]
    fn test_numbered_ambulance_does_not_leak_digit() {
        assert_eq!(
            parse("AMB1 LB?"),
            request(ResourceHint::Exact(ResourceId::Ambulance1), LocationId::Lobby)
        );
        assert_eq!(
            parse("AMB-2→F3?"),
            request(ResourceHint::Exact(ResourceId::Ambulance2), LocationId::Floor3)
        );
        // Digit belongs to the floor, not the ambulance.
        assert_eq!(
            parse("AMB→F1?"),
            request(ResourceHint::AnyAmbulance, LocationId::Floor1)
        );
    }

    #[test]
    fn test_route_request() {
        assert_eq!(
            parse("RTE EXT?"),
            request(ResourceHint::Exact(ResourceId::Route), LocationId::Exterior)
        );
    }

    #[test]
    fn test_release() {
        assert_eq!(
            parse("REL LDR"),
            Some(Directive::Release {
                resource: ResourceHint::Exact(ResourceId::Ladder)
            })
        );
        assert_eq!(
            parse("AMB2 REL"),
            Some(Directive::Release {
                resource: ResourceHint::Exact(ResourceId::Ambulance2)
            })
        );
    }

    #[test]
    fn test_incomplete_directives() {
        assert_eq!(parse("L→SUPR?"), None);
        assert_eq!(parse("F3 2V"), None);
        assert_eq!(parse(""), None);
    }
}
