//! Per-team situation briefings for the text-generation collaborator.

use std::fmt;

use super::snapshot::Snapshot;
use crate::core::{Millis, TeamId};

/// What one team is told before composing its next transmission.
#[derive(Clone, Debug, PartialEq)]
pub struct Briefing {
    pub team: TeamId,
    pub snapshot: Snapshot,
    /// Character limit on the next transmission.
    pub message_cap: usize,
}

impl Briefing {
    /// Briefing for `team` from a snapshot.
    #[must_use]
    pub fn new(team: TeamId, snapshot: Snapshot, message_cap: usize) -> Self {
        Self {
            team,
            snapshot,
            message_cap,
        }
    }
}

fn clock(ms: Millis) -> String {
    let s = ms / 1000;
    format!("{}:{:02}", s / 60, s % 60)
}

impl fmt::Display for Briefing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snap = &self.snapshot;
        let own = &snap.teams[self.team];

        writeln!(f, "ROLE: {} ({})", self.team, self.team.priority())?;
        writeln!(
            f,
            "TIME: {} elapsed, {} left",
            clock(snap.clock),
            clock(snap.time_remaining)
        )?;
        writeln!(f, "HAZARDS: gas {}/10, stability {}/10", snap.gas_pressure, snap.stability)?;

        let fires: Vec<_> = snap.fires().map(|l| l.id.code()).collect();
        writeln!(f, "FIRES: {}", if fires.is_empty() { "none".to_owned() } else { fires.join(" ") })?;

        let victims: Vec<_> = snap.victims().map(|l| format!("{}:{}", l.id, l.victims)).collect();
        writeln!(
            f,
            "VICTIMS: {} ({} saved of {})",
            if victims.is_empty() { "none".to_owned() } else { victims.join(" ") },
            snap.rescued,
            snap.initial_victims
        )?;

        let blocked: Vec<_> = snap.locations.iter().filter(|l| l.blocked).map(|l| l.id.code()).collect();
        if !blocked.is_empty() {
            writeln!(f, "BLOCKED: {}", blocked.join(" "))?;
        }

        write!(f, "RESOURCES:")?;
        for r in &snap.resources {
            match (r.holder, r.location) {
                (Some(holder), Some(at)) => write!(f, " {}={}@{}", r.id, holder, at)?,
                _ if r.busy_until > snap.clock => write!(f, " {}=delayed", r.id)?,
                _ => write!(f, " {}=free", r.id)?,
            }
        }
        writeln!(f)?;

        writeln!(
            f,
            "YOUR TEAM: saved {}, fires {}, evacuated {}",
            own.saved, own.fire_contained, own.evacuated
        )?;
        writeln!(
            f,
            "TRANSMISSIONS: {} left, max {} chars",
            own.remaining_quota, self.message_cap
        )?;

        if !snap.recent_messages.is_empty() {
            writeln!(f, "RECENT:")?;
            for m in &snap.recent_messages {
                writeln!(f, "  [{}] {}: {}", clock(m.at), m.team, m.text)?;
            }
        }
        Ok(())
    }
}
