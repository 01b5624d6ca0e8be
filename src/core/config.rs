//! Game configuration types.
//!
//! Collaborators configure an exercise at startup by providing a
//! `GameConfig`. It is read-only once the game starts: the controller
//! validates it in `GameController::start` and keeps its own copy.
//!
//! All durations are simulated milliseconds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::location::LocationId;
use crate::crisis::FlashPlan;

/// Simulated time in milliseconds since the exercise began.
pub type Millis = u64;

/// Convert whole seconds to simulated milliseconds.
#[must_use]
pub const fn secs(s: u64) -> Millis {
    s * 1000
}

/// Which resources a high-access rescue needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighAccessRule {
    /// Ladder held and positioned there, plus an ambulance there.
    #[default]
    LadderAndAmbulance,
    /// Ladder held and positioned there is enough.
    LadderOnly,
}

/// Startup layout of the incident site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSetup {
    /// Victims trapped at each location when the exercise starts.
    pub victims: Vec<(LocationId, u32)>,
    /// Locations already burning.
    pub fires: Vec<LocationId>,
    /// Locations whose access route is blocked.
    pub blocked: Vec<LocationId>,
}

impl Default for SiteSetup {
    /// Apartment-building explosion: fire on F2 and the east wing, six
    /// victims spread over F3, F4 and the lobby, F1 stairwell blocked.
    fn default() -> Self {
        Self {
            victims: vec![
                (LocationId::Floor3, 2),
                (LocationId::Floor4, 1),
                (LocationId::Lobby, 3),
            ],
            fires: vec![LocationId::Floor2, LocationId::EastWing],
            blocked: vec![LocationId::Floor1],
        }
    }
}

impl SiteSetup {
    /// An empty site with no victims, fires, or blockages.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            victims: Vec::new(),
            fires: Vec::new(),
            blocked: Vec::new(),
        }
    }

    /// Add trapped victims at a location.
    #[must_use]
    pub fn with_victims(mut self, location: LocationId, count: u32) -> Self {
        self.victims.push((location, count));
        self
    }

    /// Set a location on fire.
    #[must_use]
    pub fn with_fire(mut self, location: LocationId) -> Self {
        self.fires.push(location);
        self
    }

    /// Block a location's access route.
    #[must_use]
    pub fn with_blocked(mut self, location: LocationId) -> Self {
        self.blocked.push(location);
        self
    }
}

/// Complete exercise configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Maximum transmission length in characters.
    pub message_cap: usize,
    /// Maximum accepted transmissions per team.
    pub transmission_quota: u32,
    /// Minimum gap between a team's accepted transmissions.
    pub cooldown: Millis,
    /// Simulated time advanced by each tick.
    pub tick_interval: Millis,
    /// Period of gas/stability escalation.
    pub escalation_period: Millis,
    /// Period of scripted flash events.
    pub flash_period: Millis,
    /// Period of status snapshots pushed to observers.
    pub status_period: Millis,
    /// How long a granted resource stays committed.
    pub usage_duration: Millis,
    /// Free committed resources once their usage window has passed.
    pub auto_release: bool,
    /// Victims rescued per location per tick.
    pub rescue_cap: u32,
    /// Fraction of initial victims that ends the exercise in success.
    pub success_fraction: f64,
    /// Lowest value building stability can reach.
    pub stability_floor: u8,
    /// Gas pressure at start (0-10).
    pub initial_gas: u8,
    /// Building stability at start (floor-10).
    pub initial_stability: u8,
    /// Exercise length.
    pub duration: Millis,
    /// Elapsed time after which the time penalty accrues.
    pub penalty_start: Millis,
    /// Points lost per second past `penalty_start`.
    pub penalty_rate: f64,
    /// Points lost per stability point lost.
    pub damage_weight: f64,
    /// High-access rescue requirement.
    pub high_access_rule: HighAccessRule,
    /// Flash events and their order.
    pub flashes: FlashPlan,
    /// Initial site layout.
    pub site: SiteSetup,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            message_cap: 12,
            transmission_quota: 50,
            cooldown: secs(1),
            tick_interval: secs(1),
            escalation_period: secs(20),
            flash_period: secs(15),
            status_period: secs(60),
            usage_duration: secs(60),
            auto_release: true,
            rescue_cap: 2,
            success_fraction: 0.6,
            stability_floor: 0,
            initial_gas: 3,
            initial_stability: 7,
            duration: secs(300),
            penalty_start: secs(180),
            penalty_rate: 0.1,
            damage_weight: 5.0,
            high_access_rule: HighAccessRule::LadderAndAmbulance,
            flashes: FlashPlan::Standard,
            site: SiteSetup::default(),
        }
    }
}

impl GameConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message length cap.
    #[must_use]
    pub fn with_message_cap(mut self, cap: usize) -> Self {
        self.message_cap = cap;
        self
    }

    /// Set the per-team transmission quota.
    #[must_use]
    pub fn with_quota(mut self, quota: u32) -> Self {
        self.transmission_quota = quota;
        self
    }

    /// Set the per-team cooldown.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Millis) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Set the tick interval.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Millis) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the escalation period.
    #[must_use]
    pub fn with_escalation_period(mut self, period: Millis) -> Self {
        self.escalation_period = period;
        self
    }

    /// Set the flash period.
    #[must_use]
    pub fn with_flash_period(mut self, period: Millis) -> Self {
        self.flash_period = period;
        self
    }

    /// Set the status snapshot period.
    #[must_use]
    pub fn with_status_period(mut self, period: Millis) -> Self {
        self.status_period = period;
        self
    }

    /// Set the resource usage duration.
    #[must_use]
    pub fn with_usage_duration(mut self, duration: Millis) -> Self {
        self.usage_duration = duration;
        self
    }

    /// Keep resources committed until explicitly released.
    #[must_use]
    pub fn without_auto_release(mut self) -> Self {
        self.auto_release = false;
        self
    }

    /// Set the per-tick rescue cap.
    #[must_use]
    pub fn with_rescue_cap(mut self, cap: u32) -> Self {
        self.rescue_cap = cap;
        self
    }

    /// Set the success fraction.
    #[must_use]
    pub fn with_success_fraction(mut self, fraction: f64) -> Self {
        self.success_fraction = fraction;
        self
    }

    /// Set the stability floor.
    #[must_use]
    pub fn with_stability_floor(mut self, floor: u8) -> Self {
        self.stability_floor = floor;
        self
    }

    /// Set the exercise duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Millis) -> Self {
        self.duration = duration;
        self
    }

    /// Set the time penalty constants.
    #[must_use]
    pub fn with_time_penalty(mut self, start: Millis, rate_per_sec: f64) -> Self {
        self.penalty_start = start;
        self.penalty_rate = rate_per_sec;
        self
    }

    /// Set the high-access rescue rule.
    #[must_use]
    pub fn with_high_access_rule(mut self, rule: HighAccessRule) -> Self {
        self.high_access_rule = rule;
        self
    }

    /// Set the flash plan.
    #[must_use]
    pub fn with_flashes(mut self, flashes: FlashPlan) -> Self {
        self.flashes = flashes;
        self
    }

    /// Set the initial site layout.
    #[must_use]
    pub fn with_site(mut self, site: SiteSetup) -> Self {
        self.site = site;
        self
    }

    /// Check every option, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.message_cap == 0 {
            return Err(ConfigError::Zero("message_cap"));
        }
        if self.transmission_quota == 0 {
            return Err(ConfigError::Zero("transmission_quota"));
        }
        if self.rescue_cap == 0 {
            return Err(ConfigError::Zero("rescue_cap"));
        }
        for (name, value) in [
            ("tick_interval", self.tick_interval),
            ("escalation_period", self.escalation_period),
            ("flash_period", self.flash_period),
            ("status_period", self.status_period),
            ("duration", self.duration),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }
        if !(self.success_fraction > 0.0 && self.success_fraction <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "success_fraction",
                value: self.success_fraction,
            });
        }
        for (name, value) in [
            ("penalty_rate", self.penalty_rate),
            ("damage_weight", self.damage_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange { field: name, value });
            }
        }
        if self.initial_gas > 10 {
            return Err(ConfigError::OutOfRange {
                field: "initial_gas",
                value: f64::from(self.initial_gas),
            });
        }
        if self.initial_stability > 10 || self.initial_stability < self.stability_floor {
            return Err(ConfigError::OutOfRange {
                field: "initial_stability",
                value: f64::from(self.initial_stability),
            });
        }
        if let FlashPlan::Custom(events) = &self.flashes {
            if events.iter().any(|e| e.effects.is_empty()) {
                return Err(ConfigError::EmptyFlash);
            }
        }
        self.check_victim_total()
    }

    /// Site victims plus flash arrivals must fit in a `u32`.
    fn check_victim_total(&self) -> Result<(), ConfigError> {
        let site = self.site.victims.iter().map(|&(_, count)| count);
        let flashes = self
            .flashes
            .events()
            .into_iter()
            .flat_map(|e| e.effects.into_iter())
            .map(|effect| effect.victims_added());

        let mut total: u64 = 0;
        for count in site.chain(flashes) {
            total += u64::from(count);
            if total > u64::from(u32::MAX) {
                return Err(ConfigError::OutOfRange {
                    field: "victims",
                    value: total as f64,
                });
            }
        }
        Ok(())
    }
}

/// Invalid startup parameter. Fatal: the game never begins.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("custom flash event has no effects")]
    EmptyFlash,
}
