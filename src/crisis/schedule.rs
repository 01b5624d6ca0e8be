//! Fixed-cadence boundaries crossed by each tick.
//!
//! The clock advances in `tick_interval` steps. Escalations, flashes, and
//! status reports fire whenever a step crosses a multiple of their period,
//! so their cadence does not depend on the tick length or on how often
//! teams transmit.

use serde::{Deserialize, Serialize};

use crate::core::{GameConfig, Millis};

/// Number of multiples of `period` in `(prev, now]`.
#[must_use]
pub fn crossings(prev: Millis, now: Millis, period: Millis) -> u64 {
    if period == 0 || now <= prev {
        return 0;
    }
    now / period - prev / period
}

/// Periods driving the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub tick_interval: Millis,
    pub escalation_period: Millis,
    pub flash_period: Millis,
    pub status_period: Millis,
}

/// What one tick has to do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickPlan {
    /// Clock value after the tick.
    pub now: Millis,
    pub escalations: u64,
    pub flashes: u64,
    pub status_report: bool,
}

impl Schedule {
    /// Take the periods from a configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            tick_interval: config.tick_interval,
            escalation_period: config.escalation_period,
            flash_period: config.flash_period,
            status_period: config.status_period,
        }
    }

    /// Plan the tick that starts at `prev`.
    #[must_use]
    pub fn plan(&self, prev: Millis) -> TickPlan {
        let now = prev + self.tick_interval;
        TickPlan {
            now,
            escalations: crossings(prev, now, self.escalation_period),
            flashes: crossings(prev, now, self.flash_period),
            status_report: crossings(prev, now, self.status_period) > 0,
        }
    }
}
