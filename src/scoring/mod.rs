//! Exercise scoring.
//!
//! The score is recomputed on demand from monotone counters:
//!
//! ```text
//! 100·saved + 50·fires + 25·evacuated + 10·coordination + 2·vocabulary
//!   − time_penalty − damage_penalty
//! ```
//!
//! where the time penalty accrues per second past `penalty_start` and the
//! damage penalty is proportional to stability lost. The total is not
//! clamped and may go negative.

use serde::{Deserialize, Serialize};

use crate::core::{GameConfig, Millis};

pub const SAVED_POINTS: f64 = 100.0;
pub const FIRE_POINTS: f64 = 50.0;
pub const EVACUATION_POINTS: f64 = 25.0;
pub const COORDINATION_POINTS: f64 = 10.0;
pub const VOCABULARY_POINTS: f64 = 2.0;

/// Counters the score is computed from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreInputs {
    /// Victims rescued, counted once regardless of shared credit.
    pub saved: u32,
    pub fire_contained: u32,
    pub evacuated: u32,
    pub coordination_events: u32,
    /// Sum of every team's vocabulary size.
    pub vocab_tokens: u32,
    pub elapsed: Millis,
    pub initial_stability: u8,
    pub stability: u8,
}

/// Penalty constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Penalties {
    pub start: Millis,
    /// Points per second past `start`.
    pub rate: f64,
    /// Points per stability point lost.
    pub damage_weight: f64,
}

impl Penalties {
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            start: config.penalty_start,
            rate: config.penalty_rate,
            damage_weight: config.damage_weight,
        }
    }
}

/// Each term of the score, and the total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub saved: f64,
    pub fires: f64,
    pub evacuation: f64,
    pub coordination: f64,
    pub vocabulary: f64,
    pub time_penalty: f64,
    pub damage_penalty: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    /// Score a set of counters.
    #[must_use]
    pub fn compute(inputs: &ScoreInputs, penalties: &Penalties) -> Self {
        let saved = SAVED_POINTS * f64::from(inputs.saved);
        let fires = FIRE_POINTS * f64::from(inputs.fire_contained);
        let evacuation = EVACUATION_POINTS * f64::from(inputs.evacuated);
        let coordination = COORDINATION_POINTS * f64::from(inputs.coordination_events);
        let vocabulary = VOCABULARY_POINTS * f64::from(inputs.vocab_tokens);

        let overtime = inputs.elapsed.saturating_sub(penalties.start) as f64 / 1000.0;
        let time_penalty = overtime * penalties.rate;
        let lost = inputs.initial_stability.saturating_sub(inputs.stability);
        let damage_penalty = penalties.damage_weight * f64::from(lost);

        Self {
            saved,
            fires,
            evacuation,
            coordination,
            vocabulary,
            time_penalty,
            damage_penalty,
            total: saved + fires + evacuation + coordination + vocabulary
                - time_penalty
                - damage_penalty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::secs;

    fn penalties() -> Penalties {
        Penalties::from_config(&GameConfig::default())
    }

    #[test]
    fn test_every_term() {
        let inputs = ScoreInputs {
            saved: 3,
            fire_contained: 1,
            evacuated: 2,
            coordination_events: 2,
            vocab_tokens: 10,
            elapsed: secs(200),
            initial_stability: 7,
            stability: 5,
        };

        let score = ScoreBreakdown::compute(&inputs, &penalties());

        assert_eq!(score.saved, 300.0);
        assert_eq!(score.fires, 50.0);
        assert_eq!(score.evacuation, 50.0);
        assert_eq!(score.coordination, 20.0);
        assert_eq!(score.vocabulary, 20.0);
        assert!((score.time_penalty - 2.0).abs() < 1e-9);
        assert_eq!(score.damage_penalty, 10.0);
        assert!((score.total - 428.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_time_penalty_before_start() {
        let inputs = ScoreInputs {
            elapsed: secs(180),
            initial_stability: 7,
            stability: 7,
            ..ScoreInputs::default()
        };

        let score = ScoreBreakdown::compute(&inputs, &penalties());
        assert_eq!(score.time_penalty, 0.0);
        assert_eq!(score.total, 0.0);
    }

    #[test]
    fn test_total_may_go_negative() {
        let inputs = ScoreInputs {
            elapsed: secs(300),
            initial_stability: 7,
            stability: 0,
            ..ScoreInputs::default()
        };

        let score = ScoreBreakdown::compute(&inputs, &penalties());
        assert!(score.total < 0.0);
        assert!((score.total - -47.0).abs() < 1e-9);
    }
}
