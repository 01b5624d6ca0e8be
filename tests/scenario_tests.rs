//! End-to-end exercise scenarios.
//!
//! These tests drive a `GameController` through complete situations and
//! check rescues, credit, termination, and scoring.

use crisis_comms::core::{secs, GameConfig, LocationId, SiteSetup, TeamId};
use crisis_comms::crisis::{FlashEffect, FlashEvent, FlashPlan};
use crisis_comms::game::{GameController, GameEvent, Outcome, Report, TickOutcome};
use crisis_comms::gate::Rejection;
use crisis_comms::ledger::ResourceId;
use crisis_comms::SubmitOutcome;

fn quiet(site: SiteSetup) -> GameConfig {
    GameConfig::default()
        .with_site(site)
        .with_flashes(FlashPlan::Disabled)
}

fn run_to_end(game: &mut GameController) -> Outcome {
    loop {
        if let TickOutcome::Finished(outcome) = game.tick().unwrap() {
            return outcome;
        }
    }
}

// =============================================================================
// Rescue Scenarios
// =============================================================================

/// Test that ladder and ambulance on F3 rescue both victims with shared credit.
#[test]
fn test_high_access_joint_rescue() {
    let mut game = GameController::start(quiet(SiteSetup::default())).unwrap();

    assert!(game.submit_message(TeamId::Fire, "L→F3?").is_accepted());
    assert!(game.submit_message(TeamId::Medical, "AMB1 F3?").is_accepted());
    assert_eq!(game.state().ledger.get(ResourceId::Ladder).location, Some(LocationId::Floor3));
    assert_eq!(game.state().ledger.get(ResourceId::Ambulance1).holder, Some(TeamId::Medical));
    game.drain_events();

    game.tick().unwrap();
    let snap = game.snapshot();

    assert_eq!(snap.rescued, 2);
    assert_eq!(snap.teams[TeamId::Fire].saved, 2);
    assert_eq!(snap.teams[TeamId::Medical].saved, 2);
    assert_eq!(snap.teams[TeamId::Police].saved, 0);
    assert_eq!(snap.coordination_events, 1);

    let events = game.drain_events();
    let coordinated: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Coordination(c) => Some(c),
            _ => None,
        })
        .collect();
    assert_eq!(coordinated.len(), 1);
    assert_eq!(coordinated[0].location, LocationId::Floor3);
    assert_eq!(coordinated[0].teams.as_slice(), &[TeamId::Fire, TeamId::Medical]);
}

/// Test that a ladder alone is not enough for a high-access rescue by default.
#[test]
fn test_high_access_needs_ambulance_by_default() {
    let mut game = GameController::start(quiet(SiteSetup::default())).unwrap();
    game.request_resource(TeamId::Fire, ResourceId::Ladder, LocationId::Floor4);

    game.tick().unwrap();
    assert_eq!(game.snapshot().rescued, 0);
}

/// Test that exterior evacuation needs the police route and credits evacuation.
#[test]
fn test_exterior_evacuation() {
    let site = SiteSetup::empty()
        .with_victims(LocationId::Exterior, 2)
        .with_victims(LocationId::WestWing, 5)
        .with_blocked(LocationId::Exterior);
    let mut game = GameController::start(quiet(site)).unwrap();

    game.submit_message(TeamId::Medical, "AMB2 EXT?");
    game.tick().unwrap();
    assert_eq!(game.snapshot().rescued, 0);

    // Police taking the route at EXT also clears the debris.
    game.submit_message(TeamId::Police, "RTE EXT?");
    game.tick().unwrap();

    let snap = game.snapshot();
    assert_eq!(snap.rescued, 2);
    assert_eq!(snap.teams[TeamId::Police].evacuated, 2);
    assert_eq!(snap.teams[TeamId::Police].saved, 2);
    assert_eq!(snap.teams[TeamId::Medical].saved, 2);
    assert_eq!(snap.coordination_events, 1);
}

/// Test that debris landing on a route the police already hold does not
/// stop the evacuation.
#[test]
fn test_route_block_while_police_hold_it() {
    let debris = FlashEvent::new("DEBRIS", FlashEffect::Block { location: LocationId::Exterior });
    let config = GameConfig::default()
        .with_site(SiteSetup::empty().with_victims(LocationId::Exterior, 40))
        .with_flashes(FlashPlan::Custom(vec![debris]))
        .with_rescue_cap(1);
    let mut game = GameController::start(config).unwrap();
    game.request_resource(TeamId::Medical, ResourceId::Ambulance2, LocationId::Exterior);
    game.request_resource(TeamId::Police, ResourceId::Route, LocationId::Exterior);

    for _ in 0..20 {
        game.tick().unwrap();
    }

    assert!(game
        .drain_events()
        .iter()
        .any(|e| matches!(e, GameEvent::Flash { label, .. } if label == "DEBRIS")));
    let snap = game.snapshot();
    assert!(!snap.locations.iter().any(|l| l.id == LocationId::Exterior && l.blocked));
    assert_eq!(snap.rescued, 20);
    assert_eq!(snap.teams[TeamId::Police].evacuated, 20);
}

/// Test that the fire crew on the ladder puts out a fire.
#[test]
fn test_fire_suppression() {
    let mut game = GameController::start(quiet(SiteSetup::default())).unwrap();

    game.submit_message(TeamId::Fire, "L→F2?");
    game.tick().unwrap();

    let snap = game.snapshot();
    assert_eq!(snap.teams[TeamId::Fire].fire_contained, 1);
    assert!(!snap.locations.iter().any(|l| l.id == LocationId::Floor2 && l.fire));
    assert_eq!(snap.score.fires, 50.0);
}

/// Test that enough rescues on one tick end the exercise in success.
#[test]
fn test_success_threshold() {
    let mut game = GameController::start(quiet(SiteSetup::default())).unwrap();
    game.request_resource(TeamId::Fire, ResourceId::Ladder, LocationId::Floor3);
    game.request_resource(TeamId::Medical, ResourceId::Ambulance1, LocationId::Floor3);
    game.request_resource(TeamId::Medical, ResourceId::Ambulance2, LocationId::Lobby);

    assert_eq!(game.tick().unwrap(), TickOutcome::Finished(Outcome::Success));

    let report = game.end();
    assert_eq!(report.outcome, Outcome::Success);
    assert_eq!(report.rescued, 4);
    assert_eq!(report.coordination.len(), 1);
    assert_eq!(report.efficiency.coordination_rate, 0.5);
}

// =============================================================================
// Gate Scenario
// =============================================================================

/// Test that a nine-character message under a cap of eight is refused.
#[test]
fn test_over_cap_message_rejected() {
    let config = quiet(SiteSetup::default()).with_message_cap(8);
    let mut game = GameController::start(config).unwrap();

    let outcome = game.submit_message(TeamId::Police, "EVAC-CLR!");

    assert_eq!(outcome, SubmitOutcome::Rejected(Rejection::TooLong { len: 9, cap: 8 }));
    let snap = game.snapshot();
    assert_eq!(snap.teams[TeamId::Police].accepted, 0);
    assert_eq!(snap.teams[TeamId::Police].rejected, 1);
    assert!(snap.recent_messages.is_empty());
}

// =============================================================================
// Termination and Scoring
// =============================================================================

/// Test that running out of time with some saved gives a partial result
/// scored by the formula.
#[test]
fn test_timeout_partial_score() {
    let config = quiet(SiteSetup::empty().with_victims(LocationId::Lobby, 5))
        .with_duration(secs(10))
        .with_time_penalty(secs(5), 1.0)
        .with_rescue_cap(1)
        .with_usage_duration(secs(2));
    let mut game = GameController::start(config).unwrap();

    // Tokens AMB and LB; the ambulance rescues once, then its usage expires.
    game.submit_message(TeamId::Medical, "AMB LB?");

    assert_eq!(run_to_end(&mut game), Outcome::TimeoutPartial);

    let report = game.end();
    assert_eq!(report.duration, secs(10));
    assert_eq!(report.rescued, 1);
    // 100·1 + 2·2 − (10 − 5)·1.0
    assert!((report.score.total - 99.0).abs() < 1e-9);
    assert_eq!(report.score.damage_penalty, 0.0);
}

/// Test that nothing saved by the deadline is a failure.
#[test]
fn test_timeout_fail() {
    let config = quiet(SiteSetup::default()).with_duration(secs(3));
    let mut game = GameController::start(config).unwrap();

    assert_eq!(run_to_end(&mut game), Outcome::TimeoutFail);
    assert_eq!(game.snapshot().outcome, Some(Outcome::TimeoutFail));
}

/// Test that escalation and flash damage are charged as a penalty.
#[test]
fn test_damage_penalty_follows_escalation() {
    let config = quiet(SiteSetup::default()).with_duration(secs(45));
    let mut game = GameController::start(config).unwrap();

    run_to_end(&mut game);
    let report = game.end();

    // Two escalations by 45 s.
    assert_eq!(report.final_gas, 5);
    assert_eq!(report.final_stability, 5);
    assert_eq!(report.score.damage_penalty, 10.0);
}

// =============================================================================
// Flashes
// =============================================================================

/// Test that the standard flashes fire every 15 s in order.
#[test]
fn test_standard_flash_cadence() {
    let config = GameConfig::default();
    let mut game = GameController::start(config).unwrap();

    for _ in 0..45 {
        game.tick().unwrap();
    }

    let labels: Vec<_> = game
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::Flash { label, .. } => Some(label),
            _ => None,
        })
        .collect();
    assert_eq!(labels.len(), 3);
    assert!(labels[0].starts_with("FLASH#1"));
    assert!(labels[2].starts_with("FLASH#3"));

    let snap = game.snapshot();
    assert_eq!(snap.flashes_remaining, 3);
    // 3 + 2 escalations + 2 from the gas surge.
    assert_eq!(snap.gas_pressure, 7);
    assert_eq!(game.state().crisis.injected_victims, 1);
}

/// Test that a custom flash can make a resource unavailable.
#[test]
fn test_custom_delay_flash() {
    let delay = FlashEvent::new(
        "AMB1 DELAYED",
        FlashEffect::DelayResource {
            resource: ResourceId::Ambulance1,
            delay: secs(20),
        },
    );
    let config = GameConfig::default().with_flashes(FlashPlan::Custom(vec![delay]));
    let mut game = GameController::start(config).unwrap();

    for _ in 0..15 {
        game.tick().unwrap();
    }
    let outcome = game.submit_message(TeamId::Medical, "AMB1 LB?");

    assert!(matches!(
        outcome,
        SubmitOutcome::Accepted {
            directive: Some(crisis_comms::LedgerOutcome::Request(
                crisis_comms::RequestOutcome::Denied {
                    reason: crisis_comms::DenyReason::InTransit { until: 35_000 },
                    ..
                }
            )),
            ..
        }
    ));
}

// =============================================================================
// Views and Export
// =============================================================================

/// Test that snapshots are idempotent.
#[test]
fn test_snapshot_idempotent() {
    let mut game = GameController::start(GameConfig::default()).unwrap();
    game.submit_message(TeamId::Fire, "L→F3?");
    game.tick().unwrap();

    assert_eq!(game.snapshot(), game.snapshot());
}

/// Test that status snapshots are pushed every status period.
#[test]
fn test_status_events() {
    let mut game = GameController::start(quiet(SiteSetup::default())).unwrap();
    for _ in 0..60 {
        game.tick().unwrap();
    }

    let statuses: Vec<_> = game
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::Status(snap) => Some(snap),
            _ => None,
        })
        .collect();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].clock, secs(60));
}

/// Test that the report survives binary and JSON export.
#[test]
fn test_report_export() {
    let mut game = GameController::start(GameConfig::default()).unwrap();
    game.submit_message(TeamId::Fire, "L→F3?");
    game.submit_message(TeamId::Medical, "AMB1 F3?");
    game.submit_message(TeamId::Police, "RTE-RDY");
    game.tick().unwrap();

    let report = game.end();
    let decoded = Report::decode(&report.encode().unwrap()).unwrap();
    assert_eq!(decoded, report);

    let json = serde_json::to_string(&report).unwrap();
    let back: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(back.outcome, report.outcome);
    assert_eq!(back.messages.len(), 3);
    assert_eq!(back.teams[TeamId::Police].vocabulary, vec!["RDY", "RTE"]);
}

/// Test that a briefing reflects the caller's team.
#[test]
fn test_briefing_for_team() {
    let game = GameController::start(GameConfig::default()).unwrap();
    let text = game.briefing(TeamId::Police).to_string();

    assert!(text.starts_with("ROLE: POLICE (EVACUATION_CONTROL)"));
    assert!(text.contains("TRANSMISSIONS: 50 left, max 12 chars"));
}
