//! Resource ledger integration tests.
//!
//! Contention, release, and expiry as seen through the controller.

use crisis_comms::core::{secs, GameConfig, LocationId, SiteSetup, TeamId};
use crisis_comms::crisis::FlashPlan;
use crisis_comms::game::{GameController, GameEvent, LedgerOutcome};
use crisis_comms::ledger::{DenyReason, ReleaseOutcome, RequestOutcome, ResourceId};

fn quiet() -> GameController {
    let config = GameConfig::default()
        .with_site(SiteSetup::empty().with_victims(LocationId::WestWing, 20))
        .with_flashes(FlashPlan::Disabled);
    GameController::start(config).unwrap()
}

/// Test that a held resource is denied to everyone else until released.
#[test]
fn test_contention_without_revocation() {
    let mut game = quiet();

    let first = game.request_resource(TeamId::Medical, ResourceId::Ambulance1, LocationId::Lobby);
    assert!(matches!(first, LedgerOutcome::Request(RequestOutcome::Granted { .. })));

    for team in [TeamId::Fire, TeamId::Police, TeamId::Medical] {
        assert_eq!(
            game.request_resource(team, ResourceId::Ambulance1, LocationId::Floor2),
            LedgerOutcome::Request(RequestOutcome::Denied {
                resource: ResourceId::Ambulance1,
                reason: DenyReason::AlreadyHeld { holder: TeamId::Medical },
            })
        );
    }
    assert_eq!(
        game.state().ledger.get(ResourceId::Ambulance1).location,
        Some(LocationId::Lobby)
    );
}

/// Test that release clears the position and frees the resource.
#[test]
fn test_release_then_regrant() {
    let mut game = quiet();
    game.request_resource(TeamId::Fire, ResourceId::Ladder, LocationId::Floor4);
    game.tick().unwrap();

    assert_eq!(
        game.release_resource(TeamId::Fire, ResourceId::Ladder),
        LedgerOutcome::Release(ReleaseOutcome::Released {
            resource: ResourceId::Ladder,
            from: TeamId::Fire,
        })
    );
    let ladder = game.state().ledger.get(ResourceId::Ladder);
    assert_eq!((ladder.holder, ladder.location), (None, None));
    assert_eq!(ladder.busy_until, secs(1));

    let again = game.request_resource(TeamId::Police, ResourceId::Ladder, LocationId::Floor3);
    assert!(matches!(again, LedgerOutcome::Request(RequestOutcome::Granted { .. })));
}

/// Test that releasing a free resource is refused.
#[test]
fn test_release_free_resource() {
    let mut game = quiet();

    assert_eq!(
        game.release_resource(TeamId::Police, ResourceId::Route),
        LedgerOutcome::Release(ReleaseOutcome::NotHolder {
            resource: ResourceId::Route,
            holder: None,
        })
    );
}

/// Test that expiry emits a release event and frees the resource for others.
#[test]
fn test_expiry_frees_resource() {
    let config = GameConfig::default()
        .with_site(SiteSetup::empty().with_victims(LocationId::WestWing, 20))
        .with_flashes(FlashPlan::Disabled)
        .with_usage_duration(secs(3));
    let mut game = GameController::start(config).unwrap();
    game.request_resource(TeamId::Medical, ResourceId::Ambulance2, LocationId::WestWing);

    for _ in 0..3 {
        game.tick().unwrap();
    }

    let released: Vec<_> = game
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::ResourceReleased { expired: true, .. }))
        .collect();
    assert_eq!(released.len(), 1);
    // Rescued on ticks one and two only.
    assert_eq!(game.snapshot().rescued, 4);

    let regrant = game.request_resource(TeamId::Police, ResourceId::Ambulance2, LocationId::Lobby);
    assert!(matches!(regrant, LedgerOutcome::Request(RequestOutcome::Granted { .. })));
}

/// Test that resource utilisation is reported.
#[test]
fn test_utilisation_in_report() {
    let mut game = quiet();
    game.request_resource(TeamId::Fire, ResourceId::Ladder, LocationId::Floor1);
    game.request_resource(TeamId::Police, ResourceId::Route, LocationId::Exterior);
    for _ in 0..10 {
        game.tick().unwrap();
    }

    let report = game.end();
    // Two of four resources held the whole time.
    assert!((report.efficiency.resource_utilisation - 0.5).abs() < 1e-9);
}
