//! Thread-safe access and a wall-clock tick driver.
//!
//! [`SharedGame`] puts the controller behind one mutex; every operation
//! takes the lock for its whole duration, so transmissions and ticks never
//! interleave. [`TickDriver`] runs ticks on its own thread at a fixed
//! wall-clock period and forwards events to observers over `mpsc` channels.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, warn};

use super::controller::{GameController, LedgerOutcome, SubmitOutcome, TickOutcome};
use super::events::GameEvent;
use super::report::{Outcome, Report};
use super::snapshot::Snapshot;
use crate::core::{ConfigError, GameConfig, GameError, LocationId, TeamId};
use crate::ledger::ResourceId;

/// A controller shared between threads.
#[derive(Clone, Debug)]
pub struct SharedGame {
    inner: Arc<Mutex<GameController>>,
}

impl SharedGame {
    #[must_use]
    pub fn new(controller: GameController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Validate `config` and start a shared exercise.
    pub fn start(config: GameConfig) -> Result<Self, ConfigError> {
        GameController::start(config).map(Self::new)
    }

    // A panic while locked cannot leave a half-applied tick behind, so a
    // poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, GameController> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the controller.
    pub fn with<R>(&self, f: impl FnOnce(&mut GameController) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn submit_message(&self, team: TeamId, text: &str) -> SubmitOutcome {
        self.lock().submit_message(team, text)
    }

    pub fn request_resource(
        &self,
        team: TeamId,
        resource: ResourceId,
        location: LocationId,
    ) -> LedgerOutcome {
        self.lock().request_resource(team, resource, location)
    }

    pub fn release_resource(&self, team: TeamId, resource: ResourceId) -> LedgerOutcome {
        self.lock().release_resource(team, resource)
    }

    pub fn tick(&self) -> Result<TickOutcome, GameError> {
        self.lock().tick()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    pub fn end(&self) -> Report {
        self.lock().end()
    }

    pub fn drain_events(&self) -> Vec<GameEvent> {
        self.lock().drain_events()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.lock().outcome()
    }
}

/// Ticks a [`SharedGame`] on a background thread.
///
/// The driver drains the controller's events after every tick, so while it
/// runs it is the only consumer of the outbox. A failed tick stops the
/// driver: the state it failed on would fail the same way again.
#[derive(Debug)]
pub struct TickDriver {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<Option<Outcome>, GameError>>>,
}

impl TickDriver {
    /// Start ticking every `period` of wall-clock time.
    pub fn spawn(
        game: SharedGame,
        period: Duration,
        observers: Vec<Sender<GameEvent>>,
    ) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("tick-driver".into())
            .spawn(move || run(&game, period, observers, &flag))?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Has the driver thread exited?
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop ticking and wait for the thread. Returns the outcome if the
    /// exercise ended while the driver was running it.
    pub fn stop(mut self) -> Result<Option<Outcome>, GameError> {
        self.stop.store(true, Ordering::SeqCst);
        self.join_thread()
    }

    /// Wait for the exercise to end on its own, or for a tick to fail.
    pub fn join(mut self) -> Result<Option<Outcome>, GameError> {
        self.join_thread()
    }

    fn join_thread(&mut self) -> Result<Option<Outcome>, GameError> {
        let Some(handle) = self.handle.take() else {
            return Ok(None);
        };
        handle.join().unwrap_or_else(|_| {
            warn!("tick driver thread panicked");
            Ok(None)
        })
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Err(err) = self.join_thread() {
            debug!("tick driver dropped after failure: {err}");
        }
    }
}

fn broadcast(observers: &mut Vec<Sender<GameEvent>>, event: &GameEvent) {
    observers.retain(|tx| match tx.send(event.clone()) {
        Ok(()) => true,
        Err(_) => {
            warn!("observer disconnected; dropping it");
            false
        }
    });
}

fn run(
    game: &SharedGame,
    period: Duration,
    mut observers: Vec<Sender<GameEvent>>,
    stop: &AtomicBool,
) -> Result<Option<Outcome>, GameError> {
    while !stop.load(Ordering::SeqCst) {
        thread::sleep(period);
        if stop.load(Ordering::SeqCst) {
            break;
        }

        let (result, events, clock) = game.with(|c| (c.tick(), c.drain_events(), c.clock()));
        for event in &events {
            broadcast(&mut observers, event);
        }

        match result {
            Ok(TickOutcome::Finished(outcome)) => {
                debug!("tick driver finished: {outcome}");
                return Ok(Some(outcome));
            }
            Ok(TickOutcome::Running { .. }) => {}
            Err(err) => {
                error!("tick failed at {clock} ms, stopping driver: {err}");
                if let GameError::Invariant(reason) = &err {
                    let aborted = GameEvent::Aborted {
                        at: clock,
                        reason: reason.clone(),
                    };
                    broadcast(&mut observers, &aborted);
                }
                return Err(err);
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{secs, InvariantViolation};
    use crate::crisis::FlashPlan;
    use std::sync::mpsc;

    #[test]
    fn test_driver_runs_to_completion() {
        let config = GameConfig::default()
            .with_duration(secs(5))
            .with_flashes(FlashPlan::Disabled);
        let game = SharedGame::start(config).unwrap();
        let (tx, rx) = mpsc::channel();

        let driver = TickDriver::spawn(game.clone(), Duration::from_millis(1), vec![tx]).unwrap();
        let outcome = driver.join();

        assert_eq!(outcome, Ok(Some(Outcome::TimeoutFail)));
        assert_eq!(game.outcome(), Some(Outcome::TimeoutFail));
        let events: Vec<_> = rx.try_iter().collect();
        assert!(events.last().is_some_and(GameEvent::is_terminal));
    }

    #[test]
    fn test_driver_stop() {
        let game = SharedGame::start(GameConfig::default()).unwrap();
        let driver = TickDriver::spawn(game.clone(), Duration::from_millis(1), Vec::new()).unwrap();

        assert_eq!(driver.stop(), Ok(None));
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn test_dropped_observer_is_harmless() {
        let config = GameConfig::default().with_duration(secs(3));
        let game = SharedGame::start(config).unwrap();
        let (tx, rx) = mpsc::channel();
        drop(rx);

        let driver = TickDriver::spawn(game, Duration::from_millis(1), vec![tx]).unwrap();
        assert_eq!(driver.join(), Ok(Some(Outcome::TimeoutFail)));
    }

    #[test]
    fn test_driver_stops_on_failed_tick() {
        let mut controller = GameController::start(GameConfig::default()).unwrap();
        controller.state_mut().crisis.rescued += 1;
        let game = SharedGame::new(controller);
        let (tx, rx) = mpsc::channel();

        let driver = TickDriver::spawn(game.clone(), Duration::from_millis(1), vec![tx]).unwrap();
        let result = driver.join();

        assert!(matches!(
            result,
            Err(GameError::Invariant(InvariantViolation::VictimsUnaccounted { .. }))
        ));
        assert_eq!(game.with(|c| c.clock()), 0);
        assert_eq!(game.outcome(), None);
        let events: Vec<_> = rx.try_iter().collect();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::Aborted {
                at: 0,
                reason: InvariantViolation::VictimsUnaccounted { .. }
            }]
        ));
    }
}
