use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::GridSize;
use crate::engine::{GameEngine, Snapshot, TickOutcome};
use crate::error::EngineError;
use crate::input::GameInput;
use crate::snake::Cell;

/// Fixed-delay scheduler deciding when the next tick is due.
///
/// Each fired tick schedules the next one a full interval after the moment it
/// was handled, so a slow frame delays the cadence instead of bunching ticks.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    interval: Duration,
    next_due: Instant,
}

impl Cadence {
    /// Starts a cadence whose first tick is due one interval after `now`.
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    /// Records a fired tick and schedules the next one.
    pub fn mark(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }

    /// Returns how long until the next tick, zero when already due.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    /// Starts over as if freshly created at `now`.
    pub fn restart(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }
}

/// What the driver loop should do after handling an input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One play session: the engine, its cadence, and the restart parameters.
#[derive(Debug, Clone)]
pub struct Session {
    engine: GameEngine,
    cadence: Cadence,
    bounds: GridSize,
    start: Cell,
}

impl Session {
    #[must_use]
    pub fn new(engine: GameEngine, start: Cell, tick_interval: Duration, now: Instant) -> Self {
        let bounds = engine.bounds();
        Self {
            engine,
            cadence: Cadence::new(tick_interval, now),
            bounds,
            start,
        }
    }

    /// Dispatches one input event.
    ///
    /// Restart is only honoured once the run has ended.
    pub fn handle_input(&mut self, input: GameInput, now: Instant) -> Result<Flow, EngineError> {
        match input {
            GameInput::Direction(direction) => {
                self.engine.set_direction(direction);
            }
            GameInput::Restart if self.engine.is_running() => {
                debug!("ignored restart during a live run");
            }
            GameInput::Restart => self.restart(now)?,
            GameInput::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Runs a tick when the cadence says one is due.
    ///
    /// Nothing is scheduled once the run has ended; a restart resumes the
    /// cadence.
    pub fn update(&mut self, now: Instant) -> Option<TickOutcome> {
        if !self.engine.is_running() || !self.cadence.is_due(now) {
            return None;
        }

        self.cadence.mark(now);
        Some(self.engine.tick())
    }

    /// Resets the engine and restarts the cadence.
    pub fn restart(&mut self, now: Instant) -> Result<(), EngineError> {
        self.engine.reset(self.bounds, self.start)?;
        self.cadence.restart(now);
        info!("session restarted");
        Ok(())
    }

    /// Time the loop may block before the next tick, or `None` while stopped.
    #[must_use]
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.engine
            .is_running()
            .then(|| self.cadence.time_until_due(now))
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    #[must_use]
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::config::GridSize;
    use crate::engine::{EndReason, GameEngine, TickOutcome};
    use crate::input::{Direction, GameInput};
    use crate::snake::Cell;

    use super::{Cadence, Flow, Session};

    const STEP: Duration = Duration::from_millis(150);

    fn session(width: u16, height: u16, start: Cell, now: Instant) -> Session {
        let engine = GameEngine::with_seed(GridSize { width, height }, start, 8)
            .expect("test grid should be valid");
        Session::new(engine, start, STEP, now)
    }

    #[test]
    fn cadence_fires_only_after_interval() {
        let start = Instant::now();
        let mut cadence = Cadence::new(STEP, start);

        assert!(!cadence.is_due(start));
        assert!(!cadence.is_due(start + Duration::from_millis(149)));
        assert!(cadence.is_due(start + STEP));

        cadence.mark(start + Duration::from_millis(160));
        assert!(!cadence.is_due(start + Duration::from_millis(300)));
        assert!(cadence.is_due(start + Duration::from_millis(310)));
    }

    #[test]
    fn cadence_reports_remaining_time() {
        let start = Instant::now();
        let cadence = Cadence::new(STEP, start);

        assert_eq!(
            cadence.time_until_due(start + Duration::from_millis(50)),
            Duration::from_millis(100)
        );
        assert_eq!(cadence.time_until_due(start + STEP * 2), Duration::ZERO);
    }

    #[test]
    fn session_ticks_once_per_interval() {
        let now = Instant::now();
        let mut session = session(20, 20, Cell::new(10, 10), now);
        session
            .handle_input(GameInput::Direction(Direction::Right), now)
            .expect("direction input never fails");

        assert_eq!(session.update(now + Duration::from_millis(10)), None);
        assert!(session.update(now + STEP).is_some());
        assert_eq!(session.update(now + STEP + Duration::from_millis(20)), None);
        assert!(session.update(now + STEP * 2).is_some());

        assert_eq!(session.snapshot().snake[0], Cell::new(12, 10));
    }

    #[test]
    fn session_stops_ticking_after_end_and_resumes_on_restart() {
        let now = Instant::now();
        let mut session = session(3, 3, Cell::new(0, 0), now);
        session
            .handle_input(GameInput::Direction(Direction::Up), now)
            .expect("direction input never fails");

        assert_eq!(
            session.update(now + STEP),
            Some(TickOutcome::Ended(EndReason::WallCollision))
        );
        assert_eq!(session.time_until_tick(now + STEP), None);
        assert_eq!(session.update(now + STEP * 5), None);

        let later = now + STEP * 6;
        assert_eq!(
            session.handle_input(GameInput::Restart, later),
            Ok(Flow::Continue)
        );
        assert!(session.engine().is_running());
        assert_eq!(session.time_until_tick(later), Some(STEP));
    }

    #[test]
    fn restart_is_ignored_while_the_run_is_live() {
        let now = Instant::now();
        let mut session = session(20, 20, Cell::new(5, 5), now);
        session
            .handle_input(GameInput::Direction(Direction::Right), now)
            .expect("direction input never fails");
        session.update(now + STEP);
        session.update(now + STEP * 2);
        let live = session.snapshot();
        assert!(live.running);
        assert_eq!(live.snake[0], Cell::new(7, 5));

        assert_eq!(
            session.handle_input(GameInput::Restart, now + STEP * 2),
            Ok(Flow::Continue)
        );
        assert_eq!(session.snapshot(), live);
        assert_eq!(
            session.time_until_tick(now + STEP * 2),
            Some(STEP),
            "cadence keeps its schedule"
        );
    }

    #[test]
    fn quit_input_stops_the_loop() {
        let now = Instant::now();
        let mut session = session(5, 5, Cell::new(2, 2), now);

        assert_eq!(session.handle_input(GameInput::Quit, now), Ok(Flow::Quit));
    }
}
