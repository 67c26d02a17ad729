use std::collections::HashSet;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::GridSize;
use crate::error::EngineError;
use crate::food;
use crate::input::{Direction, direction_change_is_valid};
use crate::snake::{Cell, Snake};

/// Whether the current run is still being simulated.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RunState {
    Running,
    Ended,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, so no food can be placed. Counts as a win.
    BoardFilled,
}

/// What a single [`GameEngine::tick`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// The run had already ended; nothing changed.
    Frozen,
    /// No direction has been chosen yet; the snake stays put.
    Idle,
    Moved,
    Ate,
    Ended(EndReason),
}

/// Complete mutable state for one run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub direction: Direction,
    pub pending_direction: Direction,
    pub food: Option<Cell>,
    pub score: u32,
    pub run: RunState,
    pub end_reason: Option<EndReason>,
    pub tick_count: u64,
    bounds: GridSize,
}

impl GameState {
    fn fresh(bounds: GridSize, start: Cell) -> Self {
        Self {
            snake: Snake::new(start),
            direction: Direction::None,
            pending_direction: Direction::None,
            food: None,
            score: 0,
            run: RunState::Running,
            end_reason: None,
            tick_count: 0,
            bounds,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run == RunState::Running
    }

    fn end(&mut self, reason: EndReason) {
        self.run = RunState::Ended;
        self.end_reason = Some(reason);
        info!(
            "run ended: {reason:?} after {} ticks, score {}, length {}",
            self.tick_count,
            self.score,
            self.snake.len()
        );
    }
}

/// Read-only copy of the state handed to the renderer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub snake: Vec<Cell>,
    pub food: Option<Cell>,
    pub score: u32,
    pub running: bool,
    pub end_reason: Option<EndReason>,
    pub direction: Direction,
    pub bounds: GridSize,
}

/// Owns the game state and advances it one tick at a time.
#[derive(Debug, Clone)]
pub struct GameEngine {
    state: GameState,
    rng: StdRng,
}

impl GameEngine {
    /// Creates an engine seeded from OS entropy and resets it.
    pub fn new(bounds: GridSize, start: Cell) -> Result<Self, EngineError> {
        Self::with_rng(bounds, start, StdRng::from_entropy())
    }

    /// Creates a deterministic engine for tests and reproducible sessions.
    pub fn with_seed(bounds: GridSize, start: Cell, seed: u64) -> Result<Self, EngineError> {
        Self::with_rng(bounds, start, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: GridSize, start: Cell, rng: StdRng) -> Result<Self, EngineError> {
        let mut engine = Self {
            state: GameState::fresh(bounds, start),
            rng,
        };
        engine.reset(bounds, start)?;
        Ok(engine)
    }

    /// Replaces the state with a fresh run.
    ///
    /// On error the previous state is left untouched. A board too small to
    /// hold any food starts out already ended with [`EndReason::BoardFilled`].
    pub fn reset(&mut self, bounds: GridSize, start: Cell) -> Result<(), EngineError> {
        check_reset_args(bounds, start)?;

        self.state = GameState::fresh(bounds, start);
        info!(
            "reset: {}x{} grid, start ({}, {})",
            bounds.width, bounds.height, start.x, start.y
        );

        match self.next_food() {
            Some(cell) => self.state.food = Some(cell),
            None => self.state.end(EndReason::BoardFilled),
        }

        Ok(())
    }

    /// Requests a new direction for the next tick.
    ///
    /// The reversal check compares against the direction committed by the
    /// last tick, so two quick turns cannot add up to a 180° turn before the
    /// snake has moved. Returns whether the request was accepted.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if !self.state.is_running() {
            return false;
        }

        if !direction_change_is_valid(self.state.direction, requested) {
            debug!(
                "rejected direction {requested:?} while moving {:?}",
                self.state.direction
            );
            return false;
        }

        self.state.pending_direction = requested;
        true
    }

    /// Advances the simulation by one step.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Frozen;
        }

        self.state.direction = self.state.pending_direction;
        if self.state.direction.is_none() {
            return TickOutcome::Idle;
        }

        self.state.tick_count += 1;
        let new_head = self.state.snake.head().offset(self.state.direction);

        if !new_head.is_within_bounds(self.state.bounds) {
            self.state.end(EndReason::WallCollision);
            return TickOutcome::Ended(EndReason::WallCollision);
        }

        // The tail still counts as occupied even though it would move away
        // this tick.
        if self.state.snake.occupies(new_head) {
            self.state.end(EndReason::SelfCollision);
            return TickOutcome::Ended(EndReason::SelfCollision);
        }

        let ate = self.state.food == Some(new_head);
        self.state.snake.advance(new_head, ate);
        if !ate {
            return TickOutcome::Moved;
        }

        self.state.score += 1;
        match self.next_food() {
            Some(cell) => {
                self.state.food = Some(cell);
                TickOutcome::Ate
            }
            None => {
                self.state.food = None;
                self.state.end(EndReason::BoardFilled);
                TickOutcome::Ended(EndReason::BoardFilled)
            }
        }
    }

    /// Picks a free cell for food without assigning it.
    pub fn place_food(&mut self) -> Result<Cell, EngineError> {
        self.next_food().ok_or(EngineError::NoFreeCellForFood)
    }

    fn next_food(&mut self) -> Option<Cell> {
        food::place_food(&mut self.rng, self.state.bounds, &self.state.snake)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.state.snake.to_vec(),
            food: self.state.food,
            score: self.state.score,
            running: self.state.is_running(),
            end_reason: self.state.end_reason,
            direction: self.state.direction,
            bounds: self.state.bounds,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.state.snake
    }

    #[must_use]
    pub fn food(&self) -> Option<Cell> {
        self.state.food
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.state.score
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.state.pending_direction
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.state.end_reason
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.state.bounds
    }

    /// Replaces snake, heading and food in one go, keeping score and run
    /// state. Used to set up exact board positions in tests.
    ///
    /// The layout is rejected unless every cell is on the board, the snake
    /// does not overlap itself, and the food sits on a free cell. A running
    /// engine must be given food.
    #[doc(hidden)]
    pub fn stage(
        &mut self,
        snake: Snake,
        direction: Direction,
        food: Option<Cell>,
    ) -> Result<(), EngineError> {
        let bounds = self.state.bounds;
        if !snake.cells().all(|cell| cell.is_within_bounds(bounds)) {
            return Err(EngineError::InvalidLayout("snake leaves the grid"));
        }

        let unique: HashSet<Cell> = snake.cells().copied().collect();
        if unique.len() != snake.len() {
            return Err(EngineError::InvalidLayout("snake overlaps itself"));
        }

        match food {
            Some(cell) if !cell.is_within_bounds(bounds) || unique.contains(&cell) => {
                return Err(EngineError::InvalidLayout("food is not on a free cell"));
            }
            None if self.state.is_running() => {
                return Err(EngineError::InvalidLayout("running game needs food"));
            }
            _ => {}
        }

        self.state.snake = snake;
        self.state.direction = direction;
        self.state.pending_direction = direction;
        self.state.food = food;
        Ok(())
    }
}

fn check_reset_args(bounds: GridSize, start: Cell) -> Result<(), EngineError> {
    if !bounds.is_valid() {
        return Err(EngineError::InvalidBounds {
            width: bounds.width,
            height: bounds.height,
        });
    }

    if !start.is_within_bounds(bounds) {
        return Err(EngineError::StartOutOfBounds { start, bounds });
    }

    Ok(())
}
