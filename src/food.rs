use std::collections::HashSet;

use log::debug;
use rand::Rng;

use crate::config::{FOOD_SAMPLE_ATTEMPTS, GridSize};
use crate::snake::{Cell, Snake};

/// Picks a free cell uniformly at random.
///
/// While the snake covers less than half of the board this probes random
/// cells and keeps the first free one. Past that, or once the probes run
/// out, it samples directly from the enumerated free cells. Returns `None`
/// when the snake covers the whole board.
pub fn place_food<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize, snake: &Snake) -> Option<Cell> {
    let total = bounds.total_cells();
    if snake.len() >= total {
        return None;
    }

    if snake.len() * 2 < total {
        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let candidate = random_cell(rng, bounds);
            if !snake.occupies(candidate) {
                return Some(candidate);
            }
        }
        debug!(
            "food sampling missed {FOOD_SAMPLE_ATTEMPTS} times, enumerating free cells"
        );
    }

    let candidates = free_cells(bounds, snake);
    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

/// Returns every cell not occupied by the snake, row by row.
#[must_use]
pub fn free_cells(bounds: GridSize, snake: &Snake) -> Vec<Cell> {
    let occupied: HashSet<Cell> = snake.cells().copied().collect();
    let mut candidates = Vec::with_capacity(bounds.total_cells().saturating_sub(occupied.len()));

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let cell = Cell { x, y };
            if !occupied.contains(&cell) {
                candidates.push(cell);
            }
        }
    }

    candidates
}

fn random_cell<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize) -> Cell {
    Cell {
        x: rng.gen_range(0..i32::from(bounds.width)),
        y: rng.gen_range(0..i32::from(bounds.height)),
    }
}
