//! Food placement

use rand::Rng;

use super::grid::{Grid, Position};
use crate::consts::MAX_FOOD_ATTEMPTS;

/// Pick a cell for the next food that the snake does not occupy
///
/// Draws uniformly over the board up to `MAX_FOOD_ATTEMPTS` times, then
/// falls back to the first free cell in row-major order so a crowded board
/// still terminates. Returns `None` only when every cell is occupied.
pub fn spawn_food<'a, R, I>(body: I, grid: &Grid, rng: &mut R) -> Option<Position>
where
    R: Rng,
    I: IntoIterator<Item = &'a Position>,
    I::IntoIter: Clone,
{
    let body = body.into_iter();
    let columns = grid.columns();
    let rows = grid.rows();
    if columns <= 0 || rows <= 0 {
        return None;
    }

    let occupied = |pos: Position| body.clone().any(|segment| *segment == pos);

    for _ in 0..MAX_FOOD_ATTEMPTS {
        let candidate = grid.cell(rng.random_range(0..columns), rng.random_range(0..rows));
        if !occupied(candidate) {
            return Some(candidate);
        }
    }

    let fallback = grid.cells().find(|cell| !occupied(*cell));
    if fallback.is_some() {
        log::debug!("Food spawn fell back to row-major scan");
    }
    fallback
}
