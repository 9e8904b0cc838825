//! Greedy steering policy for headless play
//!
//! Each decision looks one step ahead: moves that hit a wall or the body are
//! discarded, moves into a pocket smaller than the snake are avoided when
//! possible, and the rest are ranked by distance to food.

use std::collections::{HashSet, VecDeque};

use crate::input::accept_direction;
use crate::sim::{Direction, GameState, Grid, Position, is_out_of_bounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    direction: Direction,
    /// Free cells reachable from the new head
    room: usize,
    /// Manhattan distance to food in cells
    distance: i32,
}

/// Pick the next heading for `state`
///
/// Never returns the reverse of the current heading. If every move is fatal
/// the current heading is kept.
pub fn choose_direction(state: &GameState, grid: &Grid) -> Direction {
    let current = state.direction;
    let Some(head) = state.head() else {
        return current;
    };

    let candidates: Vec<Candidate> = Direction::ALL
        .iter()
        .filter_map(|&requested| accept_direction(current, requested))
        .filter_map(|direction| {
            let next = head.step(direction, grid.cell_size);
            let blocked = blocked_after_move(state, next);
            if is_out_of_bounds(next, grid) || blocked.contains(&next) {
                return None;
            }
            Some(Candidate {
                direction,
                room: reachable_cells(grid, next, &blocked),
                distance: cell_distance(next, state.food, grid.cell_size),
            })
        })
        .collect();

    let needed = state.len();
    let roomy = candidates.iter().filter(|c| c.room >= needed);
    let best = roomy
        .min_by_key(|c| (c.distance, c.direction != current))
        .or_else(|| {
            candidates
                .iter()
                .max_by_key(|c| (c.room, -c.distance, c.direction == current))
        });

    match best {
        Some(candidate) => candidate.direction,
        None => {
            log::debug!("Autopilot boxed in, keeping {}", current.as_str());
            current
        }
    }
}

/// Body cells that still block after the head moves to `next`
///
/// The tail vacates unless `next` is the food cell.
fn blocked_after_move(state: &GameState, next: Position) -> HashSet<Position> {
    let keep = if next == state.food {
        state.len()
    } else {
        state.len().saturating_sub(1)
    };
    state.snake.iter().take(keep).copied().collect()
}

/// Flood fill from `start` over free in-bounds cells
fn reachable_cells(grid: &Grid, start: Position, blocked: &HashSet<Position>) -> usize {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(pos) = queue.pop_front() {
        for direction in Direction::ALL {
            let next = pos.step(direction, grid.cell_size);
            if is_out_of_bounds(next, grid) || blocked.contains(&next) {
                continue;
            }
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.len()
}

fn cell_distance(a: Position, b: Position, cell_size: i32) -> i32 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()) / cell_size.max(1)
}
