//! One simulation step
//!
//! Advances the snake a single cell and applies food, level and collision
//! rules. Timing lives with the caller; this module never schedules.

use rand::Rng;

use super::collision::{is_out_of_bounds, is_self_collision};
use super::food::spawn_food;
use super::grid::Grid;
use super::state::{EndCause, GameState};
use crate::consts::{POINTS_PER_LEVEL, SPEED_INCREMENT};

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Paused or not started; nothing moved
    Idle,
    /// Snake moved without eating
    Moved,
    /// Snake ate; `level_up` is set when the score hit a level boundary
    Ate { score: u32, level_up: bool },
    /// Episode over. `score` is the final score; the state is left as it
    /// was at the moment of the crash for the caller to report and reset.
    GameOver { score: u32, cause: EndCause },
}

/// Advance the game state by one cell
pub fn tick<R: Rng>(state: &mut GameState, grid: &Grid, rng: &mut R) -> TickOutcome {
    if !state.is_running() {
        return TickOutcome::Idle;
    }
    let Some(head) = state.head() else {
        return TickOutcome::Idle;
    };

    let new_head = head.step(state.direction, grid.cell_size);
    state.snake.push_front(new_head);

    let mut outcome = TickOutcome::Moved;
    if new_head == state.food {
        state.score += 1;

        let level_up = state.score % POINTS_PER_LEVEL == 0;
        if level_up {
            state.level += 1;
            state.speed *= 1.0 - SPEED_INCREMENT;
            log::info!("Level {} reached (tick {:.1} ms)", state.level, state.speed);
        }

        match spawn_food(&state.snake, grid, rng) {
            Some(food) => state.food = food,
            None => {
                return TickOutcome::GameOver {
                    score: state.score,
                    cause: EndCause::BoardFull,
                };
            }
        }

        outcome = TickOutcome::Ate {
            score: state.score,
            level_up,
        };
    } else {
        state.snake.pop_back();
    }

    if is_out_of_bounds(new_head, grid) {
        return TickOutcome::GameOver {
            score: state.score,
            cause: EndCause::Wall,
        };
    }
    if is_self_collision(new_head, &state.snake) {
        return TickOutcome::GameOver {
            score: state.score,
            cause: EndCause::SelfCollision,
        };
    }

    outcome
}
