//! Game state and core simulation types
//!
//! Everything that must survive a reload lives in `GameState`; its serde
//! form is the persisted session snapshot.

use std::collections::{HashSet, VecDeque};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::food::spawn_food;
use super::grid::{Direction, Grid, Position};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Fresh board, waiting for the first direction key
    NotStarted,
    /// Ticks advance the snake
    Running,
    /// Started but frozen
    Paused,
    /// Episode ended; only observable through the game-over event
    GameOver,
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    /// Head left the board
    Wall,
    /// Head ran into the body
    SelfCollision,
    /// No free cell was left for food
    BoardFull,
}

impl EndCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndCause::Wall => "wall",
            EndCause::SelfCollision => "self",
            EndCause::BoardFull => "board full",
        }
    }
}

/// Complete session state (serializable snapshot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Body segments, head first
    pub snake: VecDeque<Position>,
    pub direction: Direction,
    pub food: Position,
    pub score: u32,
    pub level: u32,
    /// Tick interval in milliseconds
    pub speed: f64,
    pub is_paused: bool,
    pub game_started: bool,
    /// Whole seconds played
    pub elapsed_time: u64,
}

impl GameState {
    /// Fresh board: short snake heading right, paused until the first key
    pub fn new<R: Rng>(grid: &Grid, rng: &mut R) -> Self {
        let (col, row) = START_HEAD_CELL;
        let snake: VecDeque<Position> = (0..START_LENGTH)
            .map(|i| grid.cell(col - i, row))
            .collect();
        // Defaults always leave free cells on any board the settings accept
        let food = spawn_food(&snake, grid, rng).unwrap_or_else(|| grid.cell(0, 0));

        Self {
            snake,
            direction: Direction::Right,
            food,
            score: 0,
            level: 1,
            speed: BASE_SPEED_MS,
            is_paused: true,
            game_started: false,
            elapsed_time: 0,
        }
    }

    /// Phase derived from the persisted flags
    pub fn phase(&self) -> GamePhase {
        if !self.game_started {
            GamePhase::NotStarted
        } else if self.is_paused {
            GamePhase::Paused
        } else {
            GamePhase::Running
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase() == GamePhase::Running
    }

    pub fn head(&self) -> Option<Position> {
        self.snake.front().copied()
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.snake.contains(&pos)
    }

    /// Check that a loaded snapshot can be played on `grid`
    pub fn validate(&self, grid: &Grid) -> Result<(), String> {
        if self.snake.is_empty() {
            return Err("snake has no segments".into());
        }
        let on_board = |p: &Position| grid.contains(*p) && grid.is_aligned(*p);
        if let Some(bad) = self.snake.iter().find(|p| !on_board(p)) {
            return Err(format!("segment ({}, {}) is off the grid", bad.x, bad.y));
        }
        if !on_board(&self.food) {
            return Err(format!("food ({}, {}) is off the grid", self.food.x, self.food.y));
        }
        let mut seen = HashSet::with_capacity(self.snake.len());
        if let Some(dup) = self.snake.iter().find(|p| !seen.insert(**p)) {
            return Err(format!("segment ({}, {}) appears twice", dup.x, dup.y));
        }
        if let Some((a, b)) = self
            .snake
            .iter()
            .zip(self.snake.iter().skip(1))
            .find(|(a, b)| !grid.adjacent(**a, **b))
        {
            return Err(format!(
                "segments ({}, {}) and ({}, {}) are not adjacent",
                a.x, a.y, b.x, b.y
            ));
        }
        if self.occupies(self.food) {
            return Err(format!("food ({}, {}) is inside the snake", self.food.x, self.food.y));
        }
        if self.level == 0 {
            return Err("level must start at 1".into());
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(format!("speed {} is not a positive duration", self.speed));
        }
        Ok(())
    }
}
