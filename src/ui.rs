//! What to paint
//!
//! A frame is described independently of any drawing API: the renderer turns
//! a `Scene` into quads and the shell copies the `Scoreboard` and overlay
//! text into DOM elements.

use crate::level_color_index;
use crate::sim::{GamePhase, GameState, Grid, Position};

/// Overlay text while paused after the game started
pub const PAUSED_TEXT: &str = "Paused";
/// Overlay text before the first direction key
pub const START_TEXT: &str = "Press Arrow Key to Start";

/// Message shown when an episode ends
pub fn game_over_message(score: u32) -> String {
    format!("Game Over! Your score: {}", score)
}

/// Labeled scoreboard lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: String,
    pub level: String,
    pub time: String,
}

impl Scoreboard {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: format!("Score: {}", state.score),
            level: format!("Level: {}", state.level),
            time: format!("Time: {}s", state.elapsed_time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Snake,
    Food,
}

/// One filled grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub pos: Position,
    pub kind: CellKind,
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub grid: Grid,
    /// Index into `LEVEL_COLORS`
    pub background: usize,
    /// Snake segments first (head first), food last
    pub cells: Vec<Cell>,
    /// Translucent mask text; `None` while running
    pub overlay: Option<&'static str>,
}

impl Scene {
    pub fn from_state(state: &GameState, grid: &Grid) -> Self {
        let mut cells: Vec<Cell> = state
            .snake
            .iter()
            .map(|&pos| Cell {
                pos,
                kind: CellKind::Snake,
            })
            .collect();
        cells.push(Cell {
            pos: state.food,
            kind: CellKind::Food,
        });

        Self {
            grid: *grid,
            background: level_color_index(state.level),
            cells,
            overlay: overlay_text(state),
        }
    }
}

/// Text for the pause mask, if the mask is shown
pub fn overlay_text(state: &GameState) -> Option<&'static str> {
    match state.phase() {
        GamePhase::Running => None,
        GamePhase::Paused => Some(PAUSED_TEXT),
        GamePhase::NotStarted | GamePhase::GameOver => Some(START_TEXT),
    }
}
