//! Grid Snake - a tick-driven snake game
//!
//! Core modules:
//! - `sim`: Simulation (grid geometry, food, collisions, tick rules)
//! - `game`: State machine driver that owns the tick loop and persistence
//! - `input`: Keyboard/pointer/touch mapping to game commands
//! - `persistence`: Session snapshot save/load over a key-value store
//! - `platform`: Concrete storage back ends (LocalStorage, files)
//! - `renderer`: WebGPU rendering pipeline
//! - `ui`: Scene and scoreboard description consumed by the renderer/HUD
//! - `autopilot`: Steering policy for the headless runner

pub mod autopilot;
pub mod clock;
pub mod game;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::{Game, GameEvent};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Edge length of one grid cell in board pixels
    pub const CELL_SIZE: i32 = 20;

    /// Default board dimensions (pixels)
    pub const BOARD_WIDTH: i32 = 400;
    pub const BOARD_HEIGHT: i32 = 400;

    /// Tick interval at level 1 (milliseconds)
    pub const BASE_SPEED_MS: f64 = 250.0;
    /// Fractional speed-up applied on every level-up
    pub const SPEED_INCREMENT: f64 = 0.05;
    /// Score needed per level
    pub const POINTS_PER_LEVEL: u32 = 30;

    /// Period of the elapsed-time ticker (milliseconds)
    pub const ELAPSED_TICK_MS: f64 = 1000.0;

    /// Initial snake length
    pub const START_LENGTH: i32 = 3;
    /// Grid cell of the initial head (column, row)
    pub const START_HEAD_CELL: (i32, i32) = (5, 5);

    /// Random draws before the food spawner falls back to a scan
    pub const MAX_FOOD_ATTEMPTS: u32 = 64;

    /// Background palette, cycled by level
    pub const LEVEL_COLORS: [&str; 7] = [
        "#f0f0f0", "#ffcccc", "#ccffcc", "#ccccff", "#ffffcc", "#ffccff", "#ccffff",
    ];
}

/// Palette index for a level's background colour
#[inline]
pub fn level_color_index(level: u32) -> usize {
    (level.max(1) as usize - 1) % consts::LEVEL_COLORS.len()
}

/// Background colour (CSS hex) for a level
#[inline]
pub fn level_color(level: u32) -> &'static str {
    consts::LEVEL_COLORS[level_color_index(level)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_color_cycles_through_palette() {
        assert_eq!(level_color_index(1), 0);
        assert_eq!(level_color_index(2), 1);
        assert_eq!(level_color_index(7), 6);
        assert_eq!(level_color_index(8), 0);
        assert_eq!(level_color(1), "#f0f0f0");
        assert_eq!(level_color(2), "#ffcccc");
    }
}
