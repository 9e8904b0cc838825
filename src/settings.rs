//! Game settings and preferences
//!
//! Persisted separately from the session snapshot, under its own key.

use serde::{Deserialize, Serialize};

use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH, CELL_SIZE, START_HEAD_CELL};
use crate::persistence::{Storage, StorageError};
use crate::sim::Grid;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    /// Board width in pixels
    pub board_width: i32,
    /// Board height in pixels
    pub board_height: i32,
    /// Cell edge in pixels
    pub cell_size: i32,
    /// Fixed RNG seed (random per session when unset)
    pub seed: Option<u64>,

    // === Input ===
    /// Touch zones steer the snake
    pub touch_controls: bool,
    /// Mouse clicks steer the snake
    pub mouse_controls: bool,

    // === Shell ===
    /// Pause when the tab is hidden or the window loses focus
    pub auto_pause: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            cell_size: CELL_SIZE,
            seed: None,

            touch_controls: true,
            mouse_controls: false,

            auto_pause: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "snake_settings";

    /// Board geometry described by these settings
    pub fn grid(&self) -> Grid {
        Grid::new(self.board_width, self.board_height, self.cell_size)
    }

    /// Check that the board can hold the starting snake with room to move
    pub fn validate(&self) -> Result<(), String> {
        if self.cell_size <= 0 {
            return Err(format!("cell size {} must be positive", self.cell_size));
        }
        if self.board_width % self.cell_size != 0 || self.board_height % self.cell_size != 0 {
            return Err(format!(
                "board {}x{} is not a whole number of {}px cells",
                self.board_width, self.board_height, self.cell_size
            ));
        }
        let grid = self.grid();
        let (head_col, head_row) = START_HEAD_CELL;
        // Head cell plus one free column ahead of it
        if grid.columns() < head_col + 2 || grid.rows() < head_row + 1 {
            return Err(format!(
                "board of {}x{} cells is too small",
                grid.columns(),
                grid.rows()
            ));
        }
        Ok(())
    }

    /// Load settings, falling back to defaults on anything unusable
    pub fn load<S: Storage>(storage: &S) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => match settings.validate() {
                    Ok(()) => {
                        log::info!("Loaded settings");
                        return settings;
                    }
                    Err(reason) => log::warn!("Ignoring stored settings: {}", reason),
                },
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings
    pub fn save<S: Storage>(&self, storage: &mut S) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)
            .map_err(|e| StorageError::Rejected(e.to_string()))?;
        storage.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
