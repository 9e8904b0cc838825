//! Session persistence
//!
//! Features:
//! - Plain JSON snapshot under a fixed key
//! - Validation on load (a bad snapshot reads as "no save")
//! - Storage back ends behind the `Storage` trait

pub mod memory;

pub use memory::MemoryStorage;

use thiserror::Error;

use crate::sim::{GameState, Grid};

/// Key the session snapshot is stored under
pub const SESSION_KEY: &str = "snakeGame";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage rejected write: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid snapshot: {0}")]
    Invalid(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// String key-value store (LocalStorage semantics)
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Reads and writes the session snapshot
#[derive(Debug)]
pub struct SessionStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Overwrite the stored snapshot
    pub fn save(&mut self, state: &GameState) -> PersistenceResult<()> {
        let json = serde_json::to_string(state)?;
        self.storage.set_item(SESSION_KEY, &json)?;
        Ok(())
    }

    /// Read the stored snapshot, distinguishing "absent" from "broken"
    pub fn try_load(&self, grid: &Grid) -> PersistenceResult<Option<GameState>> {
        let Some(json) = self.storage.get_item(SESSION_KEY)? else {
            return Ok(None);
        };
        let state: GameState = serde_json::from_str(&json)?;
        state.validate(grid).map_err(PersistenceError::Invalid)?;
        Ok(Some(state))
    }

    /// Read the stored snapshot; anything unreadable counts as no save
    pub fn load(&self, grid: &Grid) -> Option<GameState> {
        match self.try_load(grid) {
            Ok(Some(state)) => {
                log::info!(
                    "Loaded saved game (score {}, level {})",
                    state.score,
                    state.level
                );
                Some(state)
            }
            Ok(None) => {
                log::info!("No saved game found, starting fresh");
                None
            }
            Err(e) => {
                log::warn!("Discarding saved game: {}", e);
                None
            }
        }
    }

    /// Remove the stored snapshot
    pub fn clear(&mut self) -> PersistenceResult<()> {
        self.storage.remove_item(SESSION_KEY)?;
        log::info!("Saved game cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Direction, Position};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sample_state() -> GameState {
        let grid = Grid::default();
        let mut state = GameState::new(&grid, &mut Pcg32::seed_from_u64(11));
        state.direction = Direction::Down;
        state.score = 42;
        state.level = 2;
        state.speed = 237.5;
        state.is_paused = true;
        state.game_started = true;
        state.elapsed_time = 93;
        state
    }

    #[test]
    fn test_save_load_round_trip() {
        let grid = Grid::default();
        let mut store = SessionStore::new(MemoryStorage::new());
        let state = sample_state();

        store.save(&state).unwrap();
        assert_eq!(store.load(&grid), Some(state));
    }

    #[test]
    fn test_reached_speeds_reload_exactly() {
        let grid = Grid::default();
        let mut store = SessionStore::new(MemoryStorage::new());
        let mut state = sample_state();
        state.speed = crate::consts::BASE_SPEED_MS;

        for level in 1..=400 {
            state.level = level;
            store.save(&state).unwrap();
            let loaded = store.load(&grid).unwrap();
            assert_eq!(
                loaded.speed.to_bits(),
                state.speed.to_bits(),
                "level {level}: saved {} loaded {}",
                state.speed,
                loaded.speed
            );
            state.speed *= 1.0 - crate::consts::SPEED_INCREMENT;
        }
    }

    #[test]
    fn test_save_overwrites() {
        let grid = Grid::default();
        let mut store = SessionStore::new(MemoryStorage::new());
        let mut state = sample_state();
        store.save(&state).unwrap();
        state.score = 43;
        store.save(&state).unwrap();

        assert_eq!(store.load(&grid).map(|s| s.score), Some(43));
    }

    #[test]
    fn test_missing_snapshot_is_none() {
        let store = SessionStore::new(MemoryStorage::new());
        assert!(store.load(&Grid::default()).is_none());
        assert!(matches!(store.try_load(&Grid::default()), Ok(None)));
    }

    #[test]
    fn test_malformed_snapshot_is_none() {
        let grid = Grid::default();
        let mut storage = MemoryStorage::new();
        storage.set_item(SESSION_KEY, "{not json").unwrap();
        let store = SessionStore::new(storage);

        assert!(store.load(&grid).is_none());
        assert!(matches!(
            store.try_load(&grid),
            Err(PersistenceError::Serialization(_))
        ));
    }

    #[test]
    fn test_wrong_shape_is_none() {
        let grid = Grid::default();
        let mut storage = MemoryStorage::new();
        storage
            .set_item(SESSION_KEY, r#"{"snake":"long","score":-1}"#)
            .unwrap();
        let store = SessionStore::new(storage);
        assert!(store.load(&grid).is_none());
    }

    #[test]
    fn test_invalid_snapshot_is_none() {
        let grid = Grid::default();
        let mut state = sample_state();
        state.snake[0] = Position::new(1000, 1000);
        let mut store = SessionStore::new(MemoryStorage::new());
        store.save(&state).unwrap();

        assert!(matches!(
            store.try_load(&grid),
            Err(PersistenceError::Invalid(_))
        ));
        assert!(store.load(&grid).is_none());
    }

    #[test]
    fn test_reads_hand_written_snapshot() {
        let grid = Grid::default();
        let json = r#"{
            "snake": [{"x": 100, "y": 100}, {"x": 80, "y": 100}, {"x": 60, "y": 100}],
            "direction": "RIGHT",
            "food": {"x": 200, "y": 40},
            "score": 3,
            "level": 1,
            "speed": 250,
            "isPaused": false,
            "gameStarted": true,
            "elapsedTime": 12
        }"#;
        let mut storage = MemoryStorage::new();
        storage.set_item(SESSION_KEY, json).unwrap();
        let store = SessionStore::new(storage);

        let state = store.load(&grid).unwrap();
        assert_eq!(state.len(), 3);
        assert_eq!(state.food, Position::new(200, 40));
        assert_eq!(state.speed, 250.0);
        assert!(state.is_running());
        assert_eq!(state.elapsed_time, 12);
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let grid = Grid::default();
        let mut store = SessionStore::new(MemoryStorage::new());
        store.save(&sample_state()).unwrap();
        store.clear().unwrap();
        assert!(store.load(&grid).is_none());
    }

    #[test]
    fn test_boxed_storage_round_trip() {
        let grid = Grid::default();
        let storage: Box<dyn Storage> = Box::new(MemoryStorage::new());
        let mut store = SessionStore::new(storage);
        store.save(&sample_state()).unwrap();
        assert_eq!(store.load(&grid).map(|s| s.score), Some(42));
    }
}
