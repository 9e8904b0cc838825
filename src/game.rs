//! Game state machine
//!
//! Owns the session state, the re-armable tick timer and the elapsed-time
//! ticker, and writes a snapshot after every change. The shell feeds it
//! commands and timestamps and drains the events it records.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::clock::{IntervalTimer, TickTimer};
use crate::consts::ELAPSED_TICK_MS;
use crate::input::{Command, accept_direction};
use crate::persistence::{SessionStore, Storage};
use crate::settings::Settings;
use crate::sim::{Direction, EndCause, GamePhase, GameState, Grid, TickOutcome, tick};

/// Things the presentation layer reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// First direction key accepted
    Started,
    /// Snake advanced one cell
    Ticked,
    FoodEaten { score: u32 },
    /// Background colour and tick speed changed
    LevelUp { level: u32, speed_ms: f64 },
    Paused,
    Resumed,
    ElapsedSecond { elapsed: u64 },
    /// Episode ended; the board has already been reset
    GameOver { score: u32, cause: EndCause },
}

pub struct Game<S: Storage> {
    state: GameState,
    grid: Grid,
    rng: Pcg32,
    store: SessionStore<S>,
    tick_timer: TickTimer,
    elapsed_timer: IntervalTimer,
    events: Vec<GameEvent>,
}

impl<S: Storage> Game<S> {
    /// Restore the saved session from `storage`, or set up a fresh board
    ///
    /// A restored session that was running resumes with a tick due at `now`.
    pub fn new(settings: &Settings, storage: S, seed: u64, now: f64) -> Self {
        let grid = settings.grid();
        let mut rng = Pcg32::seed_from_u64(seed);
        let store = SessionStore::new(storage);
        let state = store
            .load(&grid)
            .unwrap_or_else(|| GameState::new(&grid, &mut rng));

        let mut game = Self {
            state,
            grid,
            rng,
            store,
            tick_timer: TickTimer::new(),
            elapsed_timer: IntervalTimer::new(ELAPSED_TICK_MS),
            events: Vec::new(),
        };

        game.elapsed_timer.start(now);
        if game.state.is_running() {
            game.tick_timer.arm(now, 0.0);
        }
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    /// When the next tick is due, if one is scheduled
    pub fn next_tick_at(&self) -> Option<f64> {
        self.tick_timer.deadline()
    }

    /// Events recorded since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply one routed input
    pub fn handle(&mut self, command: Command, now: f64) {
        match command {
            Command::SetDirection(direction) => {
                self.set_direction(direction, now);
            }
            Command::TogglePause => self.toggle_pause(now),
            Command::None => {}
        }
    }

    /// Turn the snake. Reversals are ignored; the first accepted turn
    /// starts the game. Returns whether the turn was accepted.
    pub fn set_direction(&mut self, requested: Direction, now: f64) -> bool {
        let Some(direction) = accept_direction(self.state.direction, requested) else {
            log::debug!(
                "Ignoring reversal {} -> {}",
                self.state.direction.as_str(),
                requested.as_str()
            );
            return false;
        };
        self.state.direction = direction;

        if !self.state.game_started {
            self.start(now);
        }
        true
    }

    /// Leave `NotStarted` and tick immediately
    pub fn start(&mut self, now: f64) {
        if self.state.game_started {
            return;
        }
        self.state.game_started = true;
        self.state.is_paused = false;
        self.elapsed_timer.start(now);
        self.events.push(GameEvent::Started);
        log::info!("Game started heading {}", self.state.direction.as_str());

        self.advance(now);
    }

    /// Flip the pause flag. Before the game starts this only flips the flag.
    pub fn toggle_pause(&mut self, now: f64) {
        if !self.state.game_started {
            self.state.is_paused = !self.state.is_paused;
            self.persist();
        } else if self.state.is_paused {
            self.resume(now);
        } else {
            self.pause();
        }
    }

    /// Freeze a running game and drop the pending tick
    pub fn pause(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.state.is_paused = true;
        self.tick_timer.cancel();
        self.persist();
        self.events.push(GameEvent::Paused);
        log::info!("Paused");
    }

    /// Unfreeze a paused game; a fresh tick is due at `now`
    pub fn resume(&mut self, now: f64) {
        if self.state.phase() != GamePhase::Paused {
            return;
        }
        // Seconds that passed while paused do not count
        self.elapsed_timer.fire(now);
        self.state.is_paused = false;
        self.tick_timer.arm(now, 0.0);
        self.persist();
        self.events.push(GameEvent::Resumed);
        log::info!("Resumed");
    }

    /// Stop all timers for teardown. State and snapshot are untouched.
    pub fn stop(&mut self) {
        self.tick_timer.cancel();
        self.elapsed_timer.stop();
    }

    /// Fire whichever timers are due at `now`
    pub fn poll(&mut self, now: f64) {
        // Missed seconds land in one step with a single write
        let seconds = self.elapsed_timer.fire(now);
        if seconds > 0 && self.state.is_running() {
            self.state.elapsed_time += u64::from(seconds);
            self.persist();
            self.events.push(GameEvent::ElapsedSecond {
                elapsed: self.state.elapsed_time,
            });
        }

        if self.tick_timer.fire(now) {
            self.advance(now);
        }
    }

    /// Throw the current session away and set up a fresh board
    pub fn reset(&mut self) {
        self.tick_timer.cancel();
        if let Err(e) = self.store.clear() {
            log::warn!("Failed to clear saved game: {}", e);
        }
        self.state = GameState::new(&self.grid, &mut self.rng);
    }

    /// One tick plus its bookkeeping, then re-arm at the current speed
    fn advance(&mut self, now: f64) {
        match tick(&mut self.state, &self.grid, &mut self.rng) {
            TickOutcome::Idle => return,
            TickOutcome::Moved => {}
            TickOutcome::Ate { score, level_up } => {
                self.events.push(GameEvent::FoodEaten { score });
                if level_up {
                    self.events.push(GameEvent::LevelUp {
                        level: self.state.level,
                        speed_ms: self.state.speed,
                    });
                }
            }
            TickOutcome::GameOver { score, cause } => {
                log::info!("Game over ({}), final score {}", cause.as_str(), score);
                self.reset();
                self.events.push(GameEvent::GameOver { score, cause });
                return;
            }
        }

        self.events.push(GameEvent::Ticked);
        self.persist();
        self.tick_timer.arm(now, self.state.speed);
    }

    /// Best-effort snapshot write
    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.state) {
            log::warn!("Failed to save game: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BASE_SPEED_MS;
    use crate::persistence::MemoryStorage;
    use crate::sim::Position;
    use std::collections::VecDeque;

    fn new_game() -> Game<MemoryStorage> {
        let mut game = Game::new(&Settings::default(), MemoryStorage::new(), 1234, 0.0);
        // Keep food out of the opening path
        game.state.food = Position::new(0, 380);
        game
    }

    fn body(game: &Game<MemoryStorage>) -> Vec<Position> {
        game.state().snake.iter().copied().collect()
    }

    #[test]
    fn test_fresh_game_waits_for_direction() {
        let mut game = new_game();
        assert_eq!(game.phase(), GamePhase::NotStarted);
        assert_eq!(game.next_tick_at(), None);

        game.poll(10_000.0);
        assert_eq!(game.phase(), GamePhase::NotStarted);
        assert_eq!(game.state().elapsed_time, 0);
        assert_eq!(game.state().len(), 3);
    }

    #[test]
    fn test_first_direction_starts_and_ticks() {
        let mut game = new_game();
        game.handle(Command::SetDirection(Direction::Right), 0.0);

        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(
            body(&game),
            vec![
                Position::new(120, 100),
                Position::new(100, 100),
                Position::new(80, 100)
            ]
        );
        assert_eq!(game.next_tick_at(), Some(BASE_SPEED_MS));
        assert_eq!(
            game.take_events(),
            vec![GameEvent::Started, GameEvent::Ticked]
        );
        // Snapshot written after the tick
        assert_eq!(game.store().load(game.grid()).as_ref(), Some(game.state()));
    }

    #[test]
    fn test_reversal_does_not_start() {
        let mut game = new_game();
        assert!(!game.set_direction(Direction::Left, 0.0));
        assert_eq!(game.phase(), GamePhase::NotStarted);
        assert_eq!(game.state().direction, Direction::Right);
    }

    #[test]
    fn test_reversal_ignored_while_running() {
        let mut game = new_game();
        game.handle(Command::SetDirection(Direction::Up), 0.0);
        game.handle(Command::SetDirection(Direction::Down), 10.0);
        assert_eq!(game.state().direction, Direction::Up);
    }

    #[test]
    fn test_ticks_follow_speed() {
        let mut game = new_game();
        game.handle(Command::SetDirection(Direction::Down), 0.0);
        let head = game.state().head().unwrap();

        game.poll(BASE_SPEED_MS - 1.0);
        assert_eq!(game.state().head(), Some(head));

        game.poll(BASE_SPEED_MS);
        assert_eq!(
            game.state().head(),
            Some(Position::new(head.x, head.y + 20))
        );
        assert_eq!(game.next_tick_at(), Some(2.0 * BASE_SPEED_MS));
    }

    #[test]
    fn test_eating_food_scores_and_grows() {
        let mut game = new_game();
        game.handle(Command::SetDirection(Direction::Right), 0.0);
        game.take_events();
        game.state.food = Position::new(140, 100);

        game.poll(BASE_SPEED_MS);
        assert_eq!(game.state().score, 1);
        assert_eq!(game.state().len(), 4);
        assert!(!game.state().occupies(game.state().food));
        assert_eq!(
            game.take_events(),
            vec![GameEvent::FoodEaten { score: 1 }, GameEvent::Ticked]
        );
    }

    #[test]
    fn test_wall_hit_reports_and_resets() {
        let mut game = new_game();
        game.handle(Command::SetDirection(Direction::Up), 0.0);
        game.state.snake = VecDeque::from(vec![
            Position::new(20, 100),
            Position::new(20, 80),
            Position::new(20, 60),
        ]);
        game.state.direction = Direction::Left;
        game.state.score = 12;
        game.state.level = 1;
        game.take_events();

        game.poll(BASE_SPEED_MS); // head -> (0, 100)
        game.poll(2.0 * BASE_SPEED_MS); // head -> (-20, 100)

        let events = game.take_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver {
                score: 12,
                cause: EndCause::Wall
            })
        );
        assert_eq!(game.phase(), GamePhase::NotStarted);
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().level, 1);
        assert_eq!(game.state().speed, BASE_SPEED_MS);
        assert_eq!(game.state().len(), 3);
        assert_eq!(game.state().direction, Direction::Right);
        assert_eq!(game.next_tick_at(), None);
        assert!(game.store().load(game.grid()).is_none());
    }

    #[test]
    fn test_level_up_speeds_ticks() {
        let mut game = new_game();
        game.handle(Command::SetDirection(Direction::Right), 0.0);
        game.state.score = 29;
        game.state.food = Position::new(140, 100);
        game.take_events();

        game.poll(BASE_SPEED_MS);
        let speed = BASE_SPEED_MS * 0.95;
        assert_eq!(game.state().level, 2);
        assert!((game.state().speed - speed).abs() < 1e-9);
        assert_eq!(crate::level_color_index(game.state().level), 1);
        let events = game.take_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::LevelUp { level: 2, .. }
        )));
        let next = game.next_tick_at().unwrap();
        assert!((next - (BASE_SPEED_MS + speed)).abs() < 1e-9);
    }

    #[test]
    fn test_pause_freezes_state() {
        let mut game = new_game();
        game.handle(Command::SetDirection(Direction::Down), 0.0);
        game.handle(Command::TogglePause, 100.0);
        assert_eq!(game.phase(), GamePhase::Paused);
        assert_eq!(game.next_tick_at(), None);

        let frozen = game.state().clone();
        game.poll(60_000.0);
        assert_eq!(game.state(), &frozen);

        // Snapshot records the pause
        let saved = game.store().load(game.grid()).unwrap();
        assert!(saved.is_paused);

        game.handle(Command::TogglePause, 60_000.0);
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.next_tick_at(), Some(60_000.0));
        game.poll(60_000.0);
        assert_ne!(game.state().head(), frozen.head());
    }

    #[test]
    fn test_pause_before_start_only_flips_flag() {
        let mut game = new_game();
        assert!(game.state().is_paused);
        game.handle(Command::TogglePause, 0.0);
        assert!(!game.state().is_paused);
        assert_eq!(game.phase(), GamePhase::NotStarted);
        assert_eq!(game.next_tick_at(), None);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn test_elapsed_counts_only_while_running() {
        let mut game = new_game();
        game.poll(3000.0);
        assert_eq!(game.state().elapsed_time, 0);

        game.handle(Command::SetDirection(Direction::Down), 3000.0);
        game.poll(3999.0);
        assert_eq!(game.state().elapsed_time, 0);
        game.poll(4000.0);
        assert_eq!(game.state().elapsed_time, 1);

        game.pause();
        game.poll(9000.0);
        assert_eq!(game.state().elapsed_time, 1);
    }

    #[test]
    fn test_resume_skips_seconds_spent_paused() {
        let mut game = new_game();
        game.handle(Command::SetDirection(Direction::Down), 0.0);
        game.pause();
        game.resume(10_000.0);
        game.poll(10_000.0);
        assert_eq!(game.state().elapsed_time, 0);
        game.poll(11_000.0);
        assert_eq!(game.state().elapsed_time, 1);
    }

    /// Counts snapshot writes
    #[derive(Default)]
    struct CountingStorage {
        inner: MemoryStorage,
        writes: usize,
    }

    impl Storage for CountingStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, crate::persistence::StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(
            &mut self,
            key: &str,
            value: &str,
        ) -> Result<(), crate::persistence::StorageError> {
            self.writes += 1;
            self.inner.set_item(key, value)
        }

        fn remove_item(&mut self, key: &str) -> Result<(), crate::persistence::StorageError> {
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn test_missed_seconds_catch_up_with_one_write() {
        let mut game = Game::new(&Settings::default(), CountingStorage::default(), 4, 0.0);
        game.state.food = Position::new(0, 380);
        game.handle(Command::SetDirection(Direction::Down), 0.0);
        game.take_events();
        let before = game.store().storage().writes;

        game.poll(3_600_000.0);

        let events = game.take_events();
        let seconds: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ElapsedSecond { .. }))
            .collect();
        assert_eq!(seconds, vec![&GameEvent::ElapsedSecond { elapsed: 3600 }]);
        assert_eq!(game.state().elapsed_time, 3600);
        // One write for the seconds, one for the tick that also came due
        assert_eq!(game.store().storage().writes - before, 2);
    }

    #[test]
    fn test_restores_running_session() {
        let settings = Settings::default();
        let mut first = Game::new(&settings, MemoryStorage::new(), 1, 0.0);
        first.state.food = Position::new(0, 380);
        first.handle(Command::SetDirection(Direction::Down), 0.0);
        let saved = first.state().clone();

        let storage = first.store().storage().clone();
        let restored = Game::new(&settings, storage, 2, 5000.0);
        assert_eq!(restored.state(), &saved);
        assert_eq!(restored.phase(), GamePhase::Running);
        assert_eq!(restored.next_tick_at(), Some(5000.0));
    }

    #[test]
    fn test_save_failures_do_not_stop_the_loop() {
        let mut game = Game::new(&Settings::default(), MemoryStorage::read_only(), 5, 0.0);
        game.state.food = Position::new(0, 380);
        game.handle(Command::SetDirection(Direction::Down), 0.0);
        game.poll(BASE_SPEED_MS);
        assert_eq!(game.state().head(), Some(Position::new(100, 140)));
        assert!(game.next_tick_at().is_some());
    }

    #[test]
    fn test_stop_cancels_timers() {
        let mut game = new_game();
        game.handle(Command::SetDirection(Direction::Down), 0.0);
        game.stop();
        assert_eq!(game.next_tick_at(), None);
        let head = game.state().head();
        game.poll(10_000.0);
        assert_eq!(game.state().head(), head);
    }
}
