//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must stay pure:
//! - No timers (the caller decides when to tick)
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod food;
pub mod grid;
pub mod state;
pub mod tick;

pub use collision::{is_out_of_bounds, is_self_collision};
pub use food::spawn_food;
pub use grid::{Direction, Grid, Position};
pub use state::{EndCause, GamePhase, GameState};
pub use tick::{TickOutcome, tick};
