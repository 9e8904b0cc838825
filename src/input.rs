//! Input routing
//!
//! Turns raw keyboard, pointer and touch signals into game commands. The
//! reversal guard lives here too so every input path shares it.

use glam::Vec2;

use crate::sim::Direction;

/// What an input asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetDirection(Direction),
    TogglePause,
    None,
}

/// Legacy `keyCode` values
pub mod key_codes {
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const PAUSE: u32 = 80; // 'P'
}

/// Map a `KeyboardEvent.key` value
pub fn command_for_key(key: &str) -> Command {
    match key {
        "ArrowLeft" | "Left" => Command::SetDirection(Direction::Left),
        "ArrowUp" | "Up" => Command::SetDirection(Direction::Up),
        "ArrowRight" | "Right" => Command::SetDirection(Direction::Right),
        "ArrowDown" | "Down" => Command::SetDirection(Direction::Down),
        "p" | "P" => Command::TogglePause,
        _ => Command::None,
    }
}

/// Map a legacy `KeyboardEvent.keyCode` value
pub fn command_for_key_code(code: u32) -> Command {
    match code {
        key_codes::LEFT => Command::SetDirection(Direction::Left),
        key_codes::UP => Command::SetDirection(Direction::Up),
        key_codes::RIGHT => Command::SetDirection(Direction::Right),
        key_codes::DOWN => Command::SetDirection(Direction::Down),
        key_codes::PAUSE => Command::TogglePause,
        _ => Command::None,
    }
}

/// Which third of the surface a point falls in
///
/// Left/right thirds are checked before top/bottom, so corners steer
/// horizontally. The centre cell maps to nothing.
pub fn zone_direction(point: Vec2, surface: Vec2) -> Option<Direction> {
    if point.x < surface.x / 3.0 {
        Some(Direction::Left)
    } else if point.x > surface.x * 2.0 / 3.0 {
        Some(Direction::Right)
    } else if point.y < surface.y / 3.0 {
        Some(Direction::Up)
    } else if point.y > surface.y * 2.0 / 3.0 {
        Some(Direction::Down)
    } else {
        None
    }
}

/// Map a pointer/touch position (relative to the surface's top-left)
pub fn command_for_pointer(point: Vec2, surface: Vec2) -> Command {
    match zone_direction(point, surface) {
        Some(direction) => Command::SetDirection(direction),
        None => Command::None,
    }
}

/// Direction the snake should take, or `None` if `requested` would reverse
/// it onto its own neck
pub fn accept_direction(current: Direction, requested: Direction) -> Option<Direction> {
    if requested == current.opposite() {
        None
    } else {
        Some(requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys() {
        assert_eq!(
            command_for_key("ArrowLeft"),
            Command::SetDirection(Direction::Left)
        );
        assert_eq!(
            command_for_key("ArrowDown"),
            Command::SetDirection(Direction::Down)
        );
        assert_eq!(command_for_key("P"), Command::TogglePause);
        assert_eq!(command_for_key("p"), Command::TogglePause);
        assert_eq!(command_for_key("x"), Command::None);
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(
            command_for_key_code(37),
            Command::SetDirection(Direction::Left)
        );
        assert_eq!(command_for_key_code(38), Command::SetDirection(Direction::Up));
        assert_eq!(
            command_for_key_code(39),
            Command::SetDirection(Direction::Right)
        );
        assert_eq!(
            command_for_key_code(40),
            Command::SetDirection(Direction::Down)
        );
        assert_eq!(command_for_key_code(80), Command::TogglePause);
        assert_eq!(command_for_key_code(13), Command::None);
    }

    #[test]
    fn test_zones() {
        let surface = Vec2::new(300.0, 300.0);
        assert_eq!(
            zone_direction(Vec2::new(10.0, 150.0), surface),
            Some(Direction::Left)
        );
        assert_eq!(
            zone_direction(Vec2::new(290.0, 150.0), surface),
            Some(Direction::Right)
        );
        assert_eq!(
            zone_direction(Vec2::new(150.0, 10.0), surface),
            Some(Direction::Up)
        );
        assert_eq!(
            zone_direction(Vec2::new(150.0, 290.0), surface),
            Some(Direction::Down)
        );
        assert_eq!(zone_direction(Vec2::new(150.0, 150.0), surface), None);
    }

    #[test]
    fn test_corner_zones_prefer_horizontal() {
        let surface = Vec2::new(300.0, 300.0);
        assert_eq!(
            zone_direction(Vec2::new(10.0, 10.0), surface),
            Some(Direction::Left)
        );
        assert_eq!(
            zone_direction(Vec2::new(290.0, 290.0), surface),
            Some(Direction::Right)
        );
    }

    #[test]
    fn test_pointer_command() {
        let surface = Vec2::new(400.0, 400.0);
        assert_eq!(
            command_for_pointer(Vec2::new(200.0, 20.0), surface),
            Command::SetDirection(Direction::Up)
        );
        assert_eq!(
            command_for_pointer(Vec2::new(200.0, 200.0), surface),
            Command::None
        );
    }

    #[test]
    fn test_reversal_guard() {
        assert_eq!(accept_direction(Direction::Right, Direction::Left), None);
        assert_eq!(accept_direction(Direction::Up, Direction::Down), None);
        assert_eq!(
            accept_direction(Direction::Right, Direction::Up),
            Some(Direction::Up)
        );
        assert_eq!(
            accept_direction(Direction::Right, Direction::Right),
            Some(Direction::Right)
        );
    }
}
