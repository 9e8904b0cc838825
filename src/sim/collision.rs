//! Collision detection
//!
//! Both checks are pure predicates; the tick decides what a hit means.

use super::grid::{Grid, Position};

/// True if `pos` lies outside the board
pub fn is_out_of_bounds(pos: Position, grid: &Grid) -> bool {
    pos.x < 0 || pos.x >= grid.width || pos.y < 0 || pos.y >= grid.height
}

/// True if `head` overlaps any body segment after the first
///
/// `body` is the snake ordered head-first; index 0 is the head itself and
/// is skipped.
pub fn is_self_collision<'a, I>(head: Position, body: I) -> bool
where
    I: IntoIterator<Item = &'a Position>,
{
    body.into_iter().skip(1).any(|segment| *segment == head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_edges() {
        let grid = Grid::new(400, 400, 20);
        assert!(!is_out_of_bounds(Position::new(0, 0), &grid));
        assert!(!is_out_of_bounds(Position::new(380, 380), &grid));
        assert!(is_out_of_bounds(Position::new(-20, 100), &grid));
        assert!(is_out_of_bounds(Position::new(400, 100), &grid));
        assert!(is_out_of_bounds(Position::new(100, -20), &grid));
        assert!(is_out_of_bounds(Position::new(100, 400), &grid));
    }

    #[test]
    fn test_self_collision_ignores_head() {
        let body = [
            Position::new(100, 100),
            Position::new(80, 100),
            Position::new(60, 100),
        ];
        // The head is always equal to body[0]; that alone is not a collision
        assert!(!is_self_collision(body[0], &body));
    }

    #[test]
    fn test_self_collision_hits_tail() {
        let body = [
            Position::new(60, 100),
            Position::new(80, 100),
            Position::new(80, 120),
            Position::new(60, 120),
            Position::new(60, 100),
        ];
        assert!(is_self_collision(body[0], &body));
    }

    #[test]
    fn test_single_segment_never_collides() {
        let body = [Position::new(0, 0)];
        assert!(!is_self_collision(body[0], &body));
    }
}
