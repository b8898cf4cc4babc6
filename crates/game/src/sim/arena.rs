use thiserror::Error;

use super::direction::Direction;

/// Playfield defaults matching a 121x31 console window with a one-cell
/// wall border on every side.
pub const DEFAULT_WIDTH: u8 = 120;
pub const DEFAULT_HEIGHT: u8 = 30;

/// Range violation in position arithmetic. Positions live on a byte grid
/// and must never wrap; hitting this is an engine defect, not a bounce.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    #[error("position arithmetic out of range at ({x}, {y})")]
    OutOfRange { x: u8, y: u8 },
}

/// A terminal cell. Both axes are bounded to 0..=255 by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// One cell along `dir`, range-checked.
    pub fn try_step(self, dir: Direction) -> Result<Position, SimError> {
        let x = offset(self.x, dir.dx());
        let y = offset(self.y, dir.dy());
        match (x, y) {
            (Some(x), Some(y)) => Ok(Position { x, y }),
            _ => Err(SimError::OutOfRange {
                x: self.x,
                y: self.y,
            }),
        }
    }
}

fn offset(v: u8, delta: i8) -> Option<u8> {
    match delta {
        0 => Some(v),
        d if d > 0 => v.checked_add(d as u8),
        d => v.checked_sub(d.unsigned_abs()),
    }
}

/// Arena bounds. Borders sit at x = 0 / x = width and y = 0 / y = height;
/// the wall predicates build the entity footprint margins in, so they are
/// evaluated against an entity's center cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arena {
    pub width: u8,
    pub height: u8,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: u8, height: u8) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    pub fn hits_left_wall(&self, pos: Position) -> bool {
        i16::from(pos.x) - 1 <= 0
    }

    pub fn hits_right_wall(&self, pos: Position) -> bool {
        i16::from(pos.x) + 3 >= i16::from(self.width)
    }

    pub fn hits_top_wall(&self, pos: Position) -> bool {
        i16::from(pos.y) - 1 <= 0
    }

    pub fn hits_bottom_wall(&self, pos: Position) -> bool {
        i16::from(pos.y) + 3 >= i16::from(self.height)
    }

    pub fn hits_any_wall(&self, pos: Position) -> bool {
        self.hits_left_wall(pos)
            || self.hits_right_wall(pos)
            || self.hits_top_wall(pos)
            || self.hits_bottom_wall(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_one_cell() {
        let pos = Position::new(10, 10);
        assert_eq!(pos.try_step(Direction::RightDown).unwrap(), Position::new(11, 11));
        assert_eq!(pos.try_step(Direction::Up).unwrap(), Position::new(10, 9));
    }

    #[test]
    fn step_at_grid_edge_is_an_error() {
        let err = Position::new(0, 5).try_step(Direction::Left).unwrap_err();
        assert_eq!(err, SimError::OutOfRange { x: 0, y: 5 });
        assert!(Position::new(255, 5).try_step(Direction::Right).is_err());
        assert!(Position::new(5, 0).try_step(Direction::LeftUp).is_err());
    }

    #[test]
    fn wall_margins_match_footprints() {
        let arena = Arena::default();
        assert!(arena.hits_left_wall(Position::new(1, 15)));
        assert!(!arena.hits_left_wall(Position::new(2, 15)));
        assert!(arena.hits_right_wall(Position::new(117, 15)));
        assert!(!arena.hits_right_wall(Position::new(116, 15)));
        assert!(arena.hits_top_wall(Position::new(60, 1)));
        assert!(arena.hits_bottom_wall(Position::new(60, 27)));
        assert!(!arena.hits_any_wall(Position::new(60, 15)));
    }
}
