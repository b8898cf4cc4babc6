use super::arena::{Arena, Position};
use super::direction::Direction;

pub const BALL_SYMBOL: char = 'o';
pub const PADDLE_SYMBOL: char = 'I';

// Steps per second.
pub const BALL_SPEED: u8 = 9;
pub const PADDLE_SPEED: u8 = 25;

const LEFT_PADDLE_COLUMN: u8 = 3;
const RIGHT_PADDLE_MARGIN: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Ball,
    Paddle(Side),
}

impl EntityKind {
    pub fn symbol(self) -> char {
        match self {
            EntityKind::Ball => BALL_SYMBOL,
            EntityKind::Paddle(_) => PADDLE_SYMBOL,
        }
    }
}

/// Shared entity-state record for the ball and both paddles; the kind
/// tag selects the engine behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movable {
    pub kind: EntityKind,
    pub pos: Position,
    pub dir: Direction,
    pub speed: u8,
}

impl Movable {
    /// Ball at the arena center, serving toward the right side.
    pub fn ball(arena: &Arena) -> Self {
        Self {
            kind: EntityKind::Ball,
            pos: arena.center(),
            dir: Direction::Right,
            speed: BALL_SPEED,
        }
    }

    pub fn paddle(arena: &Arena, side: Side) -> Self {
        let x = match side {
            Side::Left => LEFT_PADDLE_COLUMN,
            Side::Right => arena.width - RIGHT_PADDLE_MARGIN,
        };
        Self {
            kind: EntityKind::Paddle(side),
            pos: Position::new(x, arena.height / 2),
            dir: Direction::Up,
            speed: PADDLE_SPEED,
        }
    }

    /// Pacing interval of the entity's simulation loop.
    pub fn step_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(1000 / u64::from(self.speed))
    }

    /// Center row minus one; only meaningful for paddles.
    pub fn extension_up(&self) -> u8 {
        self.pos.y.saturating_sub(1)
    }

    /// Center row plus one; only meaningful for paddles.
    pub fn extension_down(&self) -> u8 {
        self.pos.y.saturating_add(1)
    }

    /// The cells this entity occupies: one for the ball, three stacked
    /// rows for a paddle.
    pub fn footprint(&self) -> Vec<Position> {
        match self.kind {
            EntityKind::Ball => vec![self.pos],
            EntityKind::Paddle(_) => vec![
                Position::new(self.pos.x, self.extension_up()),
                self.pos,
                Position::new(self.pos.x, self.extension_down()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_spawns_at_center() {
        let arena = Arena::default();
        let ball = Movable::ball(&arena);
        assert_eq!(ball.pos, Position::new(60, 15));
        assert_eq!(ball.dir, Direction::Right);
    }

    #[test]
    fn paddles_spawn_at_their_columns() {
        let arena = Arena::default();
        let left = Movable::paddle(&arena, Side::Left);
        let right = Movable::paddle(&arena, Side::Right);
        assert_eq!(left.pos, Position::new(3, 15));
        assert_eq!(right.pos, Position::new(116, 15));
    }

    #[test]
    fn paddle_footprint_is_three_rows() {
        let arena = Arena::default();
        let paddle = Movable::paddle(&arena, Side::Left);
        let cells = paddle.footprint();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].y, 14);
        assert_eq!(cells[2].y, 16);
    }
}
