//! Pure movement and collision resolution. The engine never touches
//! shared state or the network; callers apply the returned outcome.

use super::arena::{Arena, Position, SimError};
use super::direction::Direction;
use super::entity::Movable;
use super::entity::Side;

/// Result of one ball step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallOutcome {
    /// No collision: one cell along the current direction. Not broadcast.
    Advance(Position),
    /// Wall or paddle bounce. `pos` is one cell along the new direction.
    /// The only ball state that goes on the wire.
    Bounce { dir: Direction, pos: Position },
    /// The ball crossed a goal wall. Reported, never broadcast.
    Goal { scored_by: Side },
    /// A wall test tripped but no bounce rule covers the current
    /// direction; the step is skipped on both peers identically.
    Hold,
}

/// Result of one locally-driven paddle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleOutcome {
    Moved(Position),
    Rejected,
}

pub fn step_ball(
    arena: &Arena,
    ball: &Movable,
    left_paddle: &Movable,
    right_paddle: &Movable,
) -> Result<BallOutcome, SimError> {
    let pos = ball.pos;
    let dir = ball.dir;

    if arena.hits_any_wall(pos) {
        // Wall precedence: bottom, top, then the goal walls.
        if arena.hits_bottom_wall(pos) {
            return match dir {
                Direction::LeftDown | Direction::RightDown => bounce(pos, dir.flip_vertical()),
                _ => Ok(BallOutcome::Hold),
            };
        }
        if arena.hits_top_wall(pos) {
            return match dir {
                Direction::LeftUp | Direction::RightUp => bounce(pos, dir.flip_vertical()),
                _ => Ok(BallOutcome::Hold),
            };
        }
        if arena.hits_left_wall(pos) {
            return Ok(BallOutcome::Goal {
                scored_by: Side::Right,
            });
        }
        return Ok(BallOutcome::Goal {
            scored_by: Side::Left,
        });
    }

    if let Some(dir) = left_paddle_reflection(pos, left_paddle) {
        return bounce(pos, dir);
    }
    if let Some(dir) = right_paddle_reflection(pos, right_paddle) {
        return bounce(pos, dir);
    }

    Ok(BallOutcome::Advance(pos.try_step(dir)?))
}

fn bounce(pos: Position, dir: Direction) -> Result<BallOutcome, SimError> {
    Ok(BallOutcome::Bounce {
        dir,
        pos: pos.try_step(dir)?,
    })
}

/// Ball column adjacent to the left paddle's column, tested against the
/// paddle's three vertical zones. The upper extension deflects upward,
/// the center purely horizontally, the lower extension downward; the
/// horizontal component always reverses away from the paddle.
fn left_paddle_reflection(ball: Position, paddle: &Movable) -> Option<Direction> {
    if i16::from(ball.x) - 1 != i16::from(paddle.pos.x) {
        return None;
    }
    zone_reflection(
        ball.y,
        paddle,
        Direction::RightUp,
        Direction::Right,
        Direction::RightDown,
    )
}

fn right_paddle_reflection(ball: Position, paddle: &Movable) -> Option<Direction> {
    if i16::from(ball.x) + 1 != i16::from(paddle.pos.x) {
        return None;
    }
    zone_reflection(
        ball.y,
        paddle,
        Direction::LeftUp,
        Direction::Left,
        Direction::LeftDown,
    )
}

fn zone_reflection(
    ball_y: u8,
    paddle: &Movable,
    upper: Direction,
    center: Direction,
    lower: Direction,
) -> Option<Direction> {
    if ball_y == paddle.extension_down() {
        Some(lower)
    } else if ball_y == paddle.pos.y {
        Some(center)
    } else if ball_y == paddle.extension_up() {
        Some(upper)
    } else {
        None
    }
}

/// A locally-driven paddle step. Moves whose three-cell footprint would
/// cross the top or bottom wall are rejected without any state change.
pub fn step_paddle(
    arena: &Arena,
    paddle: &Movable,
    dir: Direction,
) -> Result<PaddleOutcome, SimError> {
    if !matches!(dir, Direction::Up | Direction::Down) {
        return Ok(PaddleOutcome::Rejected);
    }
    let proposed = paddle.pos.try_step(dir)?;
    if arena.hits_any_wall(proposed) {
        return Ok(PaddleOutcome::Rejected);
    }
    Ok(PaddleOutcome::Moved(proposed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Side;

    fn fixtures() -> (Arena, Movable, Movable, Movable) {
        let arena = Arena::default();
        let ball = Movable::ball(&arena);
        let left = Movable::paddle(&arena, Side::Left);
        let right = Movable::paddle(&arena, Side::Right);
        (arena, ball, left, right)
    }

    #[test]
    fn interior_step_advances_one_cell() {
        let (arena, mut ball, left, right) = fixtures();
        ball.dir = Direction::LeftUp;
        let outcome = step_ball(&arena, &ball, &left, &right).unwrap();
        assert_eq!(outcome, BallOutcome::Advance(Position::new(59, 14)));
    }

    #[test]
    fn bottom_wall_flips_vertical_component() {
        let (arena, mut ball, left, right) = fixtures();
        ball.pos = Position::new(60, 27);
        ball.dir = Direction::LeftDown;
        let outcome = step_ball(&arena, &ball, &left, &right).unwrap();
        assert_eq!(
            outcome,
            BallOutcome::Bounce {
                dir: Direction::LeftUp,
                pos: Position::new(59, 26),
            }
        );
    }

    #[test]
    fn top_wall_flips_vertical_component() {
        let (arena, mut ball, left, right) = fixtures();
        ball.pos = Position::new(60, 1);
        ball.dir = Direction::RightUp;
        let outcome = step_ball(&arena, &ball, &left, &right).unwrap();
        assert_eq!(
            outcome,
            BallOutcome::Bounce {
                dir: Direction::RightDown,
                pos: Position::new(61, 2),
            }
        );
    }

    #[test]
    fn horizontal_ball_at_bottom_wall_holds() {
        let (arena, mut ball, left, right) = fixtures();
        ball.pos = Position::new(60, 28);
        ball.dir = Direction::Right;
        let outcome = step_ball(&arena, &ball, &left, &right).unwrap();
        assert_eq!(outcome, BallOutcome::Hold);
    }

    #[test]
    fn left_wall_is_a_goal_for_right() {
        let (arena, mut ball, left, right) = fixtures();
        ball.pos = Position::new(1, 20);
        ball.dir = Direction::Left;
        let outcome = step_ball(&arena, &ball, &left, &right).unwrap();
        assert_eq!(
            outcome,
            BallOutcome::Goal {
                scored_by: Side::Right
            }
        );
    }

    #[test]
    fn right_wall_is_a_goal_for_left() {
        let (arena, mut ball, left, right) = fixtures();
        ball.pos = Position::new(117, 20);
        ball.dir = Direction::RightUp;
        let outcome = step_ball(&arena, &ball, &left, &right).unwrap();
        assert_eq!(
            outcome,
            BallOutcome::Goal {
                scored_by: Side::Left
            }
        );
    }

    #[test]
    fn left_paddle_zones_reflect_rightward() {
        let (arena, mut ball, left, right) = fixtures();
        ball.dir = Direction::Left;
        ball.pos = Position::new(left.pos.x + 1, left.pos.y);
        assert_eq!(
            step_ball(&arena, &ball, &left, &right).unwrap(),
            BallOutcome::Bounce {
                dir: Direction::Right,
                pos: Position::new(5, 15),
            }
        );

        ball.pos = Position::new(left.pos.x + 1, left.extension_up());
        assert_eq!(
            step_ball(&arena, &ball, &left, &right).unwrap(),
            BallOutcome::Bounce {
                dir: Direction::RightUp,
                pos: Position::new(5, 13),
            }
        );

        ball.pos = Position::new(left.pos.x + 1, left.extension_down());
        assert_eq!(
            step_ball(&arena, &ball, &left, &right).unwrap(),
            BallOutcome::Bounce {
                dir: Direction::RightDown,
                pos: Position::new(5, 17),
            }
        );
    }

    #[test]
    fn right_paddle_zones_reflect_leftward() {
        let (arena, mut ball, left, right) = fixtures();
        ball.dir = Direction::Right;
        ball.pos = Position::new(right.pos.x - 1, right.pos.y);
        assert_eq!(
            step_ball(&arena, &ball, &left, &right).unwrap(),
            BallOutcome::Bounce {
                dir: Direction::Left,
                pos: Position::new(114, 15),
            }
        );

        ball.pos = Position::new(right.pos.x - 1, right.extension_down());
        assert_eq!(
            step_ball(&arena, &ball, &left, &right).unwrap(),
            BallOutcome::Bounce {
                dir: Direction::LeftDown,
                pos: Position::new(114, 17),
            }
        );
    }

    #[test]
    fn ball_missing_the_paddle_passes_through() {
        let (arena, mut ball, left, right) = fixtures();
        ball.dir = Direction::Left;
        ball.pos = Position::new(left.pos.x + 1, left.pos.y + 5);
        assert_eq!(
            step_ball(&arena, &ball, &left, &right).unwrap(),
            BallOutcome::Advance(Position::new(3, 20))
        );
    }

    #[test]
    fn paddle_step_rejected_at_walls() {
        let (arena, _, mut left, _) = fixtures();
        left.pos = Position::new(3, 2);
        assert_eq!(
            step_paddle(&arena, &left, Direction::Up).unwrap(),
            PaddleOutcome::Rejected
        );

        left.pos = Position::new(3, 26);
        assert_eq!(
            step_paddle(&arena, &left, Direction::Down).unwrap(),
            PaddleOutcome::Rejected
        );
    }

    #[test]
    fn paddle_step_accepted_in_the_interior() {
        let (arena, _, left, _) = fixtures();
        assert_eq!(
            step_paddle(&arena, &left, Direction::Up).unwrap(),
            PaddleOutcome::Moved(Position::new(3, 14))
        );
        assert_eq!(
            step_paddle(&arena, &left, Direction::Down).unwrap(),
            PaddleOutcome::Moved(Position::new(3, 16))
        );
    }

    #[test]
    fn paddle_ignores_horizontal_input() {
        let (arena, _, left, _) = fixtures();
        assert_eq!(
            step_paddle(&arena, &left, Direction::Left).unwrap(),
            PaddleOutcome::Rejected
        );
    }
}
