mod arena;
mod direction;
mod engine;
mod entity;

pub use arena::{Arena, Position, SimError};
pub use direction::Direction;
pub use engine::{BallOutcome, PaddleOutcome, step_ball, step_paddle};
pub use entity::{EntityKind, Movable, Side};
