pub mod config;
pub mod events;
pub mod net;
pub mod round;
pub mod sim;
pub mod sync;

pub use config::GameConfig;
pub use events::GameEvent;
pub use net::{
    DEFAULT_DISCOVERY_PORT, DEFAULT_GAME_PORT, Discovery, DiscoveryConfig, FrameError, Link,
    LinkConfig, MoveFrame, Participant, RemoteSource,
};
pub use round::{MatchController, MatchPhase, Scoreboard, WIN_SCORE};
pub use sim::{
    Arena, BallOutcome, Direction, EntityKind, Movable, PaddleOutcome, Position, Side, SimError,
    step_ball, step_paddle,
};
pub use sync::GameState;
