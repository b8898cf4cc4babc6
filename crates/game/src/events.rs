//! Game events published to the frontend.

use std::net::SocketAddr;

use crate::sim::{EntityKind, Position, Side};

/// Everything the renderer and status line need to know about, in the
/// order it happened. Produced by the simulation threads and the match
/// controller, consumed by the frontend loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// An entity was placed on the field (initial spawn or goal reset).
    EntityAppeared {
        kind: EntityKind,
        pos: Position,
        symbol: char,
    },
    /// An entity moved one step.
    EntityMoved {
        kind: EntityKind,
        from: Position,
        to: Position,
    },
    PeerConnected {
        addr: SocketAddr,
    },
    ScoreChanged {
        side: Side,
        score: u8,
    },
    RoundEnded {
        scored_by: Side,
    },
    RoundStarted,
    MatchEnded {
        winner: Side,
    },
}
