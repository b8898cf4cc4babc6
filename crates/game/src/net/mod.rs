mod discovery;
mod frame;
mod link;

pub use discovery::{Discovery, DiscoveryConfig};
pub use frame::{FRAME_LEN, FrameError, MoveFrame, Participant};
pub use link::{Link, LinkConfig, RemoteSource};

/// Well-known TCP port carrying all movement-event traffic.
pub const DEFAULT_GAME_PORT: u16 = 19082;

/// Well-known UDP port for broadcast peer discovery.
pub const DEFAULT_DISCOVERY_PORT: u16 = 11000;
