use std::net::SocketAddr;

use crate::net::{DEFAULT_DISCOVERY_PORT, DEFAULT_GAME_PORT};
use crate::sim::{Arena, Side};

/// Everything a peer needs to start playing. Built by the frontend from
/// CLI flags and the menu; the library never reads the environment.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Which paddle this process controls. The left player hosts.
    pub local_side: Side,
    /// Explicit peer address. When absent the joining side falls back
    /// to UDP discovery.
    pub remote_addr: Option<SocketAddr>,
    pub game_port: u16,
    pub discovery_port: u16,
    pub arena: Arena,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            local_side: Side::Left,
            remote_addr: None,
            game_port: DEFAULT_GAME_PORT,
            discovery_port: DEFAULT_DISCOVERY_PORT,
            arena: Arena::default(),
        }
    }
}
