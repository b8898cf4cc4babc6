//! UDP broadcast peer discovery, used only when no remote address was
//! configured. Both roles are advisory: socket errors are logged and the
//! process keeps running, and both threads stop the moment the owner
//! raises the stop flag (the peer does so right after connecting).

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{DEFAULT_DISCOVERY_PORT, DEFAULT_GAME_PORT};

const HELLO: &[u8] = b"netpong hello";
const BROADCAST_INTERVAL: Duration = Duration::from_secs(1);
const LISTEN_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub discovery_port: u16,
    /// Port a discovered peer is expected to accept the game
    /// connection on.
    pub game_port: u16,
    /// Datagrams whose source IP is in this set are self-originated
    /// broadcast echoes and are ignored.
    pub local_addrs: Vec<IpAddr>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            discovery_port: DEFAULT_DISCOVERY_PORT,
            game_port: DEFAULT_GAME_PORT,
            local_addrs: local_addresses(),
        }
    }
}

/// Handle over the listener and broadcaster threads.
pub struct Discovery {
    stop: Arc<AtomicBool>,
    listener: Option<JoinHandle<()>>,
    broadcaster: Option<JoinHandle<()>>,
}

impl Discovery {
    /// Starts both roles. Discovered peer endpoints are published on
    /// `found`; the first one the connection manager consumes wins.
    pub fn spawn(config: DiscoveryConfig, found: Sender<SocketAddr>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));

        let listener = {
            let config = config.clone();
            let stop = Arc::clone(&stop);
            thread::spawn(move || listen_for_peers(&config, &found, &stop))
        };
        let broadcaster = {
            let stop = Arc::clone(&stop);
            thread::spawn(move || broadcast_presence(config.discovery_port, &stop))
        };

        Self {
            stop,
            listener: Some(listener),
            broadcaster: Some(broadcaster),
        }
    }

    /// Raises the stop flag and waits for both threads to exit.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.listener.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.broadcaster.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Discovery {
    fn drop(&mut self) {
        self.stop();
    }
}

fn listen_for_peers(config: &DiscoveryConfig, found: &Sender<SocketAddr>, stop: &AtomicBool) {
    let socket = match UdpSocket::bind((Ipv4Addr::UNSPECIFIED, config.discovery_port)) {
        Ok(socket) => socket,
        Err(e) => {
            log::warn!("discovery listener bind failed: {}", e);
            return;
        }
    };
    if let Err(e) = socket.set_broadcast(true) {
        log::warn!("discovery listener broadcast opt failed: {}", e);
    }
    // Short read timeout keeps cancellation prompt.
    if let Err(e) = socket.set_read_timeout(Some(LISTEN_POLL)) {
        log::warn!("discovery listener timeout opt failed: {}", e);
        return;
    }

    let mut buf = [0u8; 64];
    while !stop.load(Ordering::SeqCst) {
        match socket.recv_from(&mut buf) {
            Ok((len, src)) => {
                if config.local_addrs.contains(&src.ip()) {
                    log::debug!("ignoring own beacon echoed from {}", src);
                    continue;
                }
                let peer = SocketAddr::new(src.ip(), config.game_port);
                log::info!(
                    "discovered peer {} (announced {:?})",
                    peer,
                    String::from_utf8_lossy(&buf[..len])
                );
                if found.send(peer).is_err() {
                    break;
                }
            }
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                continue;
            }
            Err(e) => {
                log::warn!("discovery receive error: {}", e);
                sleep_unless_stopped(stop, BROADCAST_INTERVAL);
            }
        }
    }
}

fn broadcast_presence(discovery_port: u16, stop: &AtomicBool) {
    let socket = match UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)) {
        Ok(socket) => socket,
        Err(e) => {
            log::warn!("discovery broadcaster bind failed: {}", e);
            return;
        }
    };
    if let Err(e) = socket.set_broadcast(true) {
        log::warn!("discovery broadcaster opt failed: {}", e);
        return;
    }

    let target = SocketAddr::from((Ipv4Addr::BROADCAST, discovery_port));
    while !stop.load(Ordering::SeqCst) {
        if let Err(e) = socket.send_to(HELLO, target) {
            log::warn!("discovery broadcast failed: {}", e);
        }
        sleep_unless_stopped(stop, BROADCAST_INTERVAL);
    }
}

fn sleep_unless_stopped(stop: &AtomicBool, total: Duration) {
    let slice = Duration::from_millis(50);
    let mut remaining = total;
    while !stop.load(Ordering::SeqCst) && remaining > Duration::ZERO {
        let step = remaining.min(slice);
        thread::sleep(step);
        remaining -= step;
    }
}

/// The machine's own outbound IPv4 address, via a connected UDP socket
/// (no traffic is sent). Used to filter self-originated broadcasts.
fn local_addresses() -> Vec<IpAddr> {
    let mut addrs = vec![IpAddr::V4(Ipv4Addr::LOCALHOST)];
    if let Ok(socket) = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)) {
        if socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9)).is_ok() {
            if let Ok(addr) = socket.local_addr() {
                addrs.push(addr.ip());
            }
        }
    }
    addrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_filters_loopback() {
        let config = DiscoveryConfig::default();
        assert!(config.local_addrs.contains(&IpAddr::V4(Ipv4Addr::LOCALHOST)));
        assert_eq!(config.discovery_port, DEFAULT_DISCOVERY_PORT);
        assert_eq!(config.game_port, DEFAULT_GAME_PORT);
    }
}
