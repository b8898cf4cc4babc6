use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use netpong::{Discovery, DiscoveryConfig};

static PORT_COUNTER: AtomicU16 = AtomicU16::new(43000);

fn next_port() -> u16 {
    PORT_COUNTER.fetch_add(10, Ordering::SeqCst)
}

#[test]
fn test_listener_maps_announcements_to_the_game_port() {
    let discovery_port = next_port();
    let game_port = next_port();
    let (tx, rx) = mpsc::channel();

    // No local filter, so the loopback announcement below gets through.
    let mut discovery = Discovery::spawn(
        DiscoveryConfig {
            discovery_port,
            game_port,
            local_addrs: Vec::new(),
        },
        tx,
    );

    let announcer = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();

    // With no local filter the listener also hears its own broadcaster,
    // so drain until the loopback announcement shows up. The announcement
    // is re-sent each iteration: one sent before the listener has bound
    // its socket would be dropped.
    let deadline = Instant::now() + Duration::from_secs(3);
    let found = loop {
        assert!(Instant::now() < deadline, "loopback announcement never seen");
        announcer
            .send_to(b"netpong hello", (Ipv4Addr::LOCALHOST, discovery_port))
            .unwrap();
        match rx.recv_timeout(Duration::from_millis(250)) {
            Ok(addr) if addr.ip() == IpAddr::V4(Ipv4Addr::LOCALHOST) => break addr,
            Ok(_) | Err(_) => continue,
        }
    };
    assert_eq!(found.port(), game_port);

    discovery.stop();
}

#[test]
fn test_listener_ignores_its_own_addresses() {
    let discovery_port = next_port();
    let (tx, rx) = mpsc::channel();

    let mut local_addrs = DiscoveryConfig::default().local_addrs;
    if !local_addrs.contains(&IpAddr::V4(Ipv4Addr::LOCALHOST)) {
        local_addrs.push(IpAddr::V4(Ipv4Addr::LOCALHOST));
    }
    let mut discovery = Discovery::spawn(
        DiscoveryConfig {
            discovery_port,
            game_port: next_port(),
            local_addrs,
        },
        tx,
    );

    let announcer = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    announcer
        .send_to(b"netpong hello", (Ipv4Addr::LOCALHOST, discovery_port))
        .unwrap();

    assert!(rx.recv_timeout(Duration::from_millis(700)).is_err());

    discovery.stop();
}

#[test]
fn test_stop_shuts_both_roles_down() {
    let (tx, _rx) = mpsc::channel();
    let mut discovery = Discovery::spawn(
        DiscoveryConfig {
            discovery_port: next_port(),
            game_port: next_port(),
            local_addrs: Vec::new(),
        },
        tx,
    );

    // stop() joins the listener and broadcaster threads; returning at
    // all is the assertion here.
    discovery.stop();
}
