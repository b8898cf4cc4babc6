//! The single reliable duplex connection between the two sides, plus the
//! receive loop that turns raw bytes back into movement events.
//!
//! The hosting side (left player) binds the well-known game port and
//! accepts; the joining side retries `connect` with a fixed backoff until
//! the host is up. There is no protocol version negotiation: any peer
//! that speaks 4-byte movement frames is accepted.

use std::io::{self, Read, Write};
use std::net::{Ipv4Addr, Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::DEFAULT_GAME_PORT;
use super::frame::{FRAME_LEN, MoveFrame};

const RETRY_BACKOFF: Duration = Duration::from_secs(1);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
const RECEIVE_RETRY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub game_port: u16,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            game_port: DEFAULT_GAME_PORT,
        }
    }
}

/// Where the joining side learns the host's endpoint.
pub enum RemoteSource {
    /// Manually entered address, already validated by the caller.
    Configured(SocketAddr),
    /// Endpoints published by the discovery listener.
    Discovered(Receiver<SocketAddr>),
}

/// Established full-duplex game connection. Sending is synchronized on
/// an internal lock; inbound frames arrive on the channel handed out
/// alongside the link, fed by a dedicated receive thread. The link
/// itself holds no channel end, so it can be shared across threads.
pub struct Link {
    writer: Mutex<TcpStream>,
    peer: SocketAddr,
    connected: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl Link {
    /// Host side: bind the game port and wait for the peer. A bind
    /// failure here is the one fatal startup error of the network layer.
    pub fn host(config: &LinkConfig) -> io::Result<(Link, Receiver<MoveFrame>)> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.game_port))?;
        log::info!("hosting on {}", listener.local_addr()?);
        let (stream, peer) = listener.accept()?;
        log::info!("peer connected from {}", peer);
        Link::from_stream(stream, peer)
    }

    /// Joining side: connect to the remote endpoint, retrying forever
    /// with a fixed backoff. Newer discovery results replace the target
    /// between attempts.
    pub fn join(remote: RemoteSource) -> io::Result<(Link, Receiver<MoveFrame>)> {
        let mut target = match &remote {
            RemoteSource::Configured(addr) => *addr,
            RemoteSource::Discovered(rx) => rx
                .recv()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "discovery channel closed"))?,
        };

        loop {
            log::info!("connecting to {}", target);
            match TcpStream::connect_timeout(&target, CONNECT_TIMEOUT) {
                Ok(stream) => {
                    log::info!("connected to {}", target);
                    return Link::from_stream(stream, target);
                }
                Err(e) => {
                    log::debug!("connect to {} failed: {}; retrying", target, e);
                }
            }
            if let RemoteSource::Discovered(rx) = &remote {
                while let Ok(addr) = rx.try_recv() {
                    target = addr;
                }
            }
            thread::sleep(RETRY_BACKOFF);
        }
    }

    fn from_stream(stream: TcpStream, peer: SocketAddr) -> io::Result<(Link, Receiver<MoveFrame>)> {
        // Movement frames are 4 bytes; never let Nagle batch them.
        let _ = stream.set_nodelay(true);

        let reader_stream = stream.try_clone()?;
        let (tx, rx) = mpsc::channel();
        let connected = Arc::new(AtomicBool::new(true));
        let reader = {
            let connected = Arc::clone(&connected);
            thread::spawn(move || receive_loop(reader_stream, &tx, &connected))
        };

        let link = Link {
            writer: Mutex::new(stream),
            peer,
            connected,
            reader: Some(reader),
        };
        Ok((link, rx))
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Sends one movement frame. Transient write errors are logged and
    /// the current cycle continues; they never crash the process.
    pub fn send(&self, frame: &MoveFrame) {
        let Ok(mut writer) = self.writer.lock() else {
            log::error!("send lock poisoned; dropping frame");
            return;
        };
        match writer.write_all(&frame.encode()) {
            Ok(()) => log::debug!("sent {:?}", frame),
            Err(e) => log::warn!("failed to send {:?}: {}", frame, e),
        }
    }

    fn shutdown(&mut self) {
        if let Ok(writer) = self.writer.lock() {
            let _ = writer.shutdown(Shutdown::Both);
        }
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// How the receive loop reacts to a read error. Only end-of-stream ends
/// the loop; everything else is logged and the cycle continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadDisposition {
    Retry,
    Wait,
    Stop,
}

fn disposition(err: &io::Error) -> ReadDisposition {
    match err.kind() {
        io::ErrorKind::Interrupted => ReadDisposition::Retry,
        io::ErrorKind::UnexpectedEof => ReadDisposition::Stop,
        _ => ReadDisposition::Wait,
    }
}

fn receive_loop(mut stream: TcpStream, tx: &Sender<MoveFrame>, connected: &AtomicBool) {
    let mut buf = [0u8; FRAME_LEN];
    loop {
        match stream.read_exact(&mut buf) {
            Ok(()) => match MoveFrame::decode(buf) {
                Ok(frame) => {
                    log::debug!("received {:?}", frame);
                    if tx.send(frame).is_err() {
                        break;
                    }
                }
                // Unknown ids are dropped silently; the loop continues.
                Err(e) => log::debug!("dropping frame {:?}: {}", buf, e),
            },
            Err(e) => match disposition(&e) {
                ReadDisposition::Retry => continue,
                ReadDisposition::Wait => {
                    log::warn!("receive error: {}", e);
                    thread::sleep(RECEIVE_RETRY);
                }
                ReadDisposition::Stop => {
                    log::info!("peer closed the connection");
                    break;
                }
            },
        }
    }
    connected.store(false, Ordering::SeqCst);
}
