mod menu;
mod tui;

use std::fs::OpenOptions;
use std::io;
use std::net::SocketAddr;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use netpong::sync::{spawn_apply_loop, spawn_ball_loop};
use netpong::{
    Arena, Direction, Discovery, DiscoveryConfig, GameConfig, GameEvent, GameState, Link,
    LinkConfig, MatchController, MoveFrame, RemoteSource, Side,
};

use menu::Setup;
use tui::ViewState;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Parser)]
#[command(name = "netpong-peer")]
#[command(about = "Two-player LAN pong, one peer per player")]
struct Args {
    /// Paddle to control: "left" hosts, "right" joins. Without this
    /// flag the menu asks.
    #[arg(short, long)]
    side: Option<String>,

    /// Peer address for the joining side; skips discovery.
    #[arg(short, long)]
    remote: Option<SocketAddr>,

    #[arg(short, long, default_value_t = netpong::DEFAULT_GAME_PORT)]
    port: u16,

    #[arg(long, default_value_t = netpong::DEFAULT_DISCOVERY_PORT)]
    discovery_port: u16,

    /// Log destination; stderr would fight the terminal UI.
    #[arg(long, default_value = "netpong.log")]
    log_file: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let side = match args.side.as_deref() {
        Some("left") => Some(Side::Left),
        Some("right") => Some(Side::Right),
        Some(other) => anyhow::bail!("unknown side {:?}, expected left or right", other),
        None => None,
    };

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, side, &args);
    restore_terminal(&mut terminal)?;
    result
}

fn init_logging(path: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn setup_terminal() -> io::Result<Term> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Term) -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)
}

fn run(terminal: &mut Term, side: Option<Side>, args: &Args) -> Result<()> {
    let setup = match side {
        Some(side) => Some(Setup {
            side,
            remote: args.remote,
        }),
        None => menu::run(terminal, args.port)?,
    };
    let Some(setup) = setup else {
        return Ok(());
    };

    let config = GameConfig {
        local_side: setup.side,
        remote_addr: setup.remote.or(args.remote),
        game_port: args.port,
        discovery_port: args.discovery_port,
        arena: Arena::default(),
    };
    log::info!(
        "starting as {} (remote: {:?})",
        config.local_side.as_str(),
        config.remote_addr
    );

    let (link, frames) = establish(terminal, &config)?;
    play(terminal, &config, link, frames)
}

/// Brings up the one game connection. The left player hosts and also
/// announces itself over UDP; the right player joins, falling back to
/// discovery when no address was given.
fn establish(terminal: &mut Term, config: &GameConfig) -> Result<(Link, Receiver<MoveFrame>)> {
    terminal.draw(|frame| tui::render_waiting(frame, config))?;

    let discovery_config = DiscoveryConfig {
        discovery_port: config.discovery_port,
        game_port: config.game_port,
        ..DiscoveryConfig::default()
    };

    let pair = match config.local_side {
        Side::Left => {
            let (tx, _rx) = mpsc::channel();
            let mut discovery = Discovery::spawn(discovery_config, tx);
            let pair = Link::host(&LinkConfig {
                game_port: config.game_port,
            })?;
            discovery.stop();
            pair
        }
        Side::Right => match config.remote_addr {
            Some(addr) => Link::join(RemoteSource::Configured(addr))?,
            None => {
                let (tx, rx) = mpsc::channel();
                let mut discovery = Discovery::spawn(discovery_config, tx);
                let pair = Link::join(RemoteSource::Discovered(rx))?;
                discovery.stop();
                pair
            }
        },
    };
    Ok(pair)
}

fn play(
    terminal: &mut Term,
    config: &GameConfig,
    link: Link,
    frames: Receiver<MoveFrame>,
) -> Result<()> {
    let link = Arc::new(link);
    let state = Arc::new(GameState::new(config.arena));
    let (event_tx, event_rx) = mpsc::channel();
    let (goal_tx, goal_rx) = mpsc::channel();

    let _ = event_tx.send(GameEvent::PeerConnected { addr: link.peer() });

    // The worker loops exit as soon as the match flag drops, so it has
    // to be up before they start.
    state.start_match();
    let ball = spawn_ball_loop(
        Arc::clone(&state),
        Arc::clone(&link),
        event_tx.clone(),
        goal_tx,
    );
    let apply = spawn_apply_loop(
        Arc::clone(&state),
        config.local_side,
        frames,
        event_tx.clone(),
    );
    let controller = {
        let state = Arc::clone(&state);
        let event_tx = event_tx.clone();
        thread::spawn(move || MatchController::new(state).run(&goal_rx, &event_tx))
    };

    let local_side = config.local_side;
    let mut view = ViewState::new(local_side, link.peer());
    let paddle_interval = state.paddle(local_side).step_interval();
    let mut last_step = Instant::now() - paddle_interval;

    loop {
        for ev in event_rx.try_iter() {
            view.apply(ev);
        }
        if !link.is_connected() && state.game_running() {
            log::warn!("peer gone, stopping the match");
            state.stop_match();
            view.peer_lost = true;
        }

        terminal.draw(|frame| tui::render(frame, &view, &state))?;

        if !event::poll(Duration::from_millis(33))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Enter if view.winner.is_some() => break,
            KeyCode::Up | KeyCode::Char('w') => {
                if last_step.elapsed() >= paddle_interval {
                    state.apply_local_input(local_side, Direction::Up, &link, &event_tx);
                    last_step = Instant::now();
                }
            }
            KeyCode::Down | KeyCode::Char('s') => {
                if last_step.elapsed() >= paddle_interval {
                    state.apply_local_input(local_side, Direction::Down, &link, &event_tx);
                    last_step = Instant::now();
                }
            }
            _ => {}
        }
    }

    state.stop_match();
    let _ = ball.join();
    let _ = apply.join();
    let _ = controller.join();
    Ok(())
}
