//! In-game screen: the playing field plus score header and status
//! overlays. Entity positions are drawn straight from the shared game
//! state; everything else comes from the event stream.

use std::net::SocketAddr;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use netpong::{GameConfig, GameEvent, GameState, Scoreboard, Side};

pub struct ViewState {
    pub local_side: Side,
    pub peer: SocketAddr,
    pub scores: Scoreboard,
    pub winner: Option<Side>,
    pub last_scorer: Option<Side>,
    pub between_rounds: bool,
    pub peer_lost: bool,
}

impl ViewState {
    pub fn new(local_side: Side, peer: SocketAddr) -> Self {
        Self {
            local_side,
            peer,
            scores: Scoreboard::default(),
            winner: None,
            last_scorer: None,
            between_rounds: false,
            peer_lost: false,
        }
    }

    pub fn apply(&mut self, event: GameEvent) {
        match event {
            GameEvent::ScoreChanged { side, score } => match side {
                Side::Left => self.scores.left = score,
                Side::Right => self.scores.right = score,
            },
            GameEvent::RoundEnded { scored_by } => {
                self.last_scorer = Some(scored_by);
                self.between_rounds = true;
            }
            GameEvent::RoundStarted => self.between_rounds = false,
            GameEvent::MatchEnded { winner } => self.winner = Some(winner),
            GameEvent::PeerConnected { addr } => self.peer = addr,
            GameEvent::EntityAppeared { .. } | GameEvent::EntityMoved { .. } => {}
        }
    }
}

pub fn render(frame: &mut Frame, view: &ViewState, state: &GameState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], view);
    render_field(frame, chunks[1], state);
    render_help(frame, chunks[2], view);

    if view.peer_lost {
        render_banner(frame, "Peer disconnected", "Press q to exit");
    } else if let Some(winner) = view.winner {
        let headline = if winner == view.local_side {
            "You win the match!"
        } else {
            "You lose the match."
        };
        render_banner(frame, headline, "Press Enter to exit");
    } else if view.between_rounds {
        if let Some(scorer) = view.last_scorer {
            let headline = if scorer == view.local_side {
                "Goal for you!"
            } else {
                "Goal against you."
            };
            render_banner(frame, headline, "Next round coming up");
        }
    }
}

pub fn render_waiting(frame: &mut Frame, config: &GameConfig) {
    let area = frame.area();
    let block = Block::default()
        .title(" NetPong ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let message = match config.local_side {
        Side::Left => format!(
            "Hosting on port {}. Waiting for a challenger...",
            config.game_port
        ),
        Side::Right => match config.remote_addr {
            Some(addr) => format!("Connecting to {}...", addr),
            None => "Searching the LAN for a host...".to_string(),
        },
    };
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, centered_rect(area, 60, 1));
}

fn render_header(frame: &mut Frame, area: Rect, view: &ViewState) {
    let block = Block::default()
        .title(" PONG ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let you = view.local_side.as_str();
    let text = format!(
        "Left {}  :  {} Right   (you play {}, peer {})",
        view.scores.left, view.scores.right, you, view.peer
    );
    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_field(frame: &mut Frame, area: Rect, state: &GameState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let lines = field_lines(state);
    let paragraph = Paragraph::new(lines.join("\n")).block(block);
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, area: Rect, view: &ViewState) {
    let help = format!(
        "W/S or Up/Down move the {} paddle, q quits",
        view.local_side.as_str()
    );
    let paragraph = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_banner(frame: &mut Frame, headline: &str, hint: &str) {
    let area = centered_rect(frame.area(), 40, 4);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let text = format!("{}\n{}", headline, hint);
    let paragraph = Paragraph::new(text)
        .block(block)
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// One string per arena row, entities stamped at their footprints.
fn field_lines(state: &GameState) -> Vec<String> {
    let arena = state.arena();
    let width = arena.width as usize;
    let height = arena.height as usize;
    let mut grid = vec![vec![' '; width]; height];

    for entity in [
        state.paddle(Side::Left),
        state.paddle(Side::Right),
        state.ball(),
    ] {
        for cell in entity.footprint() {
            let (x, y) = (cell.x as usize, cell.y as usize);
            if x < width && y < height {
                grid[y][x] = entity.kind.symbol();
            }
        }
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
