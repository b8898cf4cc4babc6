//! Start-up menu: host, join (with optional address entry), or quit.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use netpong::Side;

use crate::Term;

/// What the player picked. `remote: None` on the joining side means
/// "search the LAN".
pub struct Setup {
    pub side: Side,
    pub remote: Option<SocketAddr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Main,
    Join,
}

const MENU_ITEMS: [&str; 3] = ["  Host Game", "  Join Game", "  Quit"];

pub fn run(terminal: &mut Term, game_port: u16) -> io::Result<Option<Setup>> {
    let mut screen = Screen::Main;
    let mut selected = 0usize;
    let mut input = String::new();
    let mut error: Option<String> = None;

    loop {
        let current_error = error.clone();
        let current_input = input.clone();
        terminal.draw(|frame| {
            render(
                frame,
                screen,
                selected,
                &current_input,
                current_error.as_deref(),
            );
        })?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match screen {
            Screen::Main => match key.code {
                KeyCode::Up | KeyCode::Char('k') => selected = selected.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => {
                    selected = (selected + 1).min(MENU_ITEMS.len() - 1);
                }
                KeyCode::Enter => match selected {
                    0 => {
                        return Ok(Some(Setup {
                            side: Side::Left,
                            remote: None,
                        }));
                    }
                    1 => screen = Screen::Join,
                    _ => return Ok(None),
                },
                KeyCode::Char('q') | KeyCode::Esc => return Ok(None),
                _ => {}
            },
            Screen::Join => match key.code {
                KeyCode::Esc => {
                    screen = Screen::Main;
                    input.clear();
                    error = None;
                }
                KeyCode::Enter => {
                    let trimmed = input.trim();
                    if trimmed.is_empty() {
                        return Ok(Some(Setup {
                            side: Side::Right,
                            remote: None,
                        }));
                    }
                    match parse_remote(trimmed, game_port) {
                        Ok(addr) => {
                            return Ok(Some(Setup {
                                side: Side::Right,
                                remote: Some(addr),
                            }));
                        }
                        Err(msg) => error = Some(msg),
                    }
                }
                KeyCode::Backspace => {
                    input.pop();
                    error = None;
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    error = None;
                }
                _ => {}
            },
        }
    }
}

/// A bare IP gets the default game port appended.
fn parse_remote(input: &str, game_port: u16) -> Result<SocketAddr, String> {
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, game_port));
    }
    Err(format!("not an address: {:?}", input))
}

fn render(frame: &mut Frame, screen: Screen, selected: usize, input: &str, error: Option<&str>) {
    let area = frame.area();

    let block = Block::default()
        .title(" NetPong ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Min(0)])
        .split(area)[0];

    match screen {
        Screen::Main => render_main(frame, inner, selected),
        Screen::Join => render_join(frame, inner, input, error),
    }
}

fn render_main(frame: &mut Frame, area: Rect, selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    let title = r#"
  ____   ___  _   _  ____
 |  _ \ / _ \| \ | |/ ___|
 | |_) | | | |  \| | |  _
 |  __/| |_| | |\  | |_| |
 |_|    \___/|_| \_|\____|
"#;

    let title_widget = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    frame.render_widget(title_widget, chunks[0]);

    let items: Vec<ListItem> = MENU_ITEMS
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let item = ListItem::new(*item);
            if i == selected {
                item.style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                item
            }
        })
        .collect();
    frame.render_widget(List::new(items), chunks[2]);

    let help = Paragraph::new("Up/Down select, Enter confirm, q quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}

fn render_join(frame: &mut Frame, area: Rect, input: &str, error: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    let input_block = Block::default()
        .title(" Peer address ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let input_widget = Paragraph::new(format!("{}_", input)).block(input_block);
    frame.render_widget(input_widget, chunks[0]);

    if let Some(msg) = error {
        let error_widget = Paragraph::new(msg).style(Style::default().fg(Color::Red));
        frame.render_widget(error_widget, chunks[1]);
    }

    let help = Paragraph::new("Enter an address, or leave empty to search the LAN. Esc goes back.")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}
