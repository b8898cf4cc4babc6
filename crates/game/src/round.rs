//! Round and match progression.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::events::GameEvent;
use crate::sim::Side;
use crate::sync::GameState;

/// First side to this many goals wins the match.
pub const WIN_SCORE: u8 = 3;

/// Pause between a goal and the next serve.
const ROUND_RESET_DELAY: Duration = Duration::from_secs(3);

const GOAL_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPhase {
    #[default]
    Idle,
    Running,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scoreboard {
    pub left: u8,
    pub right: u8,
}

impl Scoreboard {
    pub fn side(&self, side: Side) -> u8 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn add(&mut self, side: Side) -> u8 {
        let slot = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *slot += 1;
        *slot
    }
}

/// Drives the match: starts rounds, tallies goals reported by the ball
/// loop, and stops everything once one side reaches [`WIN_SCORE`].
///
/// Both peers run their own controller over the same deterministic goal
/// sequence, so the scoreboards never diverge.
pub struct MatchController {
    state: Arc<GameState>,
    scores: Scoreboard,
    phase: MatchPhase,
    reset_delay: Duration,
}

impl MatchController {
    pub fn new(state: Arc<GameState>) -> Self {
        Self {
            state,
            scores: Scoreboard::default(),
            phase: MatchPhase::Idle,
            reset_delay: ROUND_RESET_DELAY,
        }
    }

    /// Overrides the pause between a goal and the next serve.
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn scores(&self) -> Scoreboard {
        self.scores
    }

    /// Blocks until the match is decided or the goal channel closes.
    /// Returns the winner, or `None` when the match was torn down early
    /// (simulation fault or the peer going away).
    pub fn run(&mut self, goals: &Receiver<Side>, events: &Sender<GameEvent>) -> Option<Side> {
        self.phase = MatchPhase::Running;
        self.state.start_match();
        self.state.start_round();
        let _ = events.send(GameEvent::RoundStarted);

        while self.state.game_running() {
            let side = match goals.recv_timeout(GOAL_POLL) {
                Ok(side) => side,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };

            let score = self.scores.add(side);
            log::info!("{} scores, {}:{}", side.as_str(), self.scores.left, self.scores.right);
            let _ = events.send(GameEvent::ScoreChanged { side, score });
            let _ = events.send(GameEvent::RoundEnded { scored_by: side });

            let ball = self.state.reset_ball();
            let _ = events.send(GameEvent::EntityAppeared {
                kind: ball.kind,
                pos: ball.pos,
                symbol: ball.kind.symbol(),
            });

            if score >= WIN_SCORE {
                self.phase = MatchPhase::Over;
                self.state.stop_match();
                let _ = events.send(GameEvent::MatchEnded { winner: side });
                log::info!("match over, {} wins", side.as_str());
                return Some(side);
            }

            thread::sleep(self.reset_delay);
            self.state.start_round();
            let _ = events.send(GameEvent::RoundStarted);
        }

        self.phase = MatchPhase::Over;
        self.state.stop_match();
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::sim::Arena;

    #[test]
    fn scoreboard_tallies_per_side() {
        let mut scores = Scoreboard::default();
        assert_eq!(scores.add(Side::Left), 1);
        assert_eq!(scores.add(Side::Right), 1);
        assert_eq!(scores.add(Side::Left), 2);
        assert_eq!(scores.side(Side::Left), 2);
        assert_eq!(scores.side(Side::Right), 1);
    }

    #[test]
    fn run_ends_when_one_side_reaches_win_score() {
        let state = Arc::new(GameState::new(Arena::default()));
        let mut controller =
            MatchController::new(Arc::clone(&state)).with_reset_delay(Duration::ZERO);
        let (goal_tx, goal_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let driver = thread::spawn(move || {
            for _ in 0..WIN_SCORE {
                goal_tx.send(Side::Right).unwrap();
            }
        });
        let winner = controller.run(&goal_rx, &event_tx);
        driver.join().unwrap();

        assert_eq!(winner, Some(Side::Right));
        assert_eq!(controller.phase(), MatchPhase::Over);
        assert_eq!(controller.scores().right, WIN_SCORE);
        assert!(!state.game_running());

        let events: Vec<GameEvent> = event_rx.try_iter().collect();
        assert!(events.contains(&GameEvent::MatchEnded {
            winner: Side::Right
        }));
        assert!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
                .count()
                == WIN_SCORE as usize
        );
    }

    #[test]
    fn run_returns_none_when_goal_channel_closes() {
        let state = Arc::new(GameState::new(Arena::default()));
        let mut controller = MatchController::new(state);
        let (goal_tx, goal_rx) = mpsc::channel::<Side>();
        let (event_tx, _event_rx) = mpsc::channel();
        drop(goal_tx);

        assert_eq!(controller.run(&goal_rx, &event_tx), None);
        assert_eq!(controller.phase(), MatchPhase::Over);
    }
}
