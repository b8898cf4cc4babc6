//! Shared game state and the threads that mutate it.
//!
//! Each entity sits behind its own lock so the ball thread, the input
//! handler and the frame application loop never contend on more than
//! they touch. When the ball thread needs all three it takes them in a
//! fixed order (ball, left paddle, right paddle); every other path
//! takes exactly one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::events::GameEvent;
use crate::net::{Link, MoveFrame, Participant};
use crate::sim::{
    Arena, BallOutcome, Direction, EntityKind, Movable, PaddleOutcome, Side, step_ball,
    step_paddle,
};

const IDLE_POLL: Duration = Duration::from_millis(50);
const APPLY_POLL: Duration = Duration::from_millis(250);

pub struct GameState {
    arena: Arena,
    ball: Mutex<Movable>,
    left_paddle: Mutex<Movable>,
    right_paddle: Mutex<Movable>,
    game_running: AtomicBool,
    round_running: AtomicBool,
}

impl GameState {
    pub fn new(arena: Arena) -> Self {
        Self {
            ball: Mutex::new(Movable::ball(&arena)),
            left_paddle: Mutex::new(Movable::paddle(&arena, Side::Left)),
            right_paddle: Mutex::new(Movable::paddle(&arena, Side::Right)),
            arena,
            game_running: AtomicBool::new(false),
            round_running: AtomicBool::new(false),
        }
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn ball(&self) -> Movable {
        *lock(&self.ball)
    }

    pub fn paddle(&self, side: Side) -> Movable {
        *lock(self.paddle_slot(side))
    }

    fn paddle_slot(&self, side: Side) -> &Mutex<Movable> {
        match side {
            Side::Left => &self.left_paddle,
            Side::Right => &self.right_paddle,
        }
    }

    pub fn game_running(&self) -> bool {
        self.game_running.load(Ordering::SeqCst)
    }

    pub fn round_running(&self) -> bool {
        self.round_running.load(Ordering::SeqCst)
    }

    pub fn start_match(&self) {
        self.game_running.store(true, Ordering::SeqCst);
    }

    pub fn stop_match(&self) {
        self.round_running.store(false, Ordering::SeqCst);
        self.game_running.store(false, Ordering::SeqCst);
    }

    pub fn start_round(&self) {
        self.round_running.store(true, Ordering::SeqCst);
    }

    pub fn end_round(&self) {
        self.round_running.store(false, Ordering::SeqCst);
    }

    /// Puts the ball back at the arena center after a goal. The travel
    /// direction is deliberately kept, so the serve continues the way
    /// the last round ended on both peers alike.
    pub fn reset_ball(&self) -> Movable {
        let mut ball = lock(&self.ball);
        ball.pos = self.arena.center();
        *ball
    }

    /// Moves the locally controlled paddle one step and announces the
    /// move to the peer. Steps the engine rejects (wall contact, or a
    /// direction a paddle cannot take) change nothing and send nothing.
    /// Paddles stay drivable through the serve pause between rounds;
    /// only the end of the match freezes them.
    pub fn apply_local_input(
        &self,
        side: Side,
        dir: Direction,
        link: &Link,
        events: &Sender<GameEvent>,
    ) {
        if !self.game_running() {
            return;
        }
        let mut paddle = lock(self.paddle_slot(side));
        match step_paddle(&self.arena, &paddle, dir) {
            Ok(PaddleOutcome::Moved(pos)) => {
                let from = paddle.pos;
                paddle.pos = pos;
                paddle.dir = dir;
                link.send(&MoveFrame::new(Participant::Paddle, dir, pos.x, pos.y));
                let _ = events.send(GameEvent::EntityMoved {
                    kind: paddle.kind,
                    from,
                    to: pos,
                });
            }
            Ok(PaddleOutcome::Rejected) => {}
            Err(e) => {
                log::error!("paddle simulation fault: {}", e);
                self.stop_match();
            }
        }
    }
}

fn lock(slot: &Mutex<Movable>) -> MutexGuard<'_, Movable> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs the ball simulation until the match stops. Both peers run this
/// loop over the same deterministic engine; only bounces go over the
/// wire, and position-equal inbound frames are dropped on the far side.
pub fn spawn_ball_loop(
    state: Arc<GameState>,
    link: Arc<Link>,
    events: Sender<GameEvent>,
    goals: Sender<Side>,
) -> JoinHandle<()> {
    thread::spawn(move || ball_loop(&state, &link, &events, &goals))
}

fn ball_loop(state: &GameState, link: &Link, events: &Sender<GameEvent>, goals: &Sender<Side>) {
    while state.game_running() {
        if !state.round_running() {
            thread::sleep(IDLE_POLL);
            continue;
        }

        let interval;
        {
            let mut ball = lock(&state.ball);
            let left = *lock(&state.left_paddle);
            let right = *lock(&state.right_paddle);
            match step_ball(&state.arena, &ball, &left, &right) {
                Ok(BallOutcome::Advance(pos)) => {
                    let from = ball.pos;
                    ball.pos = pos;
                    let _ = events.send(GameEvent::EntityMoved {
                        kind: EntityKind::Ball,
                        from,
                        to: pos,
                    });
                }
                Ok(BallOutcome::Bounce { dir, pos }) => {
                    let from = ball.pos;
                    ball.dir = dir;
                    ball.pos = pos;
                    link.send(&MoveFrame::new(Participant::Ball, dir, pos.x, pos.y));
                    let _ = events.send(GameEvent::EntityMoved {
                        kind: EntityKind::Ball,
                        from,
                        to: pos,
                    });
                }
                Ok(BallOutcome::Hold) => {}
                Ok(BallOutcome::Goal { scored_by }) => {
                    state.end_round();
                    if goals.send(scored_by).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    // A position leaving the grid means the two
                    // simulations already disagree; refuse to limp on.
                    log::error!("ball simulation fault: {}", e);
                    state.stop_match();
                    break;
                }
            }
            interval = ball.step_interval();
        }
        thread::sleep(interval);
    }
    log::debug!("ball loop stopped");
}

/// Applies frames received from the peer. Ball frames overwrite the
/// local ball; paddle frames only ever touch the remote paddle, so a
/// stray echo can never fight the local input handler.
pub fn spawn_apply_loop(
    state: Arc<GameState>,
    local_side: Side,
    frames: Receiver<MoveFrame>,
    events: Sender<GameEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || apply_loop(&state, local_side, &frames, &events))
}

fn apply_loop(
    state: &GameState,
    local_side: Side,
    frames: &Receiver<MoveFrame>,
    events: &Sender<GameEvent>,
) {
    loop {
        if !state.game_running() {
            break;
        }
        match frames.recv_timeout(APPLY_POLL) {
            Ok(frame) => apply_frame(state, local_side, frame, events),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                log::debug!("frame channel closed");
                break;
            }
        }
    }
    log::debug!("apply loop stopped");
}

fn apply_frame(state: &GameState, local_side: Side, frame: MoveFrame, events: &Sender<GameEvent>) {
    let slot = match frame.participant {
        Participant::Ball => &state.ball,
        Participant::Paddle => state.paddle_slot(local_side.opposite()),
    };
    let mut entity = lock(slot);
    if entity.pos.x == frame.x && entity.pos.y == frame.y {
        // Both peers announced the same bounce; nothing new here.
        log::trace!("dropping duplicate {:?}", frame);
        return;
    }
    let from = entity.pos;
    entity.pos.x = frame.x;
    entity.pos.y = frame.y;
    entity.dir = frame.dir;
    let _ = events.send(GameEvent::EntityMoved {
        kind: entity.kind,
        from,
        to: entity.pos,
    });
}
