use thiserror::Error;

use crate::sim::Direction;

/// Every movement event is exactly this many bytes on the wire:
/// `[participant id, direction id, position x, position y]`.
pub const FRAME_LEN: usize = 4;

/// Entity kind identifier in a protocol frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Participant {
    Ball = 1,
    Paddle = 2,
}

impl Participant {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Participant::Ball),
            2 => Some(Participant::Paddle),
            _ => None,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("unknown participant id {0}")]
    UnknownParticipant(u8),
    #[error("unknown direction id {0}")]
    UnknownDirection(u8),
}

/// One direction-change event. Positions are raw byte coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveFrame {
    pub participant: Participant,
    pub dir: Direction,
    pub x: u8,
    pub y: u8,
}

impl MoveFrame {
    pub fn new(participant: Participant, dir: Direction, x: u8, y: u8) -> Self {
        Self {
            participant,
            dir,
            x,
            y,
        }
    }

    pub fn encode(&self) -> [u8; FRAME_LEN] {
        [self.participant.id(), self.dir.id(), self.x, self.y]
    }

    pub fn decode(bytes: [u8; FRAME_LEN]) -> Result<Self, FrameError> {
        let participant =
            Participant::from_id(bytes[0]).ok_or(FrameError::UnknownParticipant(bytes[0]))?;
        let dir = Direction::from_id(bytes[1]).ok_or(FrameError::UnknownDirection(bytes[1]))?;
        Ok(Self {
            participant,
            dir,
            x: bytes[2],
            y: bytes[3],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_layout_is_fixed() {
        let frame = MoveFrame::new(Participant::Ball, Direction::LeftUp, 60, 15);
        assert_eq!(frame.encode(), [1, 4, 60, 15]);

        let frame = MoveFrame::new(Participant::Paddle, Direction::Down, 116, 22);
        assert_eq!(frame.encode(), [2, 1, 116, 22]);
    }

    #[test]
    fn decode_inverts_encode() {
        let frames = [
            MoveFrame::new(Participant::Ball, Direction::RightDown, 0, 255),
            MoveFrame::new(Participant::Paddle, Direction::Up, 3, 14),
        ];
        for frame in frames {
            assert_eq!(MoveFrame::decode(frame.encode()).unwrap(), frame);
        }
    }

    #[test]
    fn unknown_ids_are_rejected() {
        assert_eq!(
            MoveFrame::decode([0, 6, 1, 1]),
            Err(FrameError::UnknownParticipant(0))
        );
        assert_eq!(
            MoveFrame::decode([3, 6, 1, 1]),
            Err(FrameError::UnknownParticipant(3))
        );
        assert_eq!(
            MoveFrame::decode([1, 0, 1, 1]),
            Err(FrameError::UnknownDirection(0))
        );
        assert_eq!(
            MoveFrame::decode([2, 9, 1, 1]),
            Err(FrameError::UnknownDirection(9))
        );
    }
}
