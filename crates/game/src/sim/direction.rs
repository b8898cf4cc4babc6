/// Eight-way movement direction. The discriminants are the on-wire ids
/// (byte 1 of a movement-event frame) and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Down = 1,
    LeftDown = 2,
    Left = 3,
    LeftUp = 4,
    RightDown = 5,
    Right = 6,
    RightUp = 7,
    Up = 8,
}

impl Direction {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Direction::Down),
            2 => Some(Direction::LeftDown),
            3 => Some(Direction::Left),
            4 => Some(Direction::LeftUp),
            5 => Some(Direction::RightDown),
            6 => Some(Direction::Right),
            7 => Some(Direction::RightUp),
            8 => Some(Direction::Up),
            _ => None,
        }
    }

    /// Horizontal component, -1 toward the left wall.
    pub fn dx(self) -> i8 {
        match self {
            Direction::Left | Direction::LeftUp | Direction::LeftDown => -1,
            Direction::Right | Direction::RightUp | Direction::RightDown => 1,
            Direction::Up | Direction::Down => 0,
        }
    }

    /// Vertical component, -1 toward the top wall.
    pub fn dy(self) -> i8 {
        match self {
            Direction::Up | Direction::LeftUp | Direction::RightUp => -1,
            Direction::Down | Direction::LeftDown | Direction::RightDown => 1,
            Direction::Left | Direction::Right => 0,
        }
    }

    /// Top/bottom wall bounce: only the vertical component flips.
    pub fn flip_vertical(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::LeftDown => Direction::LeftUp,
            Direction::LeftUp => Direction::LeftDown,
            Direction::RightDown => Direction::RightUp,
            Direction::RightUp => Direction::RightDown,
            Direction::Left => Direction::Left,
            Direction::Right => Direction::Right,
        }
    }
}
