//! Geometry primitives: [`Direction`], [`GridCoord`] and [`Vec2`].
//!
//! Grid coordinates are unbounded integers; whether a coordinate lies inside
//! a particular [`Grid`](crate::Grid) is decided by the grid itself.

use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the four cardinal moves on the grid.
///
/// The discriminants are the 2-bit codes stored in a packed path, so the
/// order is fixed: Right, Down, Left, Up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl Direction {
    /// All directions in neighbor expansion order.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// The direction that undoes this move.
    #[inline]
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
        }
    }

    /// The (dx, dy) offset of one step. Y grows down.
    #[inline]
    pub const fn delta(self) -> GridCoord {
        match self {
            Direction::Right => GridCoord::new(1, 0),
            Direction::Down => GridCoord::new(0, 1),
            Direction::Left => GridCoord::new(-1, 0),
            Direction::Up => GridCoord::new(0, -1),
        }
    }

    /// Decode a 2-bit step code. Only the low two bits are used.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Direction::Right,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Up,
        }
    }

    /// The 2-bit step code.
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Right => "Right",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Up => "Up",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// GridCoord
// ---------------------------------------------------------------------------

/// An integer cell coordinate. X grows right, Y grows down.
///
/// Negative or overlarge values are legal and mean "outside the grid".
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate one step away in direction `dir`.
    #[inline]
    pub const fn moved(self, dir: Direction) -> Self {
        let d = dir.delta();
        Self::new(self.x + d.x, self.y + d.y)
    }

    /// The coordinate we came from if `dir` was the last step taken.
    #[inline]
    pub const fn reversed_move(self, dir: Direction) -> Self {
        self.moved(dir.reversed())
    }

    /// Manhattan distance to `other`.
    #[inline]
    pub const fn dist(self, other: GridCoord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl Add for GridCoord {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GridCoord {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A continuous world-space position.
///
/// Only used at the world/grid boundary; the search itself never sees floats.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}
