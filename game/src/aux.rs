//! Auxiliary abstractions.

use crate::error::*;
use rand_derive2::RandGen;
use serde::{Deserialize, Serialize};
use std::{fmt, ops, str::FromStr};

/// Grid cell abstraction.
///
/// Note that this coordinates system is the screen one, so (0, 0) cell is the
/// top left corner of the board and Y-axis is going down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Cell {
    /// Column of the cell.
    pub x: i32,

    /// Row of the cell.
    pub y: i32,
}

impl Cell {
    /// Return a new [`Cell`].
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return the neighbour cell one step away in `direction`.
    ///
    /// There's no wraparound here, so the result may lie outside of any grid.
    pub fn offset(self, direction: Direction) -> Self {
        self + direction.delta()
    }

    /// Like [`offset`](Self::offset), but wraps each axis independently
    /// modulo `size`.
    pub fn offset_wrapped(self, direction: Direction, size: usize) -> Self {
        let size = size as i32;
        let Cell { x, y } = self.offset(direction);
        Self::new(x.rem_euclid(size), y.rem_euclid(size))
    }
}

impl From<Cell> for (i32, i32) {
    fn from(c: Cell) -> Self {
        (c.x, c.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from(t: (i32, i32)) -> Self {
        Self::new(t.0, t.1)
    }
}

impl ops::Add for Cell {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Heading of the snake. There's no neutral value, a snake is always moving
/// somewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, RandGen, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Up.
    Up,

    /// Down.
    Down,

    /// Left.
    Left,

    /// Right.
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Return opposite direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step of the direction in screen coordinates.
    fn delta(self) -> Cell {
        match self {
            Self::Up => Cell::new(0, -1),
            Self::Down => Cell::new(0, 1),
            Self::Left => Cell::new(-1, 0),
            Self::Right => Cell::new(1, 0),
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::Right
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lower_case = format!("{:?}", self).to_lowercase();
        write!(f, "{}", lower_case)
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "right" => Ok(Self::Right),
            "left" => Ok(Self::Left),
            _ => Err(ParseDirectionError),
        }
    }
}

impl ops::Neg for Direction {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.opposite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_sum() {
        let c1 = Cell::new(10, 15);
        let c2 = Cell::new(-5, 3);

        assert_eq!(c1 + c2, Cell::new(5, 18));
    }

    #[test]
    fn offset_is_unit_step() {
        let c = Cell::new(5, 5);

        assert_eq!(c.offset(Direction::Up), Cell::new(5, 4));
        assert_eq!(c.offset(Direction::Down), Cell::new(5, 6));
        assert_eq!(c.offset(Direction::Left), Cell::new(4, 5));
        assert_eq!(c.offset(Direction::Right), Cell::new(6, 5));
    }

    #[test]
    fn offset_leaves_the_board() {
        assert_eq!(Cell::new(0, 3).offset(Direction::Left), Cell::new(-1, 3));
        assert_eq!(Cell::new(24, 0).offset(Direction::Up), Cell::new(24, -1));
    }

    #[test]
    fn offset_wrapped_on_edges() {
        assert_eq!(Cell::new(24, 3).offset_wrapped(Direction::Right, 25), Cell::new(0, 3));
        assert_eq!(Cell::new(0, 3).offset_wrapped(Direction::Left, 25), Cell::new(24, 3));
        assert_eq!(Cell::new(7, 0).offset_wrapped(Direction::Up, 25), Cell::new(7, 24));
        assert_eq!(Cell::new(7, 24).offset_wrapped(Direction::Down, 25), Cell::new(7, 0));
        assert_eq!(Cell::new(10, 5).offset_wrapped(Direction::Right, 25), Cell::new(11, 5));
    }

    #[test]
    fn dir_neg() {
        assert_eq!(Direction::Left, -Direction::Right);
        assert_eq!(Direction::Right, -Direction::Left);
        assert_eq!(Direction::Down, -Direction::Up);
        assert_eq!(Direction::Up, -Direction::Down);
    }

    #[test]
    fn dir_from_str() {
        assert_eq!(Direction::Up, "up".parse().unwrap());
        assert_eq!(Direction::Down, "down".parse().unwrap());
        assert_eq!(Direction::Left, "left".parse().unwrap());
        assert_eq!(Direction::Right, "right".parse().unwrap());
        assert!("north".parse::<Direction>().is_err());
    }
}
