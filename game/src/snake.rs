//! Snake abstractions.

use crate::aux::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snake body, head first.
///
/// A snake always has at least one cell. Every move produces a new [`Snake`]
/// instead of shifting parts in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Snake {
    cells: Vec<Cell>,
}

impl Snake {
    /// Return a one-cell [`Snake`] located at `head`.
    pub fn new(head: Cell) -> Self {
        Self { cells: vec![head] }
    }

    /// Return a [`Snake`] made of `cells`, head first. Return `None` if
    /// `cells` is empty.
    pub fn from_cells(cells: Vec<Cell>) -> Option<Self> {
        match cells.is_empty() {
            true => None,
            false => Some(Self { cells }),
        }
    }

    /// Translate the snake one step in `direction`: the head advances without
    /// wrapping and the tail cell is dropped, so length stays the same.
    pub fn moved(&self, direction: Direction) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        cells.push(self.head().offset(direction));
        cells.extend_from_slice(&self.cells[..self.cells.len() - 1]);
        Self { cells }
    }

    /// Prepend a new head one step in `direction`, wrapped modulo `grid_size`
    /// on each axis. Nothing is dropped, so length grows by one.
    ///
    /// Unlike [`moved`](Self::moved), this never leaves the board.
    pub fn grown(&self, direction: Direction, grid_size: usize) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len() + 1);
        cells.push(self.head().offset_wrapped(direction, grid_size));
        cells.extend_from_slice(&self.cells);
        Self { cells }
    }

    /// Return `true` if the head overlaps any other part of the body.
    pub fn bumped(&self) -> bool {
        let head = self.head();
        self.tail().contains(&head)
    }

    /// Return the head cell.
    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    /// Return snake cells without the head.
    pub fn tail(&self) -> &[Cell] {
        &self.cells[1..]
    }

    /// Return all cells, head first.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Return `true` if `cell` is occupied by the snake.
    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Return snake's length.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Return true if snake has zero length, which never happens for a
    /// constructed snake.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl fmt::Display for Snake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", cell)?;
        }
        Ok(())
    }
}
