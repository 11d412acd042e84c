//! Game grid abstractions.
//!
//! Grid is a square board with (0, 0) cell in the top left corner. It holds no
//! objects itself, it only knows its bounds.

use crate::{aux::Cell, error::GameError, snake::Snake, GameOver, Result};
use itertools::iproduct;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Square game board of `size` × `size` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
	/// Side length. Valid coordinates are `0..size` on both axes.
	pub size: usize,
}

impl Grid {
	/// Default side length used with [`Default`](Self::default) trait
	/// implementation.
	pub const DEFAULT_SIZE: usize = 25;

	/// Return a new [`Grid`].
	pub fn new(size: usize) -> Self {
		Self { size }
	}

	/// Iterate over every cell of the board, column by column.
	pub fn cells(&self) -> impl Iterator<Item = Cell> {
		let size = self.size as i32;
		iproduct!(0..size, 0..size).map(|(x, y)| Cell::new(x, y))
	}

	/// Return `true` if `cell` lies inside the board.
	pub fn contains(&self, cell: Cell) -> bool {
		let size = self.size as i32;
		(0..size).contains(&cell.x) && (0..size).contains(&cell.y)
	}

	/// Pick a cell not occupied by `snake`, uniformly at random.
	///
	/// Fails with [`GameError::BoardFull`] if the snake covers every cell.
	pub fn generate_food<R: Rng + ?Sized>(&self, snake: &Snake, rng: &mut R) -> Result<Cell> {
		let free: Vec<Cell> = self.cells().filter(|cell| !snake.contains(cell)).collect();
		match free.choose(rng) {
			Some(cell) => Ok(*cell),
			None => Err(Box::new(GameError::BoardFull)),
		}
	}

	/// Return why `snake` is dead, if it is: head out of the board or head
	/// overlapping the body.
	pub fn collision(&self, snake: &Snake) -> Option<GameOver> {
		if !self.contains(snake.head()) {
			Some(GameOver::WallCollision)
		} else if snake.bumped() {
			Some(GameOver::SelfCollision)
		} else {
			None
		}
	}

	/// Return `true` if `snake` hit a wall or itself.
	pub fn check_game_over(&self, snake: &Snake) -> bool {
		self.collision(snake).is_some()
	}
}

impl Default for Grid {
	fn default() -> Self {
		Self::new(Self::DEFAULT_SIZE)
	}
}

impl fmt::Display for Grid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}x{}", self.size, self.size)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::aux::Direction;
	use rand::{rngs::StdRng, SeedableRng};

	fn rng() -> StdRng {
		StdRng::seed_from_u64(7)
	}

	#[test]
	fn cells_cover_board() {
		let grid = Grid::new(4);
		let cells: Vec<Cell> = grid.cells().collect();
		assert_eq!(cells.len(), 16);
		assert!(cells.iter().all(|c| grid.contains(*c)));
	}

	#[test]
	fn food_avoids_snake() -> crate::Result<()> {
		let grid = Grid::new(5);
		let snake = Snake::from_cells(grid.cells().take(20).collect()).unwrap();
		let mut rng = rng();
		for _ in 0..100 {
			let food = grid.generate_food(&snake, &mut rng)?;
			assert!(grid.contains(food));
			assert!(!snake.contains(&food));
		}
		Ok(())
	}

	#[test]
	fn food_takes_last_free_cell() -> crate::Result<()> {
		let grid = Grid::new(5);
		let last = Cell::new(3, 2);
		let snake = Snake::from_cells(grid.cells().filter(|c| *c != last).collect()).unwrap();
		let mut rng = rng();
		for _ in 0..20 {
			assert_eq!(grid.generate_food(&snake, &mut rng)?, last);
		}
		Ok(())
	}

	#[test]
	fn full_board_has_no_food() {
		let grid = Grid::new(3);
		let snake = Snake::from_cells(grid.cells().collect()).unwrap();
		let err = grid.generate_food(&snake, &mut rng()).unwrap_err();
		assert_eq!(err.downcast_ref::<GameError>(), Some(&GameError::BoardFull));
	}

	#[test]
	fn wall_collision() {
		let grid = Grid::new(25);
		let snake = Snake::new(Cell::new(0, 5)).moved(Direction::Left);
		assert_eq!(snake.head(), Cell::new(-1, 5));
		assert_eq!(grid.collision(&snake), Some(GameOver::WallCollision));

		for head in [(25, 0), (0, 25), (3, -1)] {
			assert!(grid.check_game_over(&Snake::new(head.into())));
		}
		for head in [(0, 0), (24, 24), (12, 0)] {
			assert!(!grid.check_game_over(&Snake::new(head.into())));
		}
	}

	#[test]
	fn self_collision() {
		let grid = Grid::new(25);
		let cells = [(3, 3), (3, 4), (4, 4), (4, 3), (3, 3)];
		let snake = Snake::from_cells(cells.iter().map(|&c| c.into()).collect()).unwrap();
		assert_eq!(grid.collision(&snake), Some(GameOver::SelfCollision));
	}

	#[test]
	fn game_over_check_is_idempotent() {
		let grid = Grid::new(25);
		let snake = Snake::new(Cell::new(-1, 5));
		let first = grid.check_game_over(&snake);
		for _ in 0..5 {
			assert_eq!(grid.check_game_over(&snake), first);
		}
	}
}
