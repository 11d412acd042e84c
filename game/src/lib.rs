//! Snake simulation crate.
//!
//! Everything here is pure game logic: no clocks, no threads, no I/O. A driver
//! decides when a move is due and feeds the current heading into
//! [`GameSession::advance`].

pub mod aux;
pub mod difficulty;
pub mod error;
pub mod grid;
pub mod snake;
pub mod tilt;

/// This is an alias for standart [`Result`](std::result::Result) type which
/// represents failure.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Common reexports in one place.
pub mod prelude {
	pub use crate::{
		aux::*, difficulty::Difficulty, error::GameError, grid::Grid, snake::Snake,
		tilt::Tilt, ControlMode, GameOver, GameSession, Settings,
	};
}

use aux::{Cell, Direction};
use difficulty::Difficulty;
use error::{GameError, ParseControlModeError};
use grid::Grid;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use snake::Snake;
use std::{fmt, str::FromStr};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOver {
	/// Head left the board.
	WallCollision,

	/// Head ran into the body.
	SelfCollision,

	/// Snake filled the board and no food can be placed. This is a win.
	BoardFull,
}

impl fmt::Display for GameOver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::WallCollision => write!(f, "snake hit the wall"),
			Self::SelfCollision => write!(f, "snake bit itself"),
			Self::BoardFull => write!(f, "snake filled the whole board"),
		}
	}
}

/// State of a single playthrough: snake, food, heading and terminal flag.
#[derive(Debug, Clone)]
pub struct GameSession {
	grid: Grid,
	snake: Snake,

	/// Always some while the game goes on, none only after the board filled up.
	food: Option<Cell>,
	direction: Direction,
	over: Option<GameOver>,
	rng: StdRng,
}

impl GameSession {
	/// Cell the snake starts in.
	pub const START: Cell = Cell::new(5, 5);

	/// Heading the snake starts with.
	pub const START_DIRECTION: Direction = Direction::Right;

	/// Return a fresh session on `grid`: one-cell snake at [`Self::START`]
	/// heading [`Self::START_DIRECTION`] and randomly placed food. If `seed` is
	/// none, the random generator is seeded from system entropy.
	pub fn new(grid: Grid, seed: Option<u64>) -> Result<Self> {
		let mut rng = match seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};
		let snake = Snake::new(Self::START);
		let food = grid.generate_food(&snake, &mut rng)?;
		log::debug!("Food placed at {}", food);

		Ok(Self::from_parts(grid, snake, food, Self::START_DIRECTION, rng))
	}

	/// Return a session assembled from already known parts.
	pub fn from_parts(
		grid: Grid,
		snake: Snake,
		food: Cell,
		direction: Direction,
		rng: StdRng,
	) -> Self {
		Self {
			grid,
			snake,
			food: Some(food),
			direction,
			over: None,
			rng,
		}
	}

	/// Run one loop tick: take `direction` as the heading, move the snake if
	/// `move_due`, let it eat and check whether the game is over.
	///
	/// Return the game over reason if the session has ended. Once ended, the
	/// session doesn't change anymore.
	pub fn advance(&mut self, direction: Direction, move_due: bool) -> Option<GameOver> {
		if self.over.is_some() {
			return self.over;
		}
		self.direction = direction;
		if move_due {
			self.step();
		}
		self.eat();
		if self.over.is_none() {
			self.check_game_over();
		}
		self.over
	}

	/// Translate the snake one cell in the current direction.
	pub fn step(&mut self) {
		self.snake = self.snake.moved(self.direction);
	}

	/// If the head is on the food, place new food and grow the snake.
	///
	/// New food is chosen before growing, so it avoids the body as it was when
	/// the food got eaten. Return `true` if something was eaten.
	pub fn eat(&mut self) -> bool {
		if self.food != Some(self.snake.head()) {
			return false;
		}

		match self.grid.generate_food(&self.snake, &mut self.rng) {
			Ok(food) => {
				self.food = Some(food);
				self.snake = self.snake.grown(self.direction, self.grid.size);
				log::debug!(
					"Food eaten, snake length is {}, new food placed at {}",
					self.snake.len(),
					food
				);
			}
			Err(e) => {
				log::info!("Game over: {}", e);
				self.food = None;
				self.over = Some(GameOver::BoardFull);
			}
		}
		true
	}

	/// Check for wall and self collisions and end the game on one. Return
	/// `true` if the game is over.
	pub fn check_game_over(&mut self) -> bool {
		if self.over.is_none() {
			if let Some(reason) = self.grid.collision(&self.snake) {
				log::info!("Game over at {}: {}", self.snake.head(), reason);
				self.over = Some(reason);
			}
		}
		self.over.is_some()
	}

	/// Return the snake.
	pub fn snake(&self) -> &Snake {
		&self.snake
	}

	/// Return current food cell.
	pub fn food(&self) -> Option<Cell> {
		self.food
	}

	/// Return current heading.
	pub fn direction(&self) -> Direction {
		self.direction
	}

	/// Return game [`Grid`].
	pub fn grid(&self) -> Grid {
		self.grid
	}

	/// Return `true` if the game has ended.
	pub fn is_over(&self) -> bool {
		self.over.is_some()
	}

	/// Return why the game has ended.
	pub fn outcome(&self) -> Option<GameOver> {
		self.over
	}

	/// Amount of food eaten so far.
	pub fn score(&self) -> usize {
		self.snake.len() - 1
	}
}

/// Where direction commands come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
	/// Device tilt, run through the classifier.
	Sensor,

	/// Direction buttons.
	Buttons,
}

impl Default for ControlMode {
	fn default() -> Self {
		Self::Sensor
	}
}

impl fmt::Display for ControlMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let lower_case = format!("{:?}", self).to_lowercase();
		write!(f, "{}", lower_case)
	}
}

impl FromStr for ControlMode {
	type Err = ParseControlModeError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"sensor" => Ok(Self::Sensor),
			"buttons" => Ok(Self::Buttons),
			_ => Err(ParseControlModeError),
		}
	}
}

/// Game settings. They're owned by the surrounding application and read-only
/// for a running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Settings {
	/// Difficulty, which sets both loop cadences.
	pub difficulty: Difficulty,

	/// Whether tilt or buttons steer the snake.
	pub control_mode: ControlMode,

	/// Multiplier applied to raw accelerometer readings. Must be positive.
	pub sensitivity: f32,

	/// Half-side of the square tilt dead-zone. Must not be negative.
	pub min_sensor_angle: f32,

	/// Side length of the board.
	pub grid_size: usize,

	/// Seed for food placement. If it's none, every session uses a fresh
	/// random seed.
	pub seed: Option<u64>,
}

impl Settings {
	/// Default difficulty.
	pub const DIFFICULTY: Difficulty = Difficulty::Medium;

	/// Default control mode.
	pub const CONTROL_MODE: ControlMode = ControlMode::Sensor;

	/// Default sensitivity.
	pub const SENSITIVITY: f32 = 2.0;

	/// Default dead-zone half-side.
	pub const MIN_SENSOR_ANGLE: f32 = 0.0;

	/// Default board side length.
	pub const GRID_SIZE: usize = Grid::DEFAULT_SIZE;

	/// Largest accepted board side length. Cell coordinates are `i32`.
	pub const MAX_GRID_SIZE: usize = 1024;

	/// Smallest board side length that still has [`GameSession::START`] on it.
	pub const MIN_GRID_SIZE: usize = {
		let start = GameSession::START;
		let far = if start.x > start.y { start.x } else { start.y };
		far as usize + 1
	};

	/// Check settings before they reach a session.
	pub fn validate(&self) -> Result<()> {
		let invalid = |reason: String| -> Result<()> {
			Err(Box::new(GameError::InvalidConfig(reason)))
		};

		if !self.sensitivity.is_finite() || self.sensitivity <= 0.0 {
			return invalid(format!("sensitivity must be positive, got {}", self.sensitivity));
		}
		if !self.min_sensor_angle.is_finite() || self.min_sensor_angle < 0.0 {
			return invalid(format!(
				"minimum sensor angle must not be negative, got {}",
				self.min_sensor_angle
			));
		}
		if !(Self::MIN_GRID_SIZE..=Self::MAX_GRID_SIZE).contains(&self.grid_size) {
			return invalid(format!(
				"grid size must be between {} and {}, got {}",
				Self::MIN_GRID_SIZE,
				Self::MAX_GRID_SIZE,
				self.grid_size
			));
		}
		Ok(())
	}

	/// Parse settings out of a json string. Missing fields take default
	/// values.
	pub fn from_json<T: AsRef<str>>(string: T) -> Result<Self> {
		Ok(serde_json::from_str(string.as_ref())?)
	}

	/// Return the board these settings describe.
	pub fn grid(&self) -> Grid {
		Grid::new(self.grid_size)
	}
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			difficulty: Self::DIFFICULTY,
			control_mode: Self::CONTROL_MODE,
			sensitivity: Self::SENSITIVITY,
			min_sensor_angle: Self::MIN_SENSOR_ANGLE,
			grid_size: Self::GRID_SIZE,
			seed: None,
		}
	}
}
