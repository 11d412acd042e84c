//! Game loop module.
//!
//! The loop runs as a tokio task with two cadences taken from
//! [`Difficulty`](game::difficulty::Difficulty):
//!
//! - every *tick* it wakes up, reads the heading, lets the snake eat, checks
//!   for game over and publishes a [`Snapshot`];
//! - the snake itself only moves once the *move interval* has passed since its
//!   previous move.
//!
//! Only the loop task writes to the [`GameSession`]. Input reaches it through
//! a [`DirectionCell`] and the presentation layer watches snapshots through a
//! [`watch`] channel.

use crate::{
	input::{Controller, DirectionCell},
	Result,
};
use game::{
	aux::{Cell, Direction},
	GameOver, GameSession, Settings,
};
use serde::Serialize;
use std::{
	fmt,
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
	time::Duration,
};
use tokio::{
	sync::watch,
	task::JoinHandle,
	time::{self, Instant},
};

/// Decides when the snake is allowed to move.
#[derive(Debug, Clone)]
pub struct MoveClock {
	interval: Duration,
	last_move: Option<Instant>,
}

impl MoveClock {
	/// Return a new [`MoveClock`]. The first move is due right away.
	pub fn new(interval: Duration) -> Self {
		Self {
			interval,
			last_move: None,
		}
	}

	/// Return `true` if at least one move interval has passed since the last
	/// recorded move, or if there was no move yet.
	pub fn due(&self, now: Instant) -> bool {
		match self.last_move {
			Some(last) => now.saturating_duration_since(last) >= self.interval,
			None => true,
		}
	}

	/// Remember that the snake moved at `now`.
	pub fn record(&mut self, now: Instant) {
		self.last_move = Some(now);
	}
}

/// Loop state machine. `Over` is terminal until the session gets restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
	/// Snake is alive and the loop keeps ticking.
	Running,

	/// Game has ended, the loop has stopped.
	Over,
}

/// Immutable picture of a session after a tick, made for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
	/// Identifier of the session, bumped on every restart.
	pub session: u64,

	/// Loop ticks since the session started.
	pub tick: u64,

	/// Board side length.
	pub grid_size: usize,

	/// Snake cells, head first.
	pub snake: Vec<Cell>,

	/// Food cell. None only when the snake has filled the board.
	pub food: Option<Cell>,

	/// Heading used in the last tick.
	pub direction: Direction,

	/// Whether the loop is still running.
	pub state: LoopState,

	/// Why the game ended, if it did.
	pub outcome: Option<GameOver>,

	/// Food eaten so far.
	pub score: usize,
}

impl Snapshot {
	fn capture(session_id: u64, tick: u64, session: &GameSession) -> Self {
		Self {
			session: session_id,
			tick,
			grid_size: session.grid().size,
			snake: session.snake().cells().to_vec(),
			food: session.food(),
			direction: session.direction(),
			state: match session.is_over() {
				true => LoopState::Over,
				false => LoopState::Running,
			},
			outcome: session.outcome(),
			score: session.score(),
		}
	}

	/// Return `true` if the game has ended.
	pub fn is_over(&self) -> bool {
		self.state == LoopState::Over
	}

	/// Return snake's head.
	pub fn head(&self) -> Cell {
		self.snake[0]
	}

	/// Convert [`Snapshot`] to a json string.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}
}

impl fmt::Display for Snapshot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let size = self.grid_size as i32;
		for y in 0..size {
			for x in 0..size {
				let cell = Cell::new(x, y);
				let symbol = if cell == self.head() {
					'@'
				} else if self.snake.contains(&cell) {
					'o'
				} else if self.food == Some(cell) {
					'*'
				} else {
					'.'
				};
				write!(f, "{}", symbol)?;
			}
			writeln!(f)?;
		}
		match self.outcome {
			Some(reason) => write!(f, "game over: {}, score {}", reason, self.score),
			None => write!(f, "tick {}, heading {}, score {}", self.tick, self.direction, self.score),
		}
	}
}

/// Loop body without the waiting part.
struct Ticker {
	id: u64,
	session: GameSession,
	clock: MoveClock,
	tick: u64,
}

impl Ticker {
	fn new(id: u64, session: GameSession, move_interval: Duration) -> Self {
		Self {
			id,
			session,
			clock: MoveClock::new(move_interval),
			tick: 0,
		}
	}

	/// Run one tick at `now` with `heading` as the snake direction.
	fn tick(&mut self, now: Instant, heading: Direction) -> Snapshot {
		let due = self.clock.due(now);
		if due {
			self.clock.record(now);
		}
		self.session.advance(heading, due);
		self.tick += 1;
		self.snapshot()
	}

	fn snapshot(&self) -> Snapshot {
		Snapshot::capture(self.id, self.tick, &self.session)
	}
}

async fn run(
	mut ticker: Ticker,
	heading: DirectionCell,
	tick_interval: Duration,
	snapshots: Arc<watch::Sender<Snapshot>>,
) {
	loop {
		time::sleep(tick_interval).await;

		let snapshot = ticker.tick(Instant::now(), heading.get());
		let over = snapshot.is_over();
		snapshots.send_replace(snapshot);

		if over {
			log::info!(
				"Session {} is over after {} ticks with score {}",
				ticker.id,
				ticker.tick,
				ticker.session.score()
			);
			break;
		}
	}
}

/// Owner of a running game: the loop task, the shared heading and the
/// snapshot channel.
///
/// At most one loop task exists per [`GameLoop`]. [`restart`](Self::restart)
/// waits for the old task to be gone before spawning a new one.
#[derive(Debug)]
pub struct GameLoop {
	settings: Settings,
	heading: DirectionCell,
	/// Shared with every handed out [`Controller`], false once stopped.
	active: Arc<AtomicBool>,
	snapshots: Arc<watch::Sender<Snapshot>>,
	receiver: watch::Receiver<Snapshot>,
	task: Option<JoinHandle<()>>,
	session_id: u64,
}

impl GameLoop {
	/// Validate `settings`, create a session and spawn its loop.
	///
	/// # Panic
	/// Panics if called outside of a tokio runtime.
	pub fn start(settings: Settings) -> Result<Self> {
		settings.validate()?;

		let heading = DirectionCell::new(GameSession::START_DIRECTION);
		let session = GameSession::new(settings.grid(), settings.seed)?;
		let (sender, receiver) = watch::channel(Snapshot::capture(0, 0, &session));

		let mut game_loop = Self {
			settings,
			heading,
			active: Arc::new(AtomicBool::new(true)),
			snapshots: Arc::new(sender),
			receiver,
			task: None,
			session_id: 0,
		};
		game_loop.spawn(session);
		Ok(game_loop)
	}

	fn spawn(&mut self, session: GameSession) {
		let difficulty = self.settings.difficulty;
		let ticker = Ticker::new(self.session_id, session, difficulty.move_interval());

		self.heading.set(GameSession::START_DIRECTION);
		self.active.store(true, Ordering::Release);
		self.snapshots.send_replace(ticker.snapshot());

		log::info!(
			"Starting session {} on {} difficulty with {} controls",
			self.session_id,
			difficulty,
			self.settings.control_mode
		);

		self.task = Some(tokio::spawn(run(
			ticker,
			self.heading.clone(),
			difficulty.tick_interval(),
			self.snapshots.clone(),
		)));
	}

	/// Stop the current loop and start a fresh session: snake back on the
	/// start cell, heading reset, new food.
	pub async fn restart(&mut self) -> Result<()> {
		self.halt().await;
		self.session_id += 1;
		let session = GameSession::new(self.settings.grid(), self.settings.seed)?;
		log::info!("Restarting, new session is {}", self.session_id);
		self.spawn(session);
		Ok(())
	}

	/// Tear the loop down and release its controllers. The last snapshot
	/// stays available.
	pub async fn stop(&mut self) {
		self.active.store(false, Ordering::Release);
		self.halt().await;
		log::info!("Session {} stopped", self.session_id);
	}

	/// Abort the loop task and wait until it's really gone.
	async fn halt(&mut self) {
		if let Some(task) = self.task.take() {
			task.abort();
			match task.await {
				Ok(()) => (),
				Err(e) if e.is_cancelled() => (),
				Err(e) => log::error!("Loop of session {} failed: {}", self.session_id, e),
			}
		}
	}

	/// Wait until the current session is over and return its last snapshot.
	/// Return the latest snapshot right away if the loop is stopped.
	pub async fn wait_over(&self) -> Snapshot {
		let mut receiver = self.subscribe();
		if self.task.is_none() {
			return receiver.borrow().clone();
		}
		loop {
			{
				let snapshot = receiver.borrow();
				if snapshot.is_over() {
					return snapshot.clone();
				}
			}
			if receiver.changed().await.is_err() {
				return receiver.borrow().clone();
			}
		}
	}

	/// Return a [`Controller`] feeding this loop's heading.
	pub fn controller(&self) -> Controller {
		Controller::attached(&self.settings, self.heading.clone(), self.active.clone())
	}

	/// Subscribe to snapshots published after every tick.
	pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
		self.receiver.clone()
	}

	/// Return the latest snapshot.
	pub fn snapshot(&self) -> Snapshot {
		self.receiver.borrow().clone()
	}

	/// Return identifier of the current session.
	pub fn session_id(&self) -> u64 {
		self.session_id
	}

	/// Return settings the loop was started with.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}
}

impl Drop for GameLoop {
	fn drop(&mut self) {
		self.active.store(false, Ordering::Release);
		if let Some(task) = self.task.take() {
			task.abort();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use game::{difficulty::Difficulty, grid::Grid, snake::Snake, ControlMode};
	use rand::{rngs::StdRng, SeedableRng};

	fn ms(n: u64) -> Duration {
		Duration::from_millis(n)
	}

	fn settings(difficulty: Difficulty, control_mode: ControlMode) -> Settings {
		Settings {
			difficulty,
			control_mode,
			seed: Some(11),
			..Default::default()
		}
	}

	fn ticker(food: (i32, i32), move_interval: Duration) -> Ticker {
		let session = GameSession::from_parts(
			Grid::new(25),
			Snake::new(GameSession::START),
			food.into(),
			Direction::Right,
			StdRng::seed_from_u64(5),
		);
		Ticker::new(0, session, move_interval)
	}

	#[test]
	fn move_clock() {
		let start = Instant::now();
		let mut clock = MoveClock::new(ms(200));
		assert!(clock.due(start));

		clock.record(start);
		assert!(!clock.due(start + ms(100)));
		assert!(!clock.due(start + ms(199)));
		assert!(clock.due(start + ms(200)));
		assert!(clock.due(start + ms(450)));
	}

	#[test]
	fn ticks_and_moves_run_at_own_pace() {
		// Easy: a tick every 100ms, a move every 200ms.
		let start = Instant::now();
		let mut ticker = ticker((20, 20), Difficulty::Easy.move_interval());

		let heads: Vec<Cell> = (1..=6)
			.map(|i| ticker.tick(start + ms(100 * i), Direction::Right).head())
			.collect();

		let expected = [(6, 5), (6, 5), (7, 5), (7, 5), (8, 5), (8, 5)];
		assert_eq!(heads, expected.iter().map(|&c| c.into()).collect::<Vec<Cell>>());
		assert_eq!(ticker.tick, 6);
	}

	#[test]
	fn eating_scenario() {
		let start = Instant::now();
		let mut ticker = ticker((10, 5), ms(0));

		let mut snapshot = ticker.snapshot();
		for i in 1..=5 {
			snapshot = ticker.tick(start + ms(i), Direction::Right);
		}

		assert_eq!(snapshot.snake, vec![Cell::new(11, 5), Cell::new(10, 5)]);
		assert_eq!(snapshot.score, 1);
		let food = snapshot.food.unwrap();
		assert!(!snapshot.snake[1..].contains(&food));
		assert_eq!(snapshot.state, LoopState::Running);
	}

	#[test]
	fn wall_scenario() {
		let start = Instant::now();
		let mut ticker = ticker((20, 20), ms(0));

		let mut snapshot = ticker.snapshot();
		for i in 1..=6 {
			snapshot = ticker.tick(start + ms(i), Direction::Left);
		}

		assert_eq!(snapshot.head(), Cell::new(-1, 5));
		assert!(snapshot.is_over());
		assert_eq!(snapshot.outcome, Some(GameOver::WallCollision));
	}

	#[test]
	fn snapshot_rendering() {
		let snapshot = ticker((6, 5), ms(0)).snapshot();
		let text = snapshot.to_string();
		let rows: Vec<&str> = text.lines().collect();

		assert_eq!(rows.len(), 26);
		assert_eq!(&rows[5][5..7], "@*");
		assert!(snapshot.to_json().unwrap().contains("\"state\":\"running\""));
	}

	#[tokio::test(start_paused = true)]
	async fn loop_follows_cadence() -> Result<()> {
		let mut game_loop = GameLoop::start(settings(Difficulty::Easy, ControlMode::Buttons))?;
		assert_eq!(game_loop.snapshot().tick, 0);

		time::sleep(ms(350)).await;

		let snapshot = game_loop.snapshot();
		assert_eq!(snapshot.tick, 3);
		assert_eq!(snapshot.head().y, 5);
		assert!(snapshot.head().x > 5);

		game_loop.stop().await;
		Ok(())
	}

	#[tokio::test(start_paused = true)]
	async fn buttons_steer_the_loop() -> Result<()> {
		let mut game_loop = GameLoop::start(settings(Difficulty::Hard, ControlMode::Buttons))?;
		let controller = game_loop.controller();

		assert_eq!(controller.on_button(Direction::Down), Direction::Down);
		time::sleep(ms(40)).await;

		let snapshot = game_loop.snapshot();
		assert_eq!(snapshot.direction, Direction::Down);
		assert_eq!(snapshot.head().x, 5);
		assert!(snapshot.head().y > 5);

		game_loop.stop().await;
		Ok(())
	}

	#[tokio::test(start_paused = true)]
	async fn runs_until_game_over() -> Result<()> {
		let game_loop = GameLoop::start(settings(Difficulty::Hard, ControlMode::Sensor))?;

		let snapshot = time::timeout(Duration::from_secs(600), game_loop.wait_over()).await?;
		assert!(snapshot.is_over());
		assert!(matches!(
			snapshot.outcome,
			Some(GameOver::WallCollision) | Some(GameOver::SelfCollision)
		));

		let ticks = snapshot.tick;
		time::sleep(Duration::from_secs(1)).await;
		assert_eq!(game_loop.snapshot().tick, ticks);
		Ok(())
	}

	#[tokio::test(start_paused = true)]
	async fn restart_replaces_session() -> Result<()> {
		let mut game_loop = GameLoop::start(settings(Difficulty::Medium, ControlMode::Buttons))?;
		let controller = game_loop.controller();
		controller.on_button(Direction::Up);
		time::sleep(Duration::from_secs(1)).await;
		assert_ne!(game_loop.snapshot().head(), GameSession::START);

		game_loop.restart().await?;
		assert_eq!(game_loop.session_id(), 1);

		let snapshot = game_loop.snapshot();
		assert_eq!(snapshot.session, 1);
		assert_eq!(snapshot.tick, 0);
		assert_eq!(snapshot.snake, vec![GameSession::START]);
		assert_eq!(snapshot.direction, Direction::Right);
		assert!(!snapshot.is_over());
		assert_eq!(controller.heading(), Direction::Right);
		assert!(controller.is_active());

		let mut receiver = game_loop.subscribe();
		for _ in 0..10 {
			receiver.changed().await?;
			assert_eq!(receiver.borrow().session, 1);
		}

		game_loop.stop().await;
		Ok(())
	}

	#[tokio::test(start_paused = true)]
	async fn wait_over_returns_after_stop() -> Result<()> {
		let mut game_loop = GameLoop::start(settings(Difficulty::Easy, ControlMode::Buttons))?;
		let controller = game_loop.controller();
		time::sleep(ms(250)).await;
		game_loop.stop().await;

		let snapshot = time::timeout(Duration::from_secs(3600), game_loop.wait_over()).await?;
		assert!(!snapshot.is_over());
		assert_eq!(snapshot.tick, game_loop.snapshot().tick);

		assert!(!controller.is_active());
		assert_eq!(controller.on_button(Direction::Up), Direction::Right);
		Ok(())
	}

	#[tokio::test(start_paused = true)]
	async fn controllers_released_on_drop() -> Result<()> {
		let game_loop = GameLoop::start(settings(Difficulty::Easy, ControlMode::Sensor))?;
		let controller = game_loop.controller();
		assert!(controller.is_active());
		drop(game_loop);
		assert!(!controller.is_active());
		Ok(())
	}

	#[test]
	fn invalid_settings_rejected() {
		let settings = Settings {
			sensitivity: -1.0,
			..Default::default()
		};
		assert!(GameLoop::start(settings).is_err());

		let settings = Settings {
			grid_size: 4,
			..Default::default()
		};
		assert!(GameLoop::start(settings).is_err());
	}
}
