//! Headless sensor snake runner.
//!
//! Plays one game against a synthetic input source: a drifting accelerometer
//! in sensor mode or random presses in buttons mode. The board is printed when
//! the game ends or the time is up.

use logger::{debug, error, info, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sensor_snake::{
	app::App,
	game::{aux::Direction, error::GameError, ControlMode, Settings},
	game_loop::Snapshot,
	input::Controller,
	navigation::NavAction,
	Result,
};
use std::{fs, process, time::Duration};
use tokio::time;

/// Default maximum play time.
const DEFAULT_DURATION: Duration = Duration::from_secs(60);

/// How often the fake accelerometer reports.
const SENSOR_PERIOD: Duration = Duration::from_millis(20);

/// How often a fake button gets pressed.
const BUTTON_PERIOD: Duration = Duration::from_millis(400);

/// Standard gravity, the largest value an accelerometer axis reports at rest.
const GRAVITY: f32 = 9.81;

#[tokio::main]
async fn main() {
	let matches = init_cli();

	match matches.value_of("log_level") {
		Some(level) => logger::init_logger_with(level),
		None => logger::init_logger(),
	}

	let options = match init_options(&matches) {
		Ok(options) => options,
		Err(e) => {
			error!("Invalid arguments: {}", e);
			process::exit(2);
		}
	};

	if let Err(e) = play(options).await {
		error!("Error while playing: {}", e);
		process::exit(1);
	}
}

fn init_cli() -> clap::ArgMatches<'static> {
	use clap::{App, Arg};

	App::new("Sensor Snake")
		.about("Plays a game of snake steered by a simulated tilt sensor or buttons")
		.arg(
			Arg::with_name("config")
				.short("c")
				.long("config")
				.value_name("FILE")
				.takes_value(true)
				.help("Json file with settings. Other arguments override its values"),
		)
		.arg(
			Arg::with_name("difficulty")
				.short("d")
				.long("difficulty")
				.takes_value(true)
				.possible_values(&["easy", "medium", "hard"])
				.help(&format!("Game difficulty. Default is {}", Settings::DIFFICULTY)),
		)
		.arg(
			Arg::with_name("controls")
				.short("m")
				.long("controls")
				.takes_value(true)
				.possible_values(&["sensor", "buttons"])
				.help(&format!("Control mode. Default is {}", Settings::CONTROL_MODE)),
		)
		.arg(
			Arg::with_name("sensitivity")
				.short("s")
				.long("sensitivity")
				.value_name("FACTOR")
				.takes_value(true)
				.help(&format!(
					"Multiplier for accelerometer readings. Default is {}",
					Settings::SENSITIVITY
				)),
		)
		.arg(
			Arg::with_name("min_angle")
				.short("a")
				.long("min-angle")
				.value_name("ANGLE")
				.takes_value(true)
				.help(&format!(
					"Half-side of the tilt dead-zone. Default is {}",
					Settings::MIN_SENSOR_ANGLE
				)),
		)
		.arg(
			Arg::with_name("seed")
				.long("seed")
				.value_name("NUMBER")
				.takes_value(true)
				.help("Seed for food placement"),
		)
		.arg(
			Arg::with_name("duration")
				.short("t")
				.long("duration")
				.value_name("DURATION")
				.takes_value(true)
				.help(&format!(
					"Maximum play time. Default is {}",
					humantime::format_duration(DEFAULT_DURATION)
				)),
		)
		.arg(
			Arg::with_name("json")
				.long("json")
				.help("Also print the final snapshot as json"),
		)
		.arg(
			Arg::with_name("log_level")
				.short("l")
				.long("log-level")
				.value_name("LEVEL")
				.takes_value(true)
				.help("Log level, overrides LOG_LEVEL environment variable"),
		)
		.get_matches()
}

struct Options {
	settings: Settings,
	duration: Duration,
	json: bool,
}

fn init_options(matches: &clap::ArgMatches) -> Result<Options> {
	let mut settings = match matches.value_of("config") {
		Some(path) => Settings::from_json(fs::read_to_string(path)?)?,
		None => Settings::default(),
	};

	if let Some(val) = matches.value_of("difficulty") {
		settings.difficulty = val.parse()?;
	}
	if let Some(val) = matches.value_of("controls") {
		settings.control_mode = val.parse()?;
	}
	if let Some(val) = matches.value_of("sensitivity") {
		settings.sensitivity = val.parse()?;
	}
	if let Some(val) = matches.value_of("min_angle") {
		settings.min_sensor_angle = val.parse()?;
	}
	if let Some(val) = matches.value_of("seed") {
		settings.seed = Some(val.parse()?);
	}
	settings.validate()?;

	Ok(Options {
		settings,
		duration: match matches.value_of("duration") {
			Some(val) => val.parse::<humantime::Duration>()?.into(),
			None => DEFAULT_DURATION,
		},
		json: matches.is_present("json"),
	})
}

async fn play(options: Options) -> Result<()> {
	let mut app = App::new(options.settings);
	app.handle(NavAction::Play).await?;

	let (controller, mut snapshots) = match app.game() {
		Some(game) => (game.controller(), game.subscribe()),
		None => return Err(Box::new(GameError::SessionNotRunning)),
	};
	let input = tokio::spawn(feed_input(controller));

	let watch = async {
		loop {
			let snapshot: Snapshot = snapshots.borrow().clone();
			debug!(
				"Tick {}: head at {}, heading {}, score {}",
				snapshot.tick,
				snapshot.head(),
				snapshot.direction,
				snapshot.score
			);
			if snapshot.is_over() || snapshots.changed().await.is_err() {
				return snapshot;
			}
		}
	};
	let outcome = time::timeout(options.duration, watch).await;
	input.abort();

	let last = match outcome {
		Ok(snapshot) => snapshot,
		Err(_) => {
			info!("Time is up after {}", humantime::format_duration(options.duration));
			snapshots.borrow().clone()
		}
	};

	println!("{}", last);
	if options.json {
		println!("{}", last.to_json()?);
	}

	app.handle(NavAction::Back).await?;
	Ok(())
}

/// Keep feeding `controller` with fake input until aborted.
async fn feed_input(controller: Controller) {
	let mut rng = StdRng::from_entropy();

	match controller.mode() {
		ControlMode::Sensor => {
			let mut interval = time::interval(SENSOR_PERIOD);
			let (mut ax, mut ay) = (0.0f32, 0.0f32);
			loop {
				interval.tick().await;
				ax = (ax + rng.gen_range(-1.0..1.0)).clamp(-GRAVITY, GRAVITY);
				ay = (ay + rng.gen_range(-1.0..1.0)).clamp(-GRAVITY, GRAVITY);
				let heading = controller.on_accelerometer(ax, ay);
				trace!("Accelerometer ({:.2}, {:.2}) -> {}", ax, ay, heading);
			}
		}
		ControlMode::Buttons => {
			let mut interval = time::interval(BUTTON_PERIOD);
			loop {
				interval.tick().await;
				let pressed: Direction = rng.gen();
				let heading = controller.on_button(pressed);
				trace!("Button {} -> {}", pressed, heading);
			}
		}
	}
}
