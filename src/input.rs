//! Input side of the game.
//!
//! Tilt samples and button presses arrive on their own schedule, usually from
//! another task than the game loop. Both end up as a single [`Direction`]
//! stored in a [`DirectionCell`], which the loop reads once per tick.

use game::{
	aux::Direction,
	tilt::{self, Tilt},
	ControlMode, Settings,
};
use std::sync::{
	atomic::{AtomicBool, AtomicU8, Ordering},
	Arc,
};

/// Shared heading of the snake. Clones point to the same value.
///
/// The heading is a single byte, so a read never observes a half written
/// value.
#[derive(Debug, Clone)]
pub struct DirectionCell(Arc<AtomicU8>);

impl DirectionCell {
	/// Return a new [`DirectionCell`] holding `direction`.
	pub fn new(direction: Direction) -> Self {
		Self(Arc::new(AtomicU8::new(encode(direction))))
	}

	/// Return current heading.
	pub fn get(&self) -> Direction {
		decode(self.0.load(Ordering::Acquire))
	}

	/// Overwrite current heading.
	pub fn set(&self, direction: Direction) {
		self.0.store(encode(direction), Ordering::Release);
	}

	/// Replace the heading with `f(current)` in one atomic update and return
	/// the new heading. `f` may run more than once if another writer races.
	pub fn update<F>(&self, mut f: F) -> Direction
	where
		F: FnMut(Direction) -> Direction,
	{
		let mut next = self.get();
		let updated = self
			.0
			.fetch_update(Ordering::AcqRel, Ordering::Acquire, |byte| {
				next = f(decode(byte));
				Some(encode(next))
			});
		match updated {
			Ok(_) => next,
			// Only reachable if the closure above returned none.
			Err(byte) => decode(byte),
		}
	}
}

impl Default for DirectionCell {
	fn default() -> Self {
		Self::new(Direction::default())
	}
}

fn encode(direction: Direction) -> u8 {
	match direction {
		Direction::Up => 0,
		Direction::Down => 1,
		Direction::Left => 2,
		Direction::Right => 3,
	}
}

fn decode(byte: u8) -> Direction {
	Direction::ALL[(byte & 0b11) as usize]
}

/// Turns raw input into heading changes according to the control mode.
///
/// Tilt is ignored in [`ControlMode::Buttons`] and buttons are ignored in
/// [`ControlMode::Sensor`]. Once released, all input is ignored.
#[derive(Debug, Clone)]
pub struct Controller {
	mode: ControlMode,
	sensitivity: f32,
	min_sensor_angle: f32,
	heading: DirectionCell,
	active: Arc<AtomicBool>,
}

impl Controller {
	/// Return a new active [`Controller`] publishing into `heading`.
	pub fn new(settings: &Settings, heading: DirectionCell) -> Self {
		Self::attached(settings, heading, Arc::new(AtomicBool::new(true)))
	}

	/// Return a [`Controller`] that stays active while `active` is true.
	pub(crate) fn attached(
		settings: &Settings,
		heading: DirectionCell,
		active: Arc<AtomicBool>,
	) -> Self {
		Self {
			mode: settings.control_mode,
			sensitivity: settings.sensitivity,
			min_sensor_angle: settings.min_sensor_angle,
			heading,
			active,
		}
	}

	/// Return whether input still reaches a running game.
	pub fn is_active(&self) -> bool {
		self.active.load(Ordering::Acquire)
	}

	/// Stop accepting input. Affects every clone of this controller.
	pub fn release(&self) {
		self.active.store(false, Ordering::Release);
	}

	/// Feed a raw accelerometer reading. It's scaled by sensitivity and then
	/// classified. Return the heading after the update.
	pub fn on_accelerometer(&self, ax: f32, ay: f32) -> Direction {
		self.on_tilt(Tilt::from_accelerometer(ax, ay, self.sensitivity))
	}

	/// Feed an already scaled tilt vector. Return the heading after the
	/// update.
	pub fn on_tilt(&self, sample: Tilt) -> Direction {
		if !self.is_active() {
			log::trace!("Tilt {:?} ignored by released controller", sample);
			return self.heading.get();
		}
		if self.mode != ControlMode::Sensor {
			log::trace!("Tilt {:?} ignored in {} mode", sample, self.mode);
			return self.heading.get();
		}
		let min_sensor_angle = self.min_sensor_angle;
		self.heading
			.update(|heading| tilt::classify(sample, heading, min_sensor_angle))
	}

	/// Feed a button press. Return the heading after the update.
	pub fn on_button(&self, pressed: Direction) -> Direction {
		if !self.is_active() {
			log::trace!("Button {} ignored by released controller", pressed);
			return self.heading.get();
		}
		if self.mode != ControlMode::Buttons {
			log::trace!("Button {} ignored in {} mode", pressed, self.mode);
			return self.heading.get();
		}
		self.heading.update(|heading| {
			let next = tilt::steer(heading, pressed);
			if next != pressed {
				log::trace!("Button {} ignored while heading {}", pressed, heading);
			}
			next
		})
	}

	/// Return current heading.
	pub fn heading(&self) -> Direction {
		self.heading.get()
	}

	/// Return control mode.
	pub fn mode(&self) -> ControlMode {
		self.mode
	}
}
