//! Tilt to direction classification.
//!
//! Lines `y = x` and `y = -x` split the tilt plane into four sectors, one per
//! direction. A square dead-zone of half-side `min_sensor_angle` around the
//! origin keeps jitter from steering the snake.

use crate::aux::Direction;
use serde::{Deserialize, Serialize};

/// Horizontal and vertical tilt, already scaled by sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tilt {
	/// Horizontal tilt, positive to the right.
	pub x: f32,

	/// Vertical tilt, positive upwards.
	pub y: f32,
}

impl Tilt {
	/// Return a new [`Tilt`].
	pub fn new(x: f32, y: f32) -> Self {
		Self { x, y }
	}

	/// Build a tilt out of raw accelerometer axes. Both axes are inverted so
	/// that tilting the device towards a side points the vector to that side.
	pub fn from_accelerometer(ax: f32, ay: f32, sensitivity: f32) -> Self {
		Self::new(-ax * sensitivity, -ay * sensitivity)
	}
}

impl From<(f32, f32)> for Tilt {
	fn from(t: (f32, f32)) -> Self {
		Self::new(t.0, t.1)
	}
}

/// Turn `tilt` into a heading.
///
/// Rules are checked in order and the first match wins; without a match the
/// current `heading` is kept. A rule never selects the reverse of `heading`.
pub fn classify(tilt: Tilt, heading: Direction, min_sensor_angle: f32) -> Direction {
	let Tilt { x, y } = tilt;

	if heading != Direction::Left && x > min_sensor_angle && y < x && y > -x {
		Direction::Right
	} else if heading != Direction::Right && x < min_sensor_angle && y > x && y < -x {
		Direction::Left
	} else if heading != Direction::Up && y < min_sensor_angle && y < x && y < -x {
		Direction::Down
	} else if heading != Direction::Down && y > min_sensor_angle && y > x && y > -x {
		Direction::Up
	} else {
		heading
	}
}

/// Apply a button press. A press asking for the reverse of `heading` is
/// ignored.
pub fn steer(heading: Direction, pressed: Direction) -> Direction {
	match pressed == heading.opposite() {
		true => heading,
		false => pressed,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sectors() {
		use Direction::*;

		assert_eq!(classify((10.0, 0.0).into(), Right, 5.0), Right);
		assert_eq!(classify((0.0, 10.0).into(), Right, 5.0), Up);
		assert_eq!(classify((0.0, -10.0).into(), Right, 5.0), Down);
		assert_eq!(classify((-10.0, 0.0).into(), Up, 5.0), Left);
		assert_eq!(classify((-10.0, 0.0).into(), Down, 5.0), Left);
	}

	#[test]
	fn reverse_is_never_selected() {
		use Direction::*;

		assert_eq!(classify((-10.0, 0.0).into(), Right, 5.0), Right);
		assert_eq!(classify((10.0, 0.0).into(), Left, 5.0), Left);
		assert_eq!(classify((0.0, 10.0).into(), Down, 5.0), Down);
		assert_eq!(classify((0.0, -10.0).into(), Up, 5.0), Up);
	}

	#[test]
	fn dead_zone_keeps_heading() {
		for heading in Direction::ALL {
			assert_eq!(classify((1.0, 1.0).into(), heading, 5.0), heading);
			assert_eq!(classify((0.0, 0.0).into(), heading, 0.0), heading);
		}
	}

	#[test]
	fn diagonal_is_ambiguous() {
		// Exactly on y = x nothing matches strictly.
		assert_eq!(classify((8.0, 8.0).into(), Direction::Left, 5.0), Direction::Left);
	}

	#[test]
	fn accelerometer_axes_are_inverted() {
		let tilt = Tilt::from_accelerometer(1.5, -2.0, 2.0);
		assert_eq!(tilt, Tilt::new(-3.0, 4.0));
	}

	#[test]
	fn buttons() {
		use Direction::*;

		assert_eq!(steer(Right, Up), Up);
		assert_eq!(steer(Right, Left), Right);
		assert_eq!(steer(Up, Down), Up);
		assert_eq!(steer(Down, Down), Down);
	}
}
