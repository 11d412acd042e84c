//! Sensor snake library.
//!
//! Drives the [`game`] simulation in real time: [`game_loop`] owns the clock
//! and the loop task, [`input`] turns tilt samples and button presses into a
//! heading, [`navigation`] and [`app`] glue it to a presentation layer.

#![warn(missing_docs)]

pub mod app;
pub mod game_loop;
pub mod input;
pub mod navigation;

pub use game;

/// This is an alias for standart [`Result`](std::result::Result) type which
/// represents failure.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
