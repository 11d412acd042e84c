//! Helper crate for fast log initializing.
//!
//! This crate reexports all macros from [`log`] crate and uses [`env_logger`]
//! crate for logger initializing.
//!
//! Example:
//! ```rust
//! use logger::*;
//!
//! init_logger();
//!
//! info!("Logger initialized successfully!");
//! ```

pub use log::{debug, error, info, trace, warn};

/// Default log level for debug compilations.
const DEBUG_LOG_LEVEL: &str = "debug";

/// Default log level for release compilations.
const RELEASE_LOG_LEVEL: &str = "info";

/// Environment variable for log level setting.
const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Environment variable for log style setting.
const LOG_STYLE_ENV: &str = "LOG_STYLE";

/// Default log style.
const LOG_STYLE: &str = "auto";

use env_logger::fmt::Formatter;
use log::Record;
use std::io;

/// Logger initializer. Run this function in binary crate to initialize logging.
/// Level comes from the `LOG_LEVEL` environment variable and falls back to a
/// build-dependent default. Calling it more than once does nothing.
pub fn init_logger() {
	let log_level = match cfg!(debug_assertions) {
		true => DEBUG_LOG_LEVEL,
		false => RELEASE_LOG_LEVEL,
	};
	init(log_level, false);
}

/// Like [`init_logger`], but `level` wins over the `LOG_LEVEL` environment
/// variable.
pub fn init_logger_with(level: &str) {
	init(level, true);
}

fn init(level: &str, forced: bool) {
	let env = env_logger::Env::default()
		.filter_or(LOG_LEVEL_ENV, level)
		.write_style_or(LOG_STYLE_ENV, LOG_STYLE);

	let mut builder = env_logger::Builder::from_env(env);
	if forced {
		builder.parse_filters(level);
	}

	if builder.format(format).try_init().is_err() {
		log::debug!("Logger is already initialized");
	}
}

/// Logging output format: coloured level, module and message.
fn format(buf: &'_ mut Formatter, record: &'_ Record<'_>) -> io::Result<()> {
	use env_logger::fmt::Color;
	use log::Level;
	use std::io::Write;

	let mut level_style = buf.style();
	match record.level() {
		Level::Error => level_style.set_color(Color::Red).set_bold(true),
		Level::Warn => level_style.set_color(Color::Yellow),
		Level::Info => level_style.set_color(Color::Cyan),
		Level::Debug => level_style.set_color(Color::Magenta),
		Level::Trace => level_style.set_color(Color::Blue),
	};

	let mut target_style = buf.style();
	target_style.set_dimmed(true);

	writeln!(
		buf,
		"{}\t{}\t{}",
		level_style.value(record.level()),
		target_style.value(record.target()),
		record.args()
	)
}
