//! Screen navigation, kept apart from the game's own running/over states.

use crate::Result;
use game::error::GameError;
use std::fmt;

/// Screen the application shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
	/// Main menu.
	Menu,

	/// Settings editor.
	Options,

	/// Running game.
	Game,
}

/// User action that moves between screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
	/// Start a game from the menu.
	Play,

	/// Open settings from the menu.
	OpenOptions,

	/// Return to the menu.
	Back,
}

impl Screen {
	/// Return the screen `action` leads to from this one.
	pub fn next(self, action: NavAction) -> Result<Screen> {
		match (self, action) {
			(Self::Menu, NavAction::Play) => Ok(Self::Game),
			(Self::Menu, NavAction::OpenOptions) => Ok(Self::Options),
			(Self::Options, NavAction::Back) | (Self::Game, NavAction::Back) => Ok(Self::Menu),
			(from, action) => Err(Box::new(GameError::InvalidTransition {
				from: from.to_string(),
				action: action.to_string(),
			})),
		}
	}
}

impl Default for Screen {
	fn default() -> Self {
		Self::Menu
	}
}

impl fmt::Display for Screen {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Menu => write!(f, "menu"),
			Self::Options => write!(f, "options"),
			Self::Game => write!(f, "game"),
		}
	}
}

impl fmt::Display for NavAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Play => write!(f, "play"),
			Self::OpenOptions => write!(f, "open options"),
			Self::Back => write!(f, "go back"),
		}
	}
}
