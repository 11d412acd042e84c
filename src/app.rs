//! Application shell: settings, navigation and the active game.

use crate::{
	game_loop::GameLoop,
	navigation::{NavAction, Screen},
	Result,
};
use game::{error::GameError, Settings};

/// Everything the presentation layer talks to.
///
/// Entering [`Screen::Game`] starts a [`GameLoop`], leaving it tears the loop
/// down. Settings can only be edited on [`Screen::Options`] and are checked
/// when leaving it.
#[derive(Debug, Default)]
pub struct App {
	screen: Screen,
	settings: Settings,
	game: Option<GameLoop>,
}

impl App {
	/// Return a new [`App`] showing the menu.
	pub fn new(settings: Settings) -> Self {
		Self {
			screen: Screen::Menu,
			settings,
			game: None,
		}
	}

	/// Apply a navigation action and return the new screen. On error the
	/// screen doesn't change.
	pub async fn handle(&mut self, action: NavAction) -> Result<Screen> {
		let next = self.screen.next(action)?;

		match (self.screen, next) {
			(Screen::Options, Screen::Menu) => self.settings.validate()?,
			(_, Screen::Game) => self.game = Some(GameLoop::start(self.settings.clone())?),
			(Screen::Game, _) => {
				if let Some(mut game) = self.game.take() {
					game.stop().await;
				}
			}
			_ => (),
		}

		log::debug!("Screen {} -> {}", self.screen, next);
		self.screen = next;
		Ok(next)
	}

	/// Restart the running game.
	pub async fn restart(&mut self) -> Result<()> {
		match self.game.as_mut() {
			Some(game) => game.restart().await,
			None => Err(Box::new(GameError::SessionNotRunning)),
		}
	}

	/// Return mutable settings. Only possible on the options screen.
	pub fn settings_mut(&mut self) -> Result<&mut Settings> {
		match self.screen {
			Screen::Options => Ok(&mut self.settings),
			screen => Err(Box::new(GameError::InvalidTransition {
				from: screen.to_string(),
				action: "edit settings".to_string(),
			})),
		}
	}

	/// Return current settings.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Return current screen.
	pub fn screen(&self) -> Screen {
		self.screen
	}

	/// Return the running game, if any.
	pub fn game(&self) -> Option<&GameLoop> {
		self.game.as_ref()
	}
}
