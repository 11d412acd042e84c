//! Errors returned by functions related to this crate.

use std::{error, fmt};

/// Error type returned by crate's functions.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// Snake occupies every cell of the board, so there's nowhere to put food.
    BoardFull,

    /// Settings rejected at the configuration boundary. Variant argument
    /// describes the offending value.
    InvalidConfig(String),

    /// Navigation action specified in `action` can't be applied on the `from`
    /// screen.
    InvalidTransition {
        /// Screen the action was applied on.
        from: String,

        /// Rejected action.
        action: String,
    },

    /// Operation requires a running game session but there's none.
    SessionNotRunning,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BoardFull => write!(f, "snake occupies the whole board, no cell left for food"),
            Self::InvalidConfig(reason) => write!(f, "invalid settings: {}", reason),
            Self::InvalidTransition { from, action } => {
                write!(f, "can't {} from the {} screen", action, from)
            }
            Self::SessionNotRunning => write!(f, "there's no running game session"),
        }
    }
}

impl error::Error for GameError {}

/// Error returned if can't parse [`Direction`](crate::aux::Direction) from a
/// string.
#[derive(Debug, Clone)]
pub struct ParseDirectionError;

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
"can't parse Direction because parsed string is not \"up\", \"down\", \"left\" or \"right\"")
    }
}

impl error::Error for ParseDirectionError {}

/// Error returned if can't parse [`Difficulty`](crate::difficulty::Difficulty)
/// from a string.
#[derive(Debug, Clone)]
pub struct ParseDifficultyError;

impl fmt::Display for ParseDifficultyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
"can't parse Difficulty because parsed string is not \"easy\", \"medium\" or \"hard\"")
    }
}

impl error::Error for ParseDifficultyError {}

/// Error returned if can't parse [`ControlMode`](crate::ControlMode) from a
/// string.
#[derive(Debug, Clone)]
pub struct ParseControlModeError;

impl fmt::Display for ParseControlModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
"can't parse ControlMode because parsed string is not \"sensor\" or \"buttons\"")
    }
}

impl error::Error for ParseControlModeError {}
