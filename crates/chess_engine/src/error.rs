//! Error types for the rules engine
//!
//! Every failure here is a pure return value: an operation that fails leaves
//! the [`Game`](crate::Game) exactly as it was before the call.

use crate::moves::Move;
use crate::types::{Color, GameStatus};
use thiserror::Error;

/// Errors that can occur while validating or applying game transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// The move is not among the legal moves of the piece on its start square
    #[error("Invalid move: {mv}")]
    InvalidMove { mv: Move },

    /// The piece on the start square does not belong to the side to move
    #[error("It is not {color}'s turn")]
    WrongTurn { color: Color },

    /// The game has already finished
    #[error("Game is already over ({status})")]
    GameOver { status: GameStatus },

    /// A board must hold exactly one king per color
    #[error("Board has {count} {color} kings, expected exactly one")]
    KingCount { color: Color, count: usize },

    /// Text could not be read as an algebraic square such as `e4`
    #[error("Invalid square notation: {input:?}")]
    ParsePosition { input: String },

    /// Text could not be read as coordinate notation such as `e2e4` or `e7e8q`
    #[error("Invalid move notation: {input:?}")]
    ParseMove { input: String },
}

/// Result type alias for rules engine operations
pub type RulesResult<T> = Result<T, RulesError>;
