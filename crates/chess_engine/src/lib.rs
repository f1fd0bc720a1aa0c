//! # Chess Rules Engine
//!
//! Validates and applies the moves two players request and reports the
//! resulting game status. It does not evaluate positions or suggest moves.
//!
//! ## Module Organization
//!
//! - `types` - [`Color`], [`PieceType`], [`GameStatus`]
//! - `position` / `moves` - immutable [`Position`] and [`Move`] values
//! - `piece` - [`Piece`] with its per-instance history flags
//! - `move_gen` - pseudo-legal move generation per piece kind
//! - `board` - the 8x8 [`Board`] container
//! - `game` - legality filtering and the [`Game`] state machine
//!
//! ```rust
//! use chess_engine::{Color, Game, GameStatus, Move};
//!
//! let mut game = Game::new();
//! for text in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     let mv: Move = text.parse().unwrap();
//!     game.make_move(&mv).unwrap();
//! }
//! assert!(game.is_in_checkmate(Color::White));
//! assert_eq!(game.status(), GameStatus::BlackWon);
//! ```

pub mod board;
pub mod error;
pub mod game;
pub mod move_gen;
pub mod moves;
pub mod piece;
pub mod position;
pub mod types;


pub use board::Board;
pub use error::{RulesError, RulesResult};
pub use game::Game;
pub use move_gen::CastleSide;
pub use moves::Move;
pub use piece::Piece;
pub use position::Position;
pub use types::{Color, GameStatus, PieceType};
