//! # Game State Machine
//!
//! [`Game`] owns a [`Board`], the side to move and the derived [`GameStatus`].
//! It is mutated only through [`Game::make_move`] and [`Game::resign`]; both
//! either succeed completely or return an error with the game untouched.
//!
//! ## Legality
//!
//! A pseudo-legal move by color `C` is legal exactly when applying it, with all
//! of its side effects, to a clone of the board leaves `C`'s king unattacked.
//! There is no pin or double-check shortcut: every candidate is simulated.
//! Castling additionally requires that the king is not in check now and that
//! the square it passes over is safe, both tested with the same simulation.
//!
//! ## Status derivation
//!
//! After each move the side to move is examined:
//!
//! | legal moves | in check | status             |
//! |-------------|----------|--------------------|
//! | none        | yes      | opponent won       |
//! | none        | no       | `STALEMATE`        |
//! | some        | yes      | `*_IN_CHECK`       |
//! | some        | no       | `PENDING`          |

use crate::board::Board;
use crate::error::{RulesError, RulesResult};
use crate::move_gen::CastleSide;
use crate::moves::Move;
use crate::position::Position;
use crate::types::{Color, GameStatus, PieceType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    board: Board,
    turn: Color,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A fresh game: standard layout, white to move
    pub fn new() -> Self {
        Game {
            board: Board::standard(),
            turn: Color::White,
            status: GameStatus::Pending,
        }
    }

    /// Rebuild a game from a persisted board and side to move.
    ///
    /// The status is derived from the position. Boards without exactly one
    /// king per color are rejected.
    pub fn from_board(board: Board, turn: Color) -> RulesResult<Self> {
        for color in Color::ALL {
            let count = board.count(color, PieceType::King);
            if count != 1 {
                return Err(RulesError::KingCount { color, count });
            }
        }
        let mut game = Game {
            board,
            turn,
            status: GameStatus::Pending,
        };
        game.status = game.derive_status();
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Legal moves of the piece on `position`, or `None` if the square is empty
    pub fn valid_moves(&self, position: Position) -> Option<Vec<Move>> {
        let piece = self.board.piece(position)?;
        let color = piece.color();
        let moves = piece
            .piece_moves(&self.board, position)
            .into_iter()
            .filter(|mv| self.is_legal(mv, color))
            .collect();
        Some(moves)
    }

    /// Union of [`valid_moves`](Self::valid_moves) over every piece of `color`
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        self.board
            .team_positions(color)
            .into_iter()
            .filter_map(|position| self.valid_moves(position))
            .flatten()
            .collect()
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        king_attacked(&self.board, color)
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_move(color)
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_move(color)
    }

    /// Validate and apply `mv` for the side to move.
    ///
    /// # Errors
    ///
    /// - [`RulesError::GameOver`] if the game has already ended
    /// - [`RulesError::WrongTurn`] if the piece on the start square belongs
    ///   to the side not on move
    /// - [`RulesError::InvalidMove`] if the start square is empty or `mv` is
    ///   not among its legal moves
    pub fn make_move(&mut self, mv: &Move) -> RulesResult<()> {
        if self.status.is_terminal() {
            return Err(RulesError::GameOver {
                status: self.status,
            });
        }
        let piece = self
            .board
            .piece(mv.start())
            .ok_or(RulesError::InvalidMove { mv: *mv })?;
        if piece.color() != self.turn {
            return Err(RulesError::WrongTurn { color: piece.color() });
        }
        let legal = self
            .valid_moves(mv.start())
            .map_or(false, |moves| moves.contains(mv));
        if !legal {
            return Err(RulesError::InvalidMove { mv: *mv });
        }

        self.board.apply_move(mv);
        self.turn = self.turn.other();
        self.status = self.derive_status();
        Ok(())
    }

    /// Concede the game for `side`; the other side wins
    pub fn resign(&mut self, side: Color) -> RulesResult<()> {
        if self.status.is_terminal() {
            return Err(RulesError::GameOver {
                status: self.status,
            });
        }
        self.status = GameStatus::won_by(side.other());
        Ok(())
    }

    fn has_legal_move(&self, color: Color) -> bool {
        self.board.team_positions(color).into_iter().any(|position| {
            self.valid_moves(position)
                .map_or(false, |moves| !moves.is_empty())
        })
    }

    fn derive_status(&self) -> GameStatus {
        let color = self.turn;
        let in_check = self.is_in_check(color);
        match (self.has_legal_move(color), in_check) {
            (false, true) => GameStatus::won_by(color.other()),
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::in_check(color),
            (true, false) => GameStatus::Pending,
        }
    }

    /// The reference legality rule, plus the extra castling conditions
    fn is_legal(&self, mv: &Move, color: Color) -> bool {
        let is_king = matches!(
            self.board.piece(mv.start()),
            Some(piece) if piece.piece_type() == PieceType::King
        );
        if is_king {
            if let Some(side) = CastleSide::of_king_move(mv) {
                let transit = Move::new(mv.start(), mv.start().offset(0, side.step()));
                if self.is_in_check(color) || !self.leaves_king_safe(&transit, color) {
                    return false;
                }
            }
        }
        self.leaves_king_safe(mv, color)
    }

    fn leaves_king_safe(&self, mv: &Move, color: Color) -> bool {
        let mut trial = self.board.clone();
        trial.apply_move(mv);
        !king_attacked(&trial, color)
    }
}

/// Whether `color`'s king is attacked by the other side's pseudo-legal moves
fn king_attacked(board: &Board, color: Color) -> bool {
    board
        .king_position(color)
        .map_or(false, |king| board.is_attacked(king, color.other()))
}
