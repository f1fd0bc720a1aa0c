//! Chess pieces
//!
//! A [`Piece`] is a small `Copy` value: its color and kind plus the two bits of
//! history the rules need. Because the board stores pieces by value, cloning
//! a board for a legality trial copies those flags too, and nothing done to
//! the copy can leak back into the real game.
//!
//! - `has_moved` travels with the piece, not the square. A king or rook that
//!   leaves its home square and comes back still cannot castle.
//! - `en_passant` is the column offset (`-1` or `+1`) of an enemy pawn that
//!   just double-stepped alongside this pawn, or `0`. It lives for exactly one
//!   ply and is cleared at the start of the next move.

use crate::board::Board;
use crate::move_gen;
use crate::moves::Move;
use crate::position::Position;
use crate::types::{Color, PieceType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    color: Color,
    piece_type: PieceType,
    #[serde(default)]
    has_moved: bool,
    #[serde(default)]
    en_passant: i8,
}

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        Piece {
            color,
            piece_type,
            has_moved: false,
            en_passant: 0,
        }
    }

    /// A piece that has already moved, e.g. one produced by promotion
    pub const fn moved(color: Color, piece_type: PieceType) -> Self {
        Piece {
            color,
            piece_type,
            has_moved: true,
            en_passant: 0,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn piece_type(&self) -> PieceType {
        self.piece_type
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn en_passant(&self) -> i8 {
        self.en_passant
    }

    pub fn is(&self, color: Color, piece_type: PieceType) -> bool {
        self.color == color && self.piece_type == piece_type
    }

    pub(crate) fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    pub(crate) fn set_en_passant(&mut self, column_offset: i8) {
        debug_assert!(column_offset.abs() <= 1, "en passant offset {column_offset}");
        self.en_passant = column_offset;
    }

    /// Pseudo-legal moves of this piece standing on `from`.
    ///
    /// Board-shape-correct only: moves that leave the mover's own king in
    /// check are still included. See [`Game::valid_moves`](crate::Game::valid_moves)
    /// for the filtered set.
    pub fn piece_moves(&self, board: &Board, from: Position) -> Vec<Move> {
        let mut moves = Vec::new();
        move_gen::push_piece_moves(board, self, from, &mut moves);
        moves
    }
}

/// Upper-case for white, lower-case for black
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.piece_type.letter();
        match self.color {
            Color::White => write!(f, "{}", letter.to_ascii_uppercase()),
            Color::Black => write!(f, "{}", letter),
        }
    }
}
