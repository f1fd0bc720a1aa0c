//! Castling generation
//!
//! The king's ordinary one-square steps come from the shared stepping
//! generator. Castling is generated here as a plain two-square lateral king
//! move; the paired rook relocation is a side effect applied by
//! [`Board::apply_move`](crate::Board::apply_move) when the move executes.
//!
//! ## Castling Conditions checked here
//!
//! - The king has never moved
//! - The candidate rook exists, is the king's color, is a rook and has never moved
//! - Every square strictly between king and rook is empty
//!
//! Check-related conditions (not in check, not passing through or landing on
//! an attacked square) need simulation and are enforced by the game.

use crate::board::Board;
use crate::moves::Move;
use crate::piece::Piece;
use crate::position::Position;
use crate::types::PieceType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Toward column 1 (long castling)
    Queen,
    /// Toward column 8 (short castling)
    King,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::Queen, CastleSide::King];

    /// Column step the king takes toward the rook
    pub fn step(self) -> i8 {
        match self {
            CastleSide::Queen => -1,
            CastleSide::King => 1,
        }
    }

    /// Column offset from the king's square to the rook's home square
    pub fn rook_offset(self) -> i8 {
        match self {
            CastleSide::Queen => -4,
            CastleSide::King => 3,
        }
    }

    /// The side a king move castles toward, if it is a two-square lateral move
    pub fn of_king_move(mv: &Move) -> Option<CastleSide> {
        match mv.distance() {
            (0, 2) => Some(CastleSide::King),
            (0, -2) => Some(CastleSide::Queen),
            _ => None,
        }
    }
}

pub(super) fn push_castling_moves(board: &Board, king: &Piece, from: Position, moves: &mut Vec<Move>) {
    if king.has_moved() {
        return;
    }

    for side in CastleSide::BOTH {
        let rook_square = from.offset(0, side.rook_offset());
        let rook_ready = matches!(
            board.piece(rook_square),
            Some(rook) if rook.is(king.color(), PieceType::Rook) && !rook.has_moved()
        );
        if !rook_ready {
            continue;
        }

        let path_clear = (1..side.rook_offset().abs())
            .all(|step| board.piece(from.offset(0, step * side.step())).is_none());
        if path_clear {
            moves.push(Move::new(from, from.offset(0, 2 * side.step())));
        }
    }
}
