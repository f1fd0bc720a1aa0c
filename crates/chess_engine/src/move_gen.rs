//! Pseudo-legal move generation
//!
//! Generates every board-shape-correct move of a single piece. Nothing here
//! looks at check: filtering moves that expose the mover's king is the job of
//! [`Game`](crate::Game), which simulates each candidate on a copy of the board.
//!
//! ## Module Structure
//!
//! - `sliding` - queens, rooks and bishops walk each offset until blocked
//! - `pawn` - advances, double steps, captures, en passant and promotion
//! - `king` - castling; the king's ordinary steps share the stepping
//!   generator below with the knight

mod king;
mod pawn;
mod sliding;

pub use king::CastleSide;

use crate::board::Board;
use crate::moves::Move;
use crate::piece::Piece;
use crate::position::Position;
use crate::types::PieceType;

/// Append the pseudo-legal moves of `piece` standing on `from` to `moves`
pub(crate) fn push_piece_moves(board: &Board, piece: &Piece, from: Position, moves: &mut Vec<Move>) {
    match piece.piece_type() {
        PieceType::Pawn => pawn::push_pawn_moves(board, piece, from, moves),
        PieceType::King => {
            push_step_moves(board, piece, from, moves);
            king::push_castling_moves(board, piece, from, moves);
        }
        kind if kind.is_continuous() => sliding::push_sliding_moves(board, piece, from, moves),
        _ => push_step_moves(board, piece, from, moves),
    }
}

/// Apply each offset of the piece's template once (kings and knights).
///
/// A target is kept if it is on the board and either empty or held by the
/// other side.
fn push_step_moves(board: &Board, piece: &Piece, from: Position, moves: &mut Vec<Move>) {
    for &(d_row, d_col) in piece.piece_type().offsets() {
        let to = from.offset(d_row, d_col);
        if !to.on_board() {
            continue;
        }
        match board.piece(to) {
            Some(target) if target.color() == piece.color() => {}
            _ => moves.push(Move::new(from, to)),
        }
    }
}
