//! Sliding piece move generation
//!
//! Queens, rooks and bishops repeat each offset of their template:
//! - Empty squares: valid moves, keep walking
//! - Opponent pieces: valid captures, then stop in this direction
//! - Own pieces or the board edge: stop in this direction

use crate::board::Board;
use crate::moves::Move;
use crate::piece::Piece;
use crate::position::Position;

pub(super) fn push_sliding_moves(board: &Board, piece: &Piece, from: Position, moves: &mut Vec<Move>) {
    for &(d_row, d_col) in piece.piece_type().offsets() {
        let mut to = from.offset(d_row, d_col);
        while to.on_board() {
            match board.piece(to) {
                None => moves.push(Move::new(from, to)),
                Some(blocker) => {
                    if blocker.color() != piece.color() {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }
            to = to.offset(d_row, d_col);
        }
    }
}
