//! Pawn move generation
//!
//! ## Pawn Movement Rules
//!
//! - **Forward push**: one square toward the opponent, only onto an empty square
//! - **Double push**: from the start row (row 2 for white, row 7 for black),
//!   two squares if both squares ahead are empty
//! - **Captures**: one square diagonally forward, only onto an enemy piece
//! - **En passant**: only while the pawn's `en_passant` flag is set, onto the
//!   square behind the enemy pawn that just double-stepped
//! - **Promotion**: a move landing on the promotion row becomes four moves,
//!   one per promotion choice, instead of one plain move

use crate::board::Board;
use crate::moves::Move;
use crate::piece::Piece;
use crate::position::Position;
use crate::types::{Color, PieceType};

pub(super) fn push_pawn_moves(board: &Board, pawn: &Piece, from: Position, moves: &mut Vec<Move>) {
    let color = pawn.color();
    let direction = color.pawn_direction();

    for side in [1, -1] {
        let to = from.offset(direction, side);
        if let Some(target) = board.piece(to) {
            if target.color() != color {
                push_promoting(color, from, to, moves);
            }
        }
    }

    if pawn.en_passant() != 0 {
        let to = from.offset(direction, pawn.en_passant());
        if to.on_board() && board.piece(to).is_none() {
            moves.push(Move::new(from, to));
        }
    }

    let single = from.offset(direction, 0);
    if single.on_board() && board.piece(single).is_none() {
        push_promoting(color, from, single, moves);

        if from.row() == color.pawn_start_row() {
            let double = from.offset(2 * direction, 0);
            if board.piece(double).is_none() {
                moves.push(Move::new(from, double));
            }
        }
    }
}

fn push_promoting(color: Color, from: Position, to: Position, moves: &mut Vec<Move>) {
    if to.row() == color.pawn_promo_row() {
        moves.extend(
            PieceType::PROMOTION_CHOICES
                .iter()
                .map(|&kind| Move::with_promotion(from, to, kind)),
        );
    } else {
        moves.push(Move::new(from, to));
    }
}
