//! Board representation
//!
//! An 8x8 grid of optional [`Piece`] values indexed by [`Position`]. Pieces are
//! stored by value, so `Board::clone` yields a fully independent snapshot that
//! legality trials can mutate freely.
//!
//! Lookups and placements on off-board positions are no-ops that return
//! `None`, which lets move generators step past the edge without checks.

use crate::move_gen::CastleSide;
use crate::moves::Move;
use crate::piece::Piece;
use crate::position::Position;
use crate::types::{Color, PieceType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// An empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard starting layout
    pub fn standard() -> Self {
        let mut board = Board::new();
        for (col, &kind) in (1..=8).zip(PieceType::STARTING_ROW.iter()) {
            for color in Color::ALL {
                board.add_piece(Position::new(color.home_row(), col), Piece::new(color, kind));
                board.add_piece(
                    Position::new(color.pawn_start_row(), col),
                    Piece::new(color, PieceType::Pawn),
                );
            }
        }
        board
    }

    /// Place `piece` on `position`, returning whatever stood there before
    pub fn add_piece(&mut self, position: Position, piece: Piece) -> Option<Piece> {
        if !position.on_board() {
            return None;
        }
        let (row, col) = position.index();
        self.squares[row][col].replace(piece)
    }

    pub fn remove_piece(&mut self, position: Position) -> Option<Piece> {
        if !position.on_board() {
            return None;
        }
        let (row, col) = position.index();
        self.squares[row][col].take()
    }

    pub fn piece(&self, position: Position) -> Option<&Piece> {
        if !position.on_board() {
            return None;
        }
        let (row, col) = position.index();
        self.squares[row][col].as_ref()
    }

    pub(crate) fn piece_mut(&mut self, position: Position) -> Option<&mut Piece> {
        if !position.on_board() {
            return None;
        }
        let (row, col) = position.index();
        self.squares[row][col].as_mut()
    }

    /// Every occupied square, row 1 first
    pub fn pieces(&self) -> impl Iterator<Item = (Position, &Piece)> + '_ {
        self.squares.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| {
                cell.as_ref()
                    .map(|piece| (Position::new(row as i8 + 1, col as i8 + 1), piece))
            })
        })
    }

    pub fn team_positions(&self, color: Color) -> Vec<Position> {
        self.pieces()
            .filter(|(_, piece)| piece.color() == color)
            .map(|(position, _)| position)
            .collect()
    }

    /// Pseudo-legal moves of every piece of `color`
    pub fn team_moves(&self, color: Color) -> Vec<Move> {
        self.pieces()
            .filter(|(_, piece)| piece.color() == color)
            .flat_map(|(position, piece)| piece.piece_moves(self, position))
            .collect()
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, piece)| piece.is(color, PieceType::King))
            .map(|(position, _)| position)
    }

    pub fn count(&self, color: Color, piece_type: PieceType) -> usize {
        self.pieces()
            .filter(|(_, piece)| piece.is(color, piece_type))
            .count()
    }

    /// Whether any pseudo-legal move of `by` ends on `position`
    pub fn is_attacked(&self, position: Position, by: Color) -> bool {
        self.team_moves(by).iter().any(|mv| mv.end() == position)
    }

    pub(crate) fn clear_en_passant(&mut self) {
        for piece in self.squares.iter_mut().flatten().flatten() {
            piece.set_en_passant(0);
        }
    }

    /// Apply `mv` with all of its side effects, without any legality check.
    ///
    /// In order: previous en passant flags are cleared; a pawn double step
    /// flags the enemy pawns beside its landing square; an en passant capture
    /// removes the pawn it passes; a castle relocates the paired rook and marks
    /// it moved; the piece lands (replaced by the promotion choice, if any) and
    /// is marked moved.
    pub fn apply_move(&mut self, mv: &Move) {
        self.clear_en_passant();

        let mut piece = match self.remove_piece(mv.start()) {
            Some(piece) => piece,
            None => return,
        };

        match piece.piece_type() {
            PieceType::Pawn => {
                let (d_row, d_col) = mv.distance();
                if d_col != 0 && self.piece(mv.end()).is_none() {
                    self.remove_piece(Position::new(mv.start().row(), mv.end().col()));
                }
                if d_row.abs() == 2 {
                    self.flag_en_passant(mv.end(), piece.color().other());
                }
            }
            PieceType::King => {
                if let Some(side) = CastleSide::of_king_move(mv) {
                    let rook_home = mv.start().offset(0, side.rook_offset());
                    if let Some(mut rook) = self.remove_piece(rook_home) {
                        rook.mark_moved();
                        self.add_piece(mv.start().offset(0, side.step()), rook);
                    }
                }
            }
            _ => {}
        }

        if let Some(kind) = mv.promotion() {
            piece = Piece::moved(piece.color(), kind);
        }
        piece.mark_moved();
        self.add_piece(mv.end(), piece);
    }

    /// Give each `capturer` pawn beside `landing` a one-ply en passant option
    fn flag_en_passant(&mut self, landing: Position, capturer: Color) {
        for side in [-1, 1] {
            if let Some(pawn) = self.piece_mut(landing.offset(0, side)) {
                if pawn.is(capturer, PieceType::Pawn) {
                    pawn.set_en_passant(-side);
                }
            }
        }
    }
}

/// Row 8 at the top, `.` for empty squares
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            for cell in &self.squares[row] {
                match cell {
                    Some(piece) => write!(f, "{piece}")?,
                    None => write!(f, ".")?,
                }
            }
            if row != 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_layout_renders() {
        let expected = "rnbqkbnr\n\
                        pppppppp\n\
                        ........\n\
                        ........\n\
                        ........\n\
                        ........\n\
                        PPPPPPPP\n\
                        RNBQKBNR";
        assert_eq!(Board::standard().to_string(), expected);
    }

    #[test]
    fn off_board_access_is_ignored() {
        let mut board = Board::new();
        let outside = Position::new(0, 4);
        assert_eq!(board.add_piece(outside, Piece::new(Color::White, PieceType::Rook)), None);
        assert!(board.piece(outside).is_none());
        assert_eq!(board.pieces().count(), 0);
    }

    #[test]
    fn king_lookup() {
        let board = Board::standard();
        assert_eq!(board.king_position(Color::White), Some(Position::new(1, 5)));
        assert_eq!(board.king_position(Color::Black), Some(Position::new(8, 5)));
        assert_eq!(board.team_positions(Color::Black).len(), 16);
    }
}
