//! # Core Rule Types
//!
//! Small `Copy` enums shared by every other module: the two sides, the six
//! piece kinds and the status of a game.
//!
//! ## Offset templates
//!
//! Each [`PieceType`] carries a fixed template of `(row, col)` step offsets and
//! a flag saying whether the piece slides (`QUEEN`, `ROOK`, `BISHOP` repeat
//! their offsets until blocked) or steps once (`KING`, `KNIGHT`). Pawns have an
//! empty template: their movement depends on color and is generated
//! separately in `move_gen::pawn`.
//!
//! ## Status
//!
//! [`GameStatus`] is the whole state machine of a game. `PENDING` and the two
//! `*_IN_CHECK` values are the only non-terminal states; once a game reaches
//! `WHITE_WON`, `BLACK_WON` or `STALEMATE` no further moves or resignations are
//! accepted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two sides of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// The opposing side
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn advance (+1 for white, -1 for black)
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row a pawn of this color starts on; double steps are only allowed from here
    pub fn pawn_start_row(self) -> i8 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    /// Row on which a pawn of this color promotes
    pub fn pawn_promo_row(self) -> i8 {
        match self {
            Color::White => 8,
            Color::Black => 1,
        }
    }

    /// Back rank of this color
    pub fn home_row(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 8,
        }
    }

    pub fn abbreviation(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "WHITE"),
            Color::Black => write!(f, "BLACK"),
        }
    }
}

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-2, 1),
    (-1, 2),
    (-2, -1),
    (-1, -2),
    (2, -1),
    (1, -2),
];
const BISHOP_OFFSETS: [(i8, i8); 4] = [(1, 1), (-1, 1), (-1, -1), (1, -1)];
const ROOK_OFFSETS: [(i8, i8); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// The six kinds of chess piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceType {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceType {
    /// Pieces a pawn may promote to, in the order promotion moves are generated
    pub const PROMOTION_CHOICES: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// Back-rank layout from column 1 to column 8
    pub const STARTING_ROW: [PieceType; 8] = [
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Rook,
    ];

    /// Step template used by the generic stepping/sliding generator
    pub fn offsets(self) -> &'static [(i8, i8)] {
        match self {
            PieceType::King | PieceType::Queen => &KING_OFFSETS,
            PieceType::Knight => &KNIGHT_OFFSETS,
            PieceType::Bishop => &BISHOP_OFFSETS,
            PieceType::Rook => &ROOK_OFFSETS,
            PieceType::Pawn => &[],
        }
    }

    /// Whether the piece repeats its offsets until blocked
    pub fn is_continuous(self) -> bool {
        matches!(self, PieceType::Queen | PieceType::Rook | PieceType::Bishop)
    }

    pub fn is_promotion_choice(self) -> bool {
        Self::PROMOTION_CHOICES.contains(&self)
    }

    /// Lower-case letter used in board rendering and move notation
    pub fn letter(self) -> char {
        match self {
            PieceType::King => 'k',
            PieceType::Queen => 'q',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Rook => 'r',
            PieceType::Pawn => 'p',
        }
    }

    pub fn from_letter(letter: char) -> Option<PieceType> {
        match letter.to_ascii_lowercase() {
            'k' => Some(PieceType::King),
            'q' => Some(PieceType::Queen),
            'b' => Some(PieceType::Bishop),
            'n' => Some(PieceType::Knight),
            'r' => Some(PieceType::Rook),
            'p' => Some(PieceType::Pawn),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::King => "KING",
            PieceType::Queen => "QUEEN",
            PieceType::Bishop => "BISHOP",
            PieceType::Knight => "KNIGHT",
            PieceType::Rook => "ROOK",
            PieceType::Pawn => "PAWN",
        };
        f.write_str(name)
    }
}

/// Status of a game, derived after every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    #[default]
    Pending,
    WhiteInCheck,
    BlackInCheck,
    WhiteWon,
    BlackWon,
    Stalemate,
}

impl GameStatus {
    /// `WHITE_WON`, `BLACK_WON` and `STALEMATE` end the game
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GameStatus::WhiteWon | GameStatus::BlackWon | GameStatus::Stalemate
        )
    }

    pub fn is_check(self) -> bool {
        matches!(self, GameStatus::WhiteInCheck | GameStatus::BlackInCheck)
    }

    pub fn in_check(color: Color) -> GameStatus {
        match color {
            Color::White => GameStatus::WhiteInCheck,
            Color::Black => GameStatus::BlackInCheck,
        }
    }

    pub fn won_by(color: Color) -> GameStatus {
        match color {
            Color::White => GameStatus::WhiteWon,
            Color::Black => GameStatus::BlackWon,
        }
    }

    /// The winning side, if the game was won
    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::WhiteWon => Some(Color::White),
            GameStatus::BlackWon => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameStatus::Pending => "PENDING",
            GameStatus::WhiteInCheck => "WHITE_IN_CHECK",
            GameStatus::BlackInCheck => "BLACK_IN_CHECK",
            GameStatus::WhiteWon => "WHITE_WON",
            GameStatus::BlackWon => "BLACK_WON",
            GameStatus::Stalemate => "STALEMATE",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_choices_exclude_king_and_pawn() {
        assert!(!PieceType::King.is_promotion_choice());
        assert!(!PieceType::Pawn.is_promotion_choice());
        assert_eq!(PieceType::PROMOTION_CHOICES.len(), 4);
    }

    #[test]
    fn color_helpers() {
        assert_eq!(Color::White.abbreviation(), 'W');
        assert_eq!(Color::Black.abbreviation(), 'B');
        assert_eq!(Color::White.other(), Color::Black);
        assert_eq!(Color::Black.pawn_direction(), -1);
    }

    #[test]
    fn check_statuses() {
        assert!(GameStatus::in_check(Color::White).is_check());
        assert!(GameStatus::BlackInCheck.is_check());
        assert!(!GameStatus::BlackWon.is_check());
        assert!(!GameStatus::Stalemate.is_check());
    }

    #[test]
    fn terminal_statuses() {
        assert!(GameStatus::WhiteWon.is_terminal());
        assert!(GameStatus::Stalemate.is_terminal());
        assert!(!GameStatus::BlackInCheck.is_terminal());
        assert!(!GameStatus::Pending.is_terminal());
    }

    #[test]
    fn status_serializes_in_upper_snake_case() {
        let json = serde_json::to_string(&GameStatus::WhiteInCheck).unwrap();
        assert_eq!(json, "\"WHITE_IN_CHECK\"");
    }
}
