//! Move value type
//!
//! A [`Move`] is a plain `(start, end, promotion)` triple. It says nothing
//! about legality; it is what a player requests and what the generators emit.
//! Side effects such as castling or en passant are not encoded in the move
//! itself and are recognised from the board when the move is applied.

use crate::error::{RulesError, RulesResult};
use crate::position::Position;
use crate::types::PieceType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    start: Position,
    end: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    promotion: Option<PieceType>,
}

impl Move {
    pub const fn new(start: Position, end: Position) -> Self {
        Move {
            start,
            end,
            promotion: None,
        }
    }

    pub const fn with_promotion(start: Position, end: Position, promotion: PieceType) -> Self {
        Move {
            start,
            end,
            promotion: Some(promotion),
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn promotion(&self) -> Option<PieceType> {
        self.promotion
    }

    /// `(d_row, d_col)` travelled by the move
    pub fn distance(&self) -> (i8, i8) {
        self.start.difference(self.end)
    }

    pub fn direction(&self) -> (i8, i8) {
        self.start.direction(self.end)
    }
}

/// Coordinate notation: `e2e4`, or `e7e8q` for a promotion
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.letter())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = RulesError;

    fn from_str(s: &str) -> RulesResult<Self> {
        let err = || RulesError::ParseMove {
            input: s.to_string(),
        };
        let text = s.trim();
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(err());
        }
        let start: Position = text[0..2].parse().map_err(|_| err())?;
        let end: Position = text[2..4].parse().map_err(|_| err())?;
        match text[4..].chars().next() {
            None => Ok(Move::new(start, end)),
            Some(letter) => match PieceType::from_letter(letter) {
                Some(kind) if kind.is_promotion_choice() => {
                    Ok(Move::with_promotion(start, end, kind))
                }
                _ => Err(err()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_promotion_moves() {
        let mv: Move = "e2e4".parse().unwrap();
        assert_eq!(mv, Move::new(Position::new(2, 5), Position::new(4, 5)));
        assert_eq!(mv.distance(), (2, 0));
        assert_eq!(mv.direction(), (1, 0));

        let promo: Move = "a7a8n".parse().unwrap();
        assert_eq!(promo.promotion(), Some(PieceType::Knight));
        assert_eq!(promo.to_string(), "a7a8n");
    }

    #[test]
    fn rejects_king_promotion_and_garbage() {
        assert!("a7a8k".parse::<Move>().is_err());
        assert!("e2".parse::<Move>().is_err());
        assert!("e2e9".parse::<Move>().is_err());
    }

    #[test]
    fn equality_includes_promotion() {
        let start = Position::new(7, 1);
        let end = Position::new(8, 1);
        assert_ne!(
            Move::with_promotion(start, end, PieceType::Queen),
            Move::with_promotion(start, end, PieceType::Rook)
        );
        assert_ne!(Move::new(start, end), Move::with_promotion(start, end, PieceType::Queen));
    }
}
