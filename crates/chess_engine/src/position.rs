//! Board coordinates
//!
//! A [`Position`] is an immutable `(row, col)` pair with both components in
//! `1..=8`, row 1 being white's back rank and column 1 the a-file. Positions
//! produced by arithmetic may fall off the board; they are still representable
//! so that move generators can step freely and test [`Position::on_board`]
//! afterwards. Arithmetic saturates at the bounds of `i8`.

use crate::error::{RulesError, RulesResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: i8,
    col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    pub fn row(self) -> i8 {
        self.row
    }

    pub fn col(self) -> i8 {
        self.col
    }

    pub fn on_board(self) -> bool {
        (1..=8).contains(&self.row) && (1..=8).contains(&self.col)
    }

    /// Position shifted by `(d_row, d_col)`; may be off the board
    pub fn offset(self, d_row: i8, d_col: i8) -> Position {
        Position::new(self.row.saturating_add(d_row), self.col.saturating_add(d_col))
    }

    /// Vector from `self` to `other`, so that `self.offset(d.0, d.1) == other`
    /// whenever the vector fits in `i8`
    pub fn difference(self, other: Position) -> (i8, i8) {
        (
            other.row.saturating_sub(self.row),
            other.col.saturating_sub(self.col),
        )
    }

    /// [`difference`](Self::difference) reduced by the gcd of its components.
    ///
    /// Two squares on the same rank, file or diagonal as `self` share a
    /// direction with it. The zero vector stays `(0, 0)`.
    pub fn direction(self, other: Position) -> (i8, i8) {
        let (d_row, d_col) = self.difference(other);
        let divisor = i16::from(gcd(d_row.unsigned_abs(), d_col.unsigned_abs()));
        if divisor == 0 {
            return (0, 0);
        }
        // |d| / divisor never exceeds |d|, so the quotients fit back in i8
        (
            (i16::from(d_row) / divisor) as i8,
            (i16::from(d_col) / divisor) as i8,
        )
    }

    /// Row-major index into an 8x8 array; only meaningful on the board
    pub(crate) fn index(self) -> (usize, usize) {
        debug_assert!(self.on_board(), "{self:?} is off the board");
        ((self.row - 1) as usize, (self.col - 1) as usize)
    }
}

fn gcd(a: u8, b: u8) -> u8 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.on_board() {
            write!(f, "{}{}", (b'a' + (self.col - 1) as u8) as char, self.row)
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}

impl FromStr for Position {
    type Err = RulesError;

    fn from_str(s: &str) -> RulesResult<Self> {
        let err = || RulesError::ParsePosition {
            input: s.to_string(),
        };
        let mut chars = s.trim().chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file.to_ascii_lowercase(), rank),
            _ => return Err(err()),
        };
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(err());
        }
        Ok(Position::new(
            (rank as u8 - b'0') as i8,
            (file as u8 - b'a' + 1) as i8,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_may_leave_the_board() {
        let corner = Position::new(8, 8);
        assert!(corner.on_board());
        assert!(!corner.offset(1, 0).on_board());
        assert!(!corner.offset(0, -8).on_board());
    }

    #[test]
    fn difference_round_trips_through_offset() {
        let a = Position::new(2, 3);
        let b = Position::new(7, 1);
        let (dr, dc) = a.difference(b);
        assert_eq!(a.offset(dr, dc), b);
    }

    #[test]
    fn direction_reduces_to_unit_step() {
        let a = Position::new(1, 1);
        assert_eq!(a.direction(Position::new(5, 5)), (1, 1));
        assert_eq!(a.direction(Position::new(1, 8)), (0, 1));
        assert_eq!(a.direction(Position::new(3, 2)), (2, 1));
        assert_eq!(a.direction(a), (0, 0));
    }

    #[test]
    fn arithmetic_saturates_at_the_type_bounds() {
        let far = Position::new(127, 1);
        assert_eq!(far.offset(1, 0), Position::new(127, 1));
        assert_eq!(Position::new(-128, 1).offset(-1, -128), Position::new(-128, -127));
        assert!(!far.offset(1, 0).on_board());

        assert_eq!(far.difference(Position::new(-128, 1)), (-128, 0));
        assert_eq!(Position::new(-128, 1).difference(far), (127, 0));
        assert_eq!(far.direction(Position::new(-128, 1)), (-1, 0));
        assert_eq!(
            Position::new(0, 0).direction(Position::new(-128, -128)),
            (-1, -1)
        );
        assert_eq!(
            Position::new(0, 0).direction(Position::new(-128, 64)),
            (-2, 1)
        );
    }

    #[test]
    fn algebraic_notation() {
        let e4: Position = "e4".parse().unwrap();
        assert_eq!(e4, Position::new(4, 5));
        assert_eq!(e4.to_string(), "e4");
        assert!("i1".parse::<Position>().is_err());
        assert!("a9".parse::<Position>().is_err());
        assert!("a10".parse::<Position>().is_err());
    }
}
