//! Sides, pawns and tile colors.
//!
//! Two sides (A moves first, B second) each own one player pawn. Three
//! neutral pawns (Black, White, Orange) may be moved by either side subject
//! to the streak rule. Tiles carry two of the four colors A, B, Black and
//! White; Orange has a pawn but no tile color.

use serde::{Deserialize, Serialize};

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Returns the other side.
    #[inline]
    pub const fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Returns the flat-tuple flag for this side (`true` for A).
    #[inline]
    pub const fn flag(self) -> bool {
        matches!(self, Side::A)
    }

    /// Parses the flat-tuple flag (`true` for A).
    #[inline]
    pub const fn from_flag(flag: bool) -> Side {
        if flag {
            Side::A
        } else {
            Side::B
        }
    }

    /// Returns this side's player pawn.
    #[inline]
    pub const fn pawn(self) -> Pawn {
        match self {
            Side::A => Pawn::A,
            Side::B => Pawn::B,
        }
    }

    /// Returns this side's tile color.
    #[inline]
    pub const fn tile_color(self) -> TileColor {
        match self {
            Side::A => TileColor::A,
            Side::B => TileColor::B,
        }
    }

    /// Returns the outcome sign for a game won by this side, seen by `A`.
    pub const fn sign(self) -> f32 {
        match self {
            Side::A => 1.0,
            Side::B => -1.0,
        }
    }
}

/// Number of pawns on the board.
pub const PAWN_COUNT: usize = 5;

/// A pawn on the board.
///
/// The discriminant is the pawn's index into `GameState::positions` and
/// its pawn-location column in the feature tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Pawn {
    A = 0,
    B = 1,
    Black = 2,
    White = 3,
    Orange = 4,
}

/// All pawns in index order.
pub const ALL_PAWNS: [Pawn; PAWN_COUNT] = [Pawn::A, Pawn::B, Pawn::Black, Pawn::White, Pawn::Orange];

impl Pawn {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the neutral identity of this pawn, if it is one.
    pub const fn neutral(self) -> Option<Neutral> {
        match self {
            Pawn::Black => Some(Neutral::Black),
            Pawn::White => Some(Neutral::White),
            Pawn::Orange => Some(Neutral::Orange),
            Pawn::A | Pawn::B => None,
        }
    }
}

/// Number of neutral pawns.
pub const NEUTRAL_COUNT: usize = 3;

/// A neutral pawn, shared by both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Neutral {
    Black = 0,
    White = 1,
    Orange = 2,
}

/// All neutral pawns in index order.
pub const ALL_NEUTRALS: [Neutral; NEUTRAL_COUNT] = [Neutral::Black, Neutral::White, Neutral::Orange];

impl Neutral {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn pawn(self) -> Pawn {
        match self {
            Neutral::Black => Pawn::Black,
            Neutral::White => Pawn::White,
            Neutral::Orange => Pawn::Orange,
        }
    }
}

/// Number of tile colors.
pub const TILE_COLOR_COUNT: usize = 4;

/// A tile color. Each physical tile shows exactly two of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileColor {
    A = 0,
    B = 1,
    Black = 2,
    White = 3,
}

/// All tile colors in index order.
pub const ALL_TILE_COLORS: [TileColor; TILE_COLOR_COUNT] =
    [TileColor::A, TileColor::B, TileColor::Black, TileColor::White];

impl TileColor {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The five two-color tile kinds, in feature-column order.
///
/// Decoding relies on this order matching the encoder's precedence.
pub const TILE_PAIRS: [(TileColor, TileColor); 5] = [
    (TileColor::A, TileColor::B),
    (TileColor::A, TileColor::Black),
    (TileColor::A, TileColor::White),
    (TileColor::B, TileColor::Black),
    (TileColor::B, TileColor::White),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_flag_roundtrip() {
        for side in [Side::A, Side::B] {
            assert_eq!(Side::from_flag(side.flag()), side);
            assert_eq!(side.opponent().opponent(), side);
        }
        assert!(Side::A.flag());
    }

    #[test]
    fn indices_are_dense() {
        for (i, p) in ALL_PAWNS.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
        for (i, n) in ALL_NEUTRALS.iter().enumerate() {
            assert_eq!(n.index(), i);
            assert_eq!(n.pawn().neutral(), Some(*n));
        }
        for (i, c) in ALL_TILE_COLORS.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn player_pawns_are_not_neutral() {
        assert_eq!(Side::A.pawn().neutral(), None);
        assert_eq!(Side::B.pawn().neutral(), None);
    }
}
