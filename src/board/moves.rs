//! Move representation.
//!
//! A move either steps one pawn to a node or passes. On the wire a move is
//! the pair `(pawn_id, node)` where pawn 0 is the mover's own player pawn,
//! 1..=3 are Black, White and Orange, and `(-1, -1)` is a pass.
//!
//! Every move also has a slot in the 41-entry policy vector: slot
//! `10 * pawn_id + k` steps that pawn to the `k`-th neighbor of its current
//! node, and slot 40 is the pass.

use serde::{Deserialize, Serialize};

use super::graph::{is_node, neighbor_index, neighbors, Node, MAX_DEGREE, PASS_SLOT};
use super::pawn::{Neutral, Pawn, Side};
use super::state::GameState;

/// The wire form of a move.
pub type WireMove = (i8, i8);

/// The wire form of a pass.
pub const WIRE_PASS: WireMove = (-1, -1);

/// Which pawn a move displaces, relative to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MovedPawn {
    /// The side-to-move's own player pawn.
    Player = 0,
    Black = 1,
    White = 2,
    Orange = 3,
}

/// All movable pawns in slot order.
pub const ALL_MOVED_PAWNS: [MovedPawn; 4] = [
    MovedPawn::Player,
    MovedPawn::Black,
    MovedPawn::White,
    MovedPawn::Orange,
];

impl MovedPawn {
    /// Returns the wire id (0..=3).
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Parses a wire id.
    pub const fn from_id(id: u8) -> Option<MovedPawn> {
        match id {
            0 => Some(MovedPawn::Player),
            1 => Some(MovedPawn::Black),
            2 => Some(MovedPawn::White),
            3 => Some(MovedPawn::Orange),
            _ => None,
        }
    }

    /// First policy slot of this pawn's range.
    #[inline]
    pub const fn slot_base(self) -> usize {
        self as usize * MAX_DEGREE
    }

    /// Resolves to the concrete pawn for a given side to move.
    pub const fn pawn(self, side: Side) -> Pawn {
        match self {
            MovedPawn::Player => side.pawn(),
            MovedPawn::Black => Pawn::Black,
            MovedPawn::White => Pawn::White,
            MovedPawn::Orange => Pawn::Orange,
        }
    }

    pub const fn neutral(self) -> Option<Neutral> {
        match self {
            MovedPawn::Player => None,
            MovedPawn::Black => Some(Neutral::Black),
            MovedPawn::White => Some(Neutral::White),
            MovedPawn::Orange => Some(Neutral::Orange),
        }
    }
}

impl From<Neutral> for MovedPawn {
    fn from(neutral: Neutral) -> Self {
        match neutral {
            Neutral::Black => MovedPawn::Black,
            Neutral::White => MovedPawn::White,
            Neutral::Orange => MovedPawn::Orange,
        }
    }
}

/// Errors that can occur when decoding a wire move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("unknown pawn id {0}, expected -1..=3")]
    UnknownPawn(i8),

    #[error("target node {0} is outside the board")]
    NodeOutOfRange(i8),

    #[error("malformed pass ({0}, {1}), expected (-1, -1)")]
    MalformedPass(i8, i8),
}

/// A single move by the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "WireMove", try_from = "WireMove")]
pub enum Move {
    /// Step a pawn to a node.
    Step { pawn: MovedPawn, target: Node },
    /// No legal step exists; the mover's pawn returns to the hub.
    Pass,
}

impl Move {
    #[inline]
    pub const fn step(pawn: MovedPawn, target: Node) -> Move {
        Move::Step { pawn, target }
    }

    /// Returns the wire form of this move.
    pub const fn to_wire(self) -> WireMove {
        match self {
            Move::Step { pawn, target } => (pawn.id() as i8, target as i8),
            Move::Pass => WIRE_PASS,
        }
    }

    /// Parses the wire form of a move.
    pub fn from_wire((pawn, target): WireMove) -> Result<Move, MoveError> {
        if pawn == -1 || target == -1 {
            return if (pawn, target) == WIRE_PASS {
                Ok(Move::Pass)
            } else {
                Err(MoveError::MalformedPass(pawn, target))
            };
        }
        let moved = u8::try_from(pawn)
            .ok()
            .and_then(MovedPawn::from_id)
            .ok_or(MoveError::UnknownPawn(pawn))?;
        let node = u8::try_from(target)
            .ok()
            .filter(|&n| is_node(n))
            .ok_or(MoveError::NodeOutOfRange(target))?;
        Ok(Move::step(moved, node))
    }

    /// Returns the policy slot of this move in `state`, or `None` if the
    /// target is not a neighbor of the moved pawn.
    pub fn slot(self, state: &GameState) -> Option<usize> {
        match self {
            Move::Pass => Some(PASS_SLOT),
            Move::Step { pawn, target } => {
                let from = state.position(pawn.pawn(state.turn));
                neighbor_index(from, target).map(|k| pawn.slot_base() + k)
            }
        }
    }

    /// Returns the move occupying `slot` in `state`, or `None` for padding
    /// slots beyond the pawn's degree.
    pub fn from_slot(state: &GameState, slot: usize) -> Option<Move> {
        if slot == PASS_SLOT {
            return Some(Move::Pass);
        }
        let pawn = MovedPawn::from_id((slot / MAX_DEGREE) as u8)?;
        let from = state.position(pawn.pawn(state.turn));
        neighbors(from)
            .get(slot % MAX_DEGREE)
            .map(|&target| Move::step(pawn, target))
    }
}

impl From<Move> for WireMove {
    fn from(mv: Move) -> Self {
        mv.to_wire()
    }
}

impl TryFrom<WireMove> for Move {
    type Error = MoveError;

    fn try_from(wire: WireMove) -> Result<Self, Self::Error> {
        Move::from_wire(wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::graph::MOVE_SPACE_SIZE;

    #[test]
    fn wire_roundtrip() {
        for mv in [
            Move::Pass,
            Move::step(MovedPawn::Player, 3),
            Move::step(MovedPawn::Orange, 20),
        ] {
            assert_eq!(Move::from_wire(mv.to_wire()), Ok(mv));
        }
        assert_eq!(Move::Pass.to_wire(), (-1, -1));
        assert_eq!(Move::step(MovedPawn::White, 7).to_wire(), (2, 7));
    }

    #[test]
    fn wire_rejects_malformed() {
        assert_eq!(Move::from_wire((4, 3)), Err(MoveError::UnknownPawn(4)));
        assert_eq!(Move::from_wire((-3, 3)), Err(MoveError::UnknownPawn(-3)));
        assert_eq!(Move::from_wire((0, 21)), Err(MoveError::NodeOutOfRange(21)));
        assert_eq!(Move::from_wire((-1, 3)), Err(MoveError::MalformedPass(-1, 3)));
        assert_eq!(Move::from_wire((2, -1)), Err(MoveError::MalformedPass(2, -1)));
    }

    #[test]
    fn slots_follow_neighbor_order() {
        let mut state = GameState::empty();
        state.positions[Pawn::Black.index()] = 16;
        assert_eq!(Move::step(MovedPawn::Player, 1).slot(&state), Some(0));
        assert_eq!(Move::step(MovedPawn::Player, 10).slot(&state), Some(9));
        assert_eq!(Move::step(MovedPawn::Black, 12).slot(&state), Some(12));
        assert_eq!(Move::step(MovedPawn::Black, 17).slot(&state), None);
        assert_eq!(Move::step(MovedPawn::Orange, 5).slot(&state), Some(38));
        assert_eq!(Move::Pass.slot(&state), Some(40));
    }

    #[test]
    fn from_slot_inverts_slot() {
        let mut state = GameState::empty();
        state.turn = Side::B;
        state.positions = [0, 11, 16, 2, 9];
        let mut seen = 0;
        for slot in 0..MOVE_SPACE_SIZE {
            if let Some(mv) = Move::from_slot(&state, slot) {
                assert_eq!(mv.slot(&state), Some(slot));
                seen += 1;
            }
        }
        // B pawn on 11 (7), Black on 16 (3), White on 2 (6), Orange on 9 (8), pass.
        assert_eq!(seen, 7 + 3 + 6 + 8 + 1);
        assert_eq!(Move::from_slot(&state, 13), None);
    }

    #[test]
    fn serde_uses_wire_pair() {
        let json = serde_json::to_string(&Move::step(MovedPawn::Black, 4)).unwrap();
        assert_eq!(json, "[1,4]");
        assert_eq!(serde_json::from_str::<Move>("[-1,-1]").unwrap(), Move::Pass);
        assert!(serde_json::from_str::<Move>("[7,1]").is_err());
    }
}
