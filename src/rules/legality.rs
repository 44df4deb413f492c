//! Move legality.
//!
//! All checks are bitboard operations over the static neighbor table. A
//! destination carrying a tile color is only enterable when the pawn that
//! contests that color stands next to it:
//!
//! - the opponent's color is contested by the opponent's pawn or Orange,
//! - Black and White colors are contested by the Black and White pawns.
//!
//! Player pawns are subject to all three terms, Orange only to the Black and
//! White terms, and Black/White may never enter a node with a player color.

use crate::board::{
    bit, bit_neighbors, is_adjacent, neighbors, GameState, Move, MovedPawn, Neutral, Node,
    NodeSet, Pawn, TileColor, ALL_MOVED_PAWNS, HUB, MAX_STREAK, NODE_COUNT,
};

/// Returns true if the side to move may move `neutral` at all this turn.
///
/// A side may keep moving a neutral pawn it moved last until its streak hits
/// the cap; a pawn whose streak belongs to the other side is locked.
pub fn can_move_neutral(state: &GameState, neutral: Neutral) -> bool {
    let streak = state.streak(neutral);
    if state.last_user(neutral) == state.turn {
        streak < MAX_STREAK
    } else {
        streak == 0
    }
}

/// Nodes whose Black and White tile colors, if any, are contested.
#[inline]
fn neutral_open(state: &GameState) -> NodeSet {
    (!state.tiles(TileColor::Black) | bit_neighbors(state.position(Pawn::Black)))
        & (!state.tiles(TileColor::White) | bit_neighbors(state.position(Pawn::White)))
}

/// Nodes the side to move may enter with its own pawn as far as tile
/// colors are concerned.
#[inline]
fn player_open(state: &GameState) -> NodeSet {
    let opponent = state.turn.opponent();
    (!state.tiles(opponent.tile_color())
        | bit_neighbors(state.position(opponent.pawn()))
        | bit_neighbors(state.position(Pawn::Orange)))
        & neutral_open(state)
}

/// Returns true if stepping `pawn` to `target` is legal for the side to move.
pub fn is_legal_step(state: &GameState, pawn: MovedPawn, target: Node) -> bool {
    if target as usize >= NODE_COUNT {
        return false;
    }
    let mover = pawn.pawn(state.turn);
    if !is_adjacent(state.position(mover), target) {
        return false;
    }
    let occupied = state.occupied_by_others(mover) & bit(target) != 0;

    match pawn.neutral() {
        None => (target == HUB || !occupied) && player_open(state) & bit(target) != 0,
        Some(neutral) => {
            if !can_move_neutral(state, neutral) || target == HUB || occupied {
                return false;
            }
            match neutral {
                Neutral::Black | Neutral::White => {
                    (state.tiles(TileColor::A) | state.tiles(TileColor::B)) & bit(target) == 0
                }
                Neutral::Orange => neutral_open(state) & bit(target) != 0,
            }
        }
    }
}

/// Returns true if `mv` is legal. A pass is legal only when no step is.
pub fn is_legal(state: &GameState, mv: Move) -> bool {
    match mv {
        Move::Step { pawn, target } => is_legal_step(state, pawn, target),
        Move::Pass => !exists_legal_move(state),
    }
}

/// Returns true if the side to move has at least one legal step.
pub fn exists_legal_move(state: &GameState) -> bool {
    ALL_MOVED_PAWNS.iter().any(|&pawn| {
        neighbors(state.position(pawn.pawn(state.turn)))
            .iter()
            .any(|&target| is_legal_step(state, pawn, target))
    })
}
