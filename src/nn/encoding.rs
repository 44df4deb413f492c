//! Game state <-> tensor encoding for the learned evaluator.
//!
//! Produces a [21, 23] f32 tensor, one row per board node.
//!
//! Feature layout per node (23 channels):
//!   [0:5]   pawn present:   [A, B, Black, White, Orange]
//!   [5:10]  tile pairing:   [A/B, A/Black, A/White, B/Black, B/White]
//!   [10:22] neutral streaks, broadcast to every row, four columns per
//!           neutral in order Black, White, Orange:
//!           [A streak 1, A streak 2, B streak 1, B streak 2]
//!   [22]    side to move is B, broadcast
//!
//! A neutral with streak 0 has all four of its columns clear.

use crate::board::{
    bit, GameState, Node, Side, StateError, ALL_NEUTRALS, ALL_PAWNS, MAX_STREAK,
    MOVE_SPACE_SIZE, NEUTRAL_COUNT, NODE_COUNT, PAWN_COUNT, TILE_PAIRS,
};

/// Number of features per node.
pub const FEATURE_COUNT: usize = 23;

/// Number of rows of the tensor.
pub const NUM_ROWS: usize = NODE_COUNT;

/// Feature offset constants.
pub const FEAT_PAWN: usize = 0;
pub const FEAT_TILE_PAIR: usize = 5;
pub const FEAT_STREAK: usize = 10;
pub const FEAT_TURN: usize = 22;

/// Columns per neutral pawn in the streak block.
const STREAK_STRIDE: usize = 4;

/// The per-node feature tensor.
pub type Feature = [[f32; FEATURE_COUNT]; NUM_ROWS];

/// A distribution (or any per-slot value) over the move-index space.
pub type Policy = [f32; MOVE_SPACE_SIZE];

/// Returns an all-zero feature tensor.
pub const fn empty_feature() -> Feature {
    [[0.0; FEATURE_COUNT]; NUM_ROWS]
}

/// Column holding the (last user, streak) flag of a neutral, or `None` for
/// streak 0.
fn streak_column(neutral_index: usize, last_user: Side, streak: u8) -> Option<usize> {
    if streak == 0 || streak > MAX_STREAK {
        return None;
    }
    let side_offset = match last_user {
        Side::A => 0,
        Side::B => 2,
    };
    Some(FEAT_STREAK + STREAK_STRIDE * neutral_index + side_offset + (streak as usize - 1))
}

fn broadcast(tensor: &mut Feature, column: usize, value: f32) {
    for row in tensor.iter_mut() {
        row[column] = value;
    }
}

/// Encodes a `GameState` into a [21, 23] tensor.
pub fn encode(state: &GameState) -> Feature {
    let mut tensor = empty_feature();

    for pawn in ALL_PAWNS {
        tensor[state.position(pawn) as usize][FEAT_PAWN + pawn.index()] = 1.0;
    }

    // Tile pairings are mutually exclusive; first match wins.
    for node in 1..NODE_COUNT {
        let mask = bit(node as Node);
        if let Some(pair) = TILE_PAIRS
            .iter()
            .position(|&(x, y)| state.tiles(x) & mask != 0 && state.tiles(y) & mask != 0)
        {
            tensor[node][FEAT_TILE_PAIR + pair] = 1.0;
        }
    }

    for neutral in ALL_NEUTRALS {
        if let Some(col) = streak_column(
            neutral.index(),
            state.last_user(neutral),
            state.streak(neutral),
        ) {
            broadcast(&mut tensor, col, 1.0);
        }
    }

    if state.turn == Side::B {
        broadcast(&mut tensor, FEAT_TURN, 1.0);
    }

    tensor
}

/// Returns the row holding the largest value of `column`; ties go to the
/// lowest row.
pub fn argmax_row(tensor: &Feature, column: usize) -> Node {
    let mut best = 0;
    for row in 1..NUM_ROWS {
        if tensor[row][column] > tensor[best][column] {
            best = row;
        }
    }
    best as Node
}

/// Reads the pawn positions encoded in a tensor, indexed by `Pawn`.
pub fn pawn_positions(tensor: &Feature) -> [Node; PAWN_COUNT] {
    let mut positions = [0; PAWN_COUNT];
    for pawn in ALL_PAWNS {
        positions[pawn.index()] = argmax_row(tensor, FEAT_PAWN + pawn.index());
    }
    positions
}

/// Reads the side to move encoded in a tensor.
pub fn side_to_move(tensor: &Feature) -> Side {
    if tensor[0][FEAT_TURN] > 0.5 {
        Side::B
    } else {
        Side::A
    }
}

/// Decodes a tensor back into a `GameState`.
///
/// Best effort: any tensor yields some state. For tensors produced by
/// [`encode`] the result is the encoded state exactly. Broadcast columns are
/// read from row 0. A neutral with no streak flag set decodes as streak 0
/// with last user A.
pub fn decode(tensor: &Feature) -> GameState {
    let mut state = GameState::empty();
    state.turn = side_to_move(tensor);
    state.positions = pawn_positions(tensor);

    for (node, row) in tensor.iter().enumerate().skip(1) {
        for (pair, &(x, y)) in TILE_PAIRS.iter().enumerate() {
            if row[FEAT_TILE_PAIR + pair] > 0.5 {
                state.tiles[x.index()] |= bit(node as Node);
                state.tiles[y.index()] |= bit(node as Node);
            }
        }
    }

    let flags = &tensor[0];
    for k in 0..NEUTRAL_COUNT {
        let base = FEAT_STREAK + STREAK_STRIDE * k;
        let set = |offset: usize| flags[base + offset] > 0.5;
        let (last_user, streak) = if set(0) {
            (Side::A, 1)
        } else if set(1) {
            (Side::A, 2)
        } else if set(2) {
            (Side::B, 1)
        } else if set(3) {
            (Side::B, 2)
        } else {
            (Side::A, 0)
        };
        state.last_user[k] = last_user;
        state.streak[k] = streak;
    }

    state
}

/// Decodes a tensor and validates the resulting state.
pub fn try_decode(tensor: &Feature) -> Result<GameState, StateError> {
    let state = decode(tensor);
    state.validate()?;
    Ok(state)
}

/// Flattens a tensor into row-major order.
pub fn flatten(tensor: &Feature) -> Vec<f32> {
    tensor.iter().flat_map(|row| row.iter().copied()).collect()
}
