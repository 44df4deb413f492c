//! Board representation and game-state types.
//!
//! Contains the static board graph, the pawn and tile-color enums, the
//! move type, and the game state value.

pub mod graph;
pub mod moves;
pub mod pawn;
pub mod state;

pub use graph::{
    bit, bit_neighbors, is_adjacent, is_goal, is_node, neighbor_index, neighbors, ring, Node,
    NodeSet, ALL_NODES, BIT_NEIGHBORS, DEGREE, GOAL_RING, HUB, MAX_DEGREE, MOVE_SPACE_SIZE,
    NEIGHBORS, NODE_COUNT, PASS_SLOT, RING_COUNT, RING_SIZE,
};
pub use moves::{Move, MoveError, MovedPawn, WireMove, ALL_MOVED_PAWNS};
pub use pawn::{
    Neutral, Pawn, Side, TileColor, ALL_NEUTRALS, ALL_PAWNS, ALL_TILE_COLORS, NEUTRAL_COUNT,
    PAWN_COUNT, TILE_COLOR_COUNT, TILE_PAIRS,
};
pub use state::{GameState, StateError, StateTuple, MAX_STREAK};
