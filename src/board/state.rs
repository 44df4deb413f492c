//! Game state representation.
//!
//! A `GameState` is a complete, self-contained snapshot of a game: whose turn
//! it is, where the five pawns stand, which tile colors remain on which
//! nodes, and the usage streaks of the neutral pawns. It is plain `Copy`
//! data so that search workers and undo histories each hold their own
//! independent snapshot.
//!
//! Across process boundaries the state travels as the flat 16-field tuple
//! `(turn, posA, posB, posBlack, posWhite, posOrange, tileA, tileB,
//! tileBlack, tileWhite, lastBlack, lastWhite, lastOrange, streakBlack,
//! streakWhite, streakOrange)`, which is also its serde representation.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::graph::{bit, Node, NodeSet, ALL_NODES, HUB, NODE_COUNT, RING_COUNT, RING_SIZE};
use super::pawn::{
    Neutral, Pawn, Side, TileColor, ALL_NEUTRALS, ALL_PAWNS, ALL_TILE_COLORS, NEUTRAL_COUNT,
    PAWN_COUNT, TILE_COLOR_COUNT, TILE_PAIRS,
};

/// Highest streak a neutral pawn can reach.
pub const MAX_STREAK: u8 = 2;

/// The flat tuple form of a `GameState`, in wire order.
pub type StateTuple = (
    bool,
    Node,
    Node,
    Node,
    Node,
    Node,
    NodeSet,
    NodeSet,
    NodeSet,
    NodeSet,
    bool,
    bool,
    bool,
    u8,
    u8,
    u8,
);

/// Errors raised when building a state from untrusted flat data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("pawn {pawn:?} is on node {node}, outside the board")]
    NodeOutOfRange { pawn: Pawn, node: Node },

    #[error("pawns {first:?} and {second:?} share non-hub node {node}")]
    SharedNode { first: Pawn, second: Pawn, node: Node },

    #[error("streak {streak} of {neutral:?} exceeds the cap of 2")]
    StreakOutOfRange { neutral: Neutral, streak: u8 },

    #[error("{color:?} tile mask {mask:#x} has bits outside the board")]
    TileMaskOutOfRange { color: TileColor, mask: NodeSet },

    #[error("the hub carries a {0:?} tile")]
    TileOnHub(TileColor),

    #[error("node {node} carries {count} tile colors, at most 2 allowed")]
    TooManyColors { node: Node, count: u32 },
}

/// Complete game state at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "StateTuple", try_from = "StateTuple")]
pub struct GameState {
    /// Side to move.
    pub turn: Side,
    /// Node of each pawn, indexed by `Pawn as usize`.
    pub positions: [Node; PAWN_COUNT],
    /// Tile color sets, indexed by `TileColor as usize`.
    pub tiles: [NodeSet; TILE_COLOR_COUNT],
    /// Side that last moved each neutral pawn, indexed by `Neutral as usize`.
    /// Held at `Side::A` whenever the matching streak is zero.
    pub last_user: [Side; NEUTRAL_COUNT],
    /// Consecutive own turns the last user has moved each neutral pawn.
    pub streak: [u8; NEUTRAL_COUNT],
}

impl Default for GameState {
    fn default() -> Self {
        GameState::empty()
    }
}

impl GameState {
    /// Creates a fresh state with every pawn on the hub, no tiles, and
    /// side A to move.
    pub const fn empty() -> Self {
        GameState {
            turn: Side::A,
            positions: [HUB; PAWN_COUNT],
            tiles: [0; TILE_COLOR_COUNT],
            last_user: [Side::A; NEUTRAL_COUNT],
            streak: [0; NEUTRAL_COUNT],
        }
    }

    /// Creates a fresh state with the given tile color sets.
    pub const fn with_tiles(tiles: [NodeSet; TILE_COLOR_COUNT]) -> Self {
        let mut state = GameState::empty();
        state.tiles = tiles;
        state
    }

    /// Creates a fresh state with a randomized tile layout.
    ///
    /// Every ring receives each of the five two-color tile kinds exactly
    /// once, shuffled independently per ring. The hub stays bare.
    pub fn new_random(rng: &mut impl Rng) -> Self {
        let mut tiles = [0 as NodeSet; TILE_COLOR_COUNT];
        let mut kinds = TILE_PAIRS;
        for ring in 0..RING_COUNT {
            kinds.shuffle(rng);
            for (k, (first, second)) in kinds.iter().enumerate() {
                let node = (ring * RING_SIZE + k + 1) as Node;
                tiles[first.index()] |= bit(node);
                tiles[second.index()] |= bit(node);
            }
        }
        GameState::with_tiles(tiles)
    }

    #[inline]
    pub fn position(&self, pawn: Pawn) -> Node {
        self.positions[pawn.index()]
    }

    /// Node of the side-to-move's own pawn.
    #[inline]
    pub fn player_position(&self) -> Node {
        self.position(self.turn.pawn())
    }

    #[inline]
    pub fn tiles(&self, color: TileColor) -> NodeSet {
        self.tiles[color.index()]
    }

    #[inline]
    pub fn last_user(&self, neutral: Neutral) -> Side {
        self.last_user[neutral.index()]
    }

    #[inline]
    pub fn streak(&self, neutral: Neutral) -> u8 {
        self.streak[neutral.index()]
    }

    /// Nodes holding any pawn other than `pawn`.
    pub fn occupied_by_others(&self, pawn: Pawn) -> NodeSet {
        ALL_PAWNS
            .iter()
            .filter(|&&p| p != pawn)
            .fold(0, |acc, &p| acc | bit(self.position(p)))
    }

    /// Every node carrying at least one tile color.
    pub fn tiled_nodes(&self) -> NodeSet {
        self.tiles.iter().fold(0, |acc, &t| acc | t)
    }

    /// Number of tile colors present on `node`.
    pub fn colors_at(&self, node: Node) -> u32 {
        self.tiles.iter().filter(|&&t| t & bit(node) != 0).count() as u32
    }

    /// Removes every tile color from `node`.
    pub(crate) fn clear_tiles(&mut self, node: Node) {
        let mask = !bit(node);
        for t in self.tiles.iter_mut() {
            *t &= mask;
        }
    }

    /// Drops a neutral pawn's streak, returning its last user to the
    /// canonical `Side::A`.
    pub(crate) fn reset_streak(&mut self, neutral: Neutral) {
        self.streak[neutral.index()] = 0;
        self.last_user[neutral.index()] = Side::A;
    }

    /// Drops the streak of every neutral pawn last moved by `side`, except
    /// `keep`.
    pub(crate) fn reset_streaks_of(&mut self, side: Side, keep: Option<Neutral>) {
        for n in ALL_NEUTRALS {
            if Some(n) != keep && self.streak(n) > 0 && self.last_user(n) == side {
                self.reset_streak(n);
            }
        }
    }

    /// Returns the flat tuple form of this state.
    pub fn to_tuple(&self) -> StateTuple {
        let p = &self.positions;
        let t = &self.tiles;
        let u = &self.last_user;
        let s = &self.streak;
        (
            self.turn.flag(),
            p[0],
            p[1],
            p[2],
            p[3],
            p[4],
            t[0],
            t[1],
            t[2],
            t[3],
            u[0].flag(),
            u[1].flag(),
            u[2].flag(),
            s[0],
            s[1],
            s[2],
        )
    }

    /// Builds a state from its flat tuple form, validating every field.
    pub fn from_tuple(t: StateTuple) -> Result<Self, StateError> {
        let state = GameState {
            turn: Side::from_flag(t.0),
            positions: [t.1, t.2, t.3, t.4, t.5],
            tiles: [t.6, t.7, t.8, t.9],
            last_user: [Side::from_flag(t.10), Side::from_flag(t.11), Side::from_flag(t.12)],
            streak: [t.13, t.14, t.15],
        };
        state.validate()?;
        Ok(state)
    }

    /// Checks the structural invariants of the state.
    ///
    /// Rule-level properties such as reachability are not checked.
    pub fn validate(&self) -> Result<(), StateError> {
        for pawn in ALL_PAWNS {
            let node = self.position(pawn);
            if node as usize >= NODE_COUNT {
                return Err(StateError::NodeOutOfRange { pawn, node });
            }
        }
        for (i, &first) in ALL_PAWNS.iter().enumerate() {
            for &second in &ALL_PAWNS[i + 1..] {
                let node = self.position(first);
                if node != HUB && node == self.position(second) {
                    return Err(StateError::SharedNode { first, second, node });
                }
            }
        }
        for neutral in ALL_NEUTRALS {
            let streak = self.streak(neutral);
            if streak > MAX_STREAK {
                return Err(StateError::StreakOutOfRange { neutral, streak });
            }
        }
        for color in ALL_TILE_COLORS {
            let mask = self.tiles(color);
            if mask & !ALL_NODES != 0 {
                return Err(StateError::TileMaskOutOfRange { color, mask });
            }
            if mask & bit(HUB) != 0 {
                return Err(StateError::TileOnHub(color));
            }
        }
        for node in 1..NODE_COUNT as Node {
            let count = self.colors_at(node);
            if count > 2 {
                return Err(StateError::TooManyColors { node, count });
            }
        }
        Ok(())
    }
}

impl From<GameState> for StateTuple {
    fn from(state: GameState) -> Self {
        state.to_tuple()
    }
}

impl TryFrom<StateTuple> for GameState {
    type Error = StateError;

    fn try_from(t: StateTuple) -> Result<Self, Self::Error> {
        GameState::from_tuple(t)
    }
}
