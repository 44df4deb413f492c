//! Symmetry transforms for training-sample augmentation.
//!
//! The board has the five-fold dihedral symmetry of a pentagon: five
//! rotations and five reflections, all fixing the hub. On top of those come
//! two semantic involutions that relabel pawns rather than nodes: swapping
//! the Black and White neutrals, and swapping the two players.
//!
//! A node permutation moves feature rows. Move slots are tied to the
//! neighbor order of the moving pawn's node, so each automorphism also
//! carries, per node, the relabeling of neighbor slots that follows the
//! same physical edges after the permutation.

use std::sync::LazyLock;

use rand::Rng;

use crate::board::{
    neighbor_index, neighbors, GameState, MovedPawn, Neutral, Node, NodeSet, Pawn, Side,
    TileColor, ALL_MOVED_PAWNS, ALL_NEUTRALS, DEGREE, MAX_DEGREE, MOVE_SPACE_SIZE, NODE_COUNT,
    RING_COUNT, RING_SIZE,
};

use super::encoding::{pawn_positions, side_to_move, Feature, Policy, FEATURE_COUNT, FEAT_TURN};

/// Number of rotations, identity included.
pub const ROTATION_COUNT: usize = 5;

/// Number of entries in the reflection table, identity included.
pub const REFLECTION_COUNT: usize = 6;

/// Per-ring offsets of the proper reflections.
const REFLECTION_OFFSETS: [[usize; RING_COUNT]; REFLECTION_COUNT - 1] = [
    [0, 4, 0, 4],
    [1, 0, 1, 0],
    [2, 1, 2, 1],
    [3, 2, 3, 2],
    [4, 3, 4, 3],
];

/// Column permutation exchanging the Black and White neutrals.
pub const NEUTRAL_SWAP_COLUMNS: [usize; FEATURE_COUNT] = [
    0, 1, 3, 2, 4, 5, 7, 6, 9, 8, 14, 15, 16, 17, 10, 11, 12, 13, 18, 19, 20, 21, 22,
];

/// Column permutation exchanging the two players. The turn column is
/// flipped separately.
pub const PLAYER_SWAP_COLUMNS: [usize; FEATURE_COUNT] = [
    1, 0, 2, 3, 4, 5, 8, 9, 6, 7, 12, 13, 10, 11, 16, 17, 14, 15, 20, 21, 18, 19, 22,
];

/// A board automorphism with its induced move-slot relabeling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automorphism {
    /// Image of each node.
    pub nodes: [Node; NODE_COUNT],
    /// `slots[n][j]` is the neighbor slot at `nodes[n]` reached through the
    /// image of the edge in slot `j` at `n`. Identity beyond the degree of `n`.
    pub slots: [[u8; MAX_DEGREE]; NODE_COUNT],
}

impl Automorphism {
    /// Builds the slot table for a node permutation, or returns `None` if
    /// the permutation does not preserve adjacency.
    pub fn new(nodes: [Node; NODE_COUNT]) -> Option<Automorphism> {
        let mut seen: NodeSet = 0;
        for &n in &nodes {
            if n as usize >= NODE_COUNT || seen & (1 << n) != 0 {
                return None;
            }
            seen |= 1 << n;
        }

        let mut slots = [[0u8; MAX_DEGREE]; NODE_COUNT];
        for (node, table) in slots.iter_mut().enumerate() {
            let image = nodes[node];
            if DEGREE[image as usize] != DEGREE[node] {
                return None;
            }
            for (j, slot) in table.iter_mut().enumerate() {
                *slot = match neighbors(node as Node).get(j) {
                    Some(&m) => neighbor_index(image, nodes[m as usize])? as u8,
                    None => j as u8,
                };
            }
        }
        Some(Automorphism { nodes, slots })
    }

    pub fn identity() -> Automorphism {
        let mut nodes = [0; NODE_COUNT];
        for (n, image) in nodes.iter_mut().enumerate() {
            *image = n as Node;
        }
        let mut slots = [[0u8; MAX_DEGREE]; NODE_COUNT];
        for table in slots.iter_mut() {
            for (j, slot) in table.iter_mut().enumerate() {
                *slot = j as u8;
            }
        }
        Automorphism { nodes, slots }
    }

    #[inline]
    pub fn map_node(&self, node: Node) -> Node {
        self.nodes[node as usize]
    }

    /// Maps neighbor slot `j` of `node` to the matching slot at its image.
    #[inline]
    pub fn map_slot(&self, node: Node, j: usize) -> usize {
        self.slots[node as usize][j] as usize
    }

    /// Maps every node of a bitboard.
    pub fn map_set(&self, set: NodeSet) -> NodeSet {
        (0..NODE_COUNT)
            .filter(|&n| set & (1 << n) != 0)
            .fold(0, |acc, n| acc | (1 << self.nodes[n]))
    }
}

fn rotation_nodes(step: usize) -> [Node; NODE_COUNT] {
    let mut nodes = [0; NODE_COUNT];
    for ring in 0..RING_COUNT {
        for k in 0..RING_SIZE {
            nodes[RING_SIZE * ring + k + 1] =
                (RING_SIZE * ring + (k + step) % RING_SIZE + 1) as Node;
        }
    }
    nodes
}

fn reflection_nodes(offsets: &[usize; RING_COUNT]) -> [Node; NODE_COUNT] {
    let mut nodes = [0; NODE_COUNT];
    for (ring, &c) in offsets.iter().enumerate() {
        for k in 0..RING_SIZE {
            nodes[RING_SIZE * ring + k + 1] =
                (1 + (RING_SIZE - k + c) % RING_SIZE + RING_SIZE * ring) as Node;
        }
    }
    nodes
}

static ROTATIONS: LazyLock<Vec<Automorphism>> = LazyLock::new(|| {
    (0..ROTATION_COUNT)
        .map(|l| Automorphism::new(rotation_nodes(l)).expect("rotation preserves adjacency"))
        .collect()
});

static REFLECTIONS: LazyLock<Vec<Automorphism>> = LazyLock::new(|| {
    std::iter::once(Automorphism::identity())
        .chain(REFLECTION_OFFSETS.iter().map(|offsets| {
            Automorphism::new(reflection_nodes(offsets)).expect("reflection preserves adjacency")
        }))
        .collect()
});

static IDENTITY: LazyLock<Automorphism> = LazyLock::new(Automorphism::identity);

/// A symmetry of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    Identity,
    /// Rotation by `l` fifths of a turn, `l` in `0..5`.
    Rotation(u8),
    /// Entry of the reflection table, `0..6`; entry 0 is the identity.
    Reflection(u8),
    /// Exchange the Black and White neutrals.
    NeutralSwap,
    /// Exchange the two players.
    PlayerSwap,
}

impl Transform {
    /// Every transform: identity, the four non-identity rotations, the
    /// reflection table and the two swaps.
    pub const ALL: [Transform; 13] = [
        Transform::Identity,
        Transform::Rotation(1),
        Transform::Rotation(2),
        Transform::Rotation(3),
        Transform::Rotation(4),
        Transform::Reflection(0),
        Transform::Reflection(1),
        Transform::Reflection(2),
        Transform::Reflection(3),
        Transform::Reflection(4),
        Transform::Reflection(5),
        Transform::NeutralSwap,
        Transform::PlayerSwap,
    ];

    /// The node automorphism of this transform; identity for the swaps.
    ///
    /// Out-of-range rotation and reflection indices wrap.
    pub fn automorphism(self) -> &'static Automorphism {
        match self {
            Transform::Rotation(l) => &ROTATIONS[l as usize % ROTATION_COUNT],
            Transform::Reflection(r) => &REFLECTIONS[r as usize % REFLECTION_COUNT],
            Transform::Identity | Transform::NeutralSwap | Transform::PlayerSwap => &IDENTITY,
        }
    }

    /// The node permutation of this transform.
    pub fn nodes(self) -> [Node; NODE_COUNT] {
        self.automorphism().nodes
    }

    /// The transform undoing this one.
    pub fn inverse(self) -> Transform {
        match self {
            Transform::Rotation(l) => {
                let l = l as usize % ROTATION_COUNT;
                Transform::Rotation(((ROTATION_COUNT - l) % ROTATION_COUNT) as u8)
            }
            other => other,
        }
    }
}

/// Derives the move-slot permutation of `transform`: input slot `i` moves
/// to output slot `perm[i]`.
///
/// `sources` are the nodes of the pawns owning the four slot ranges, in
/// order: the side-to-move's pawn, Black, White, Orange.
pub fn move_permutation(transform: Transform, sources: [Node; 4]) -> [usize; MOVE_SPACE_SIZE] {
    let mut perm = [0; MOVE_SPACE_SIZE];
    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }
    match transform {
        Transform::NeutralSwap => {
            let black = MovedPawn::Black.slot_base();
            let white = MovedPawn::White.slot_base();
            for j in 0..MAX_DEGREE {
                perm[black + j] = white + j;
                perm[white + j] = black + j;
            }
        }
        Transform::PlayerSwap | Transform::Identity => {}
        Transform::Rotation(_) | Transform::Reflection(_) => {
            let auto = transform.automorphism();
            for (pawn, &source) in ALL_MOVED_PAWNS.iter().zip(sources.iter()) {
                let base = pawn.slot_base();
                for j in 0..MAX_DEGREE {
                    perm[base + j] = base + auto.map_slot(source, j);
                }
            }
        }
    }
    perm
}

/// Nodes owning the four slot ranges of an encoded position.
fn slot_sources(feature: &Feature) -> [Node; 4] {
    let positions = pawn_positions(feature);
    let mover = side_to_move(feature).pawn();
    [
        positions[mover.index()],
        positions[Pawn::Black.index()],
        positions[Pawn::White.index()],
        positions[Pawn::Orange.index()],
    ]
}

fn permute_columns(feature: &Feature, columns: &[usize; FEATURE_COUNT]) -> Feature {
    let mut out = *feature;
    for (row_out, row_in) in out.iter_mut().zip(feature.iter()) {
        for (c, &src) in columns.iter().enumerate() {
            row_out[c] = row_in[src];
        }
    }
    out
}

/// Applies `transform` to a training triple.
pub fn apply_transform(
    feature: &Feature,
    policy: &Policy,
    outcome: f32,
    transform: Transform,
) -> (Feature, Policy, f32) {
    let perm = move_permutation(transform, slot_sources(feature));
    let mut policy_out = [0.0; MOVE_SPACE_SIZE];
    for (i, &p) in policy.iter().enumerate() {
        policy_out[perm[i]] = p;
    }

    match transform {
        Transform::Identity => (*feature, *policy, outcome),
        Transform::Rotation(_) | Transform::Reflection(_) => {
            let auto = transform.automorphism();
            let mut out = *feature;
            for (n, row) in feature.iter().enumerate() {
                out[auto.nodes[n] as usize] = *row;
            }
            (out, policy_out, outcome)
        }
        Transform::NeutralSwap => (
            permute_columns(feature, &NEUTRAL_SWAP_COLUMNS),
            policy_out,
            outcome,
        ),
        Transform::PlayerSwap => {
            let mut out = permute_columns(feature, &PLAYER_SWAP_COLUMNS);
            for row in out.iter_mut() {
                row[FEAT_TURN] = 1.0 - row[FEAT_TURN];
            }
            (out, policy_out, -outcome)
        }
    }
}

/// Applies a random symmetry: one rotation, one reflection-table entry,
/// then each swap with probability one half.
pub fn random_augment(
    rng: &mut impl Rng,
    feature: &Feature,
    policy: &Policy,
    outcome: f32,
) -> (Feature, Policy, f32) {
    let rotation = Transform::Rotation(rng.gen_range(0..ROTATION_COUNT) as u8);
    let reflection = Transform::Reflection(rng.gen_range(0..REFLECTION_COUNT) as u8);
    let (mut f, mut p, mut o) = apply_transform(feature, policy, outcome, rotation);
    (f, p, o) = apply_transform(&f, &p, o, reflection);
    if rng.gen_bool(0.5) {
        (f, p, o) = apply_transform(&f, &p, o, Transform::NeutralSwap);
    }
    if rng.gen_bool(0.5) {
        (f, p, o) = apply_transform(&f, &p, o, Transform::PlayerSwap);
    }
    (f, p, o)
}

/// Applies `transform` directly to a game state.
///
/// Agrees with [`apply_transform`] on encoded states:
/// `encode(apply_to_state(s, t))` equals the transformed `encode(s)`.
pub fn apply_to_state(state: &GameState, transform: Transform) -> GameState {
    let mut out = *state;
    match transform {
        Transform::Identity => {}
        Transform::Rotation(_) | Transform::Reflection(_) => {
            let auto = transform.automorphism();
            for p in out.positions.iter_mut() {
                *p = auto.map_node(*p);
            }
            for t in out.tiles.iter_mut() {
                *t = auto.map_set(*t);
            }
        }
        Transform::NeutralSwap => {
            out.positions.swap(Pawn::Black.index(), Pawn::White.index());
            out.tiles.swap(TileColor::Black.index(), TileColor::White.index());
            out.last_user.swap(Neutral::Black.index(), Neutral::White.index());
            out.streak.swap(Neutral::Black.index(), Neutral::White.index());
        }
        Transform::PlayerSwap => {
            out.turn = out.turn.opponent();
            out.positions.swap(Pawn::A.index(), Pawn::B.index());
            out.tiles.swap(TileColor::A.index(), TileColor::B.index());
            for n in ALL_NEUTRALS {
                if out.streak(n) > 0 {
                    out.last_user[n.index()] = out.last_user(n).opponent();
                }
            }
        }
    }
    out
}

/// Outcome sign seen by `side`, given an outcome from A's perspective.
pub fn outcome_for(side: Side, outcome_a: f32) -> f32 {
    outcome_a * side.sign()
}
