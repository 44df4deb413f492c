//! Static board graph.
//!
//! The board is a hub (node 0) surrounded by four concentric pentagons of
//! five nodes each: ring 0 is nodes 1..=5, ring 1 is 6..=10, ring 2 is
//! 11..=15 and ring 3 (the goal ring) is 16..=20.
//!
//! The per-node neighbor order is significant: it defines the move slots of
//! the policy vector, so it must never be re-sorted.

/// A node index in `[0, NODE_COUNT)`.
pub type Node = u8;

/// A set of nodes stored as a bitboard: bit `k` set iff node `k` is in the set.
pub type NodeSet = u32;

/// Number of nodes on the board.
pub const NODE_COUNT: usize = 21;

/// The shared center node, exempt from the single-occupant rule.
pub const HUB: Node = 0;

/// Nodes per pentagon ring.
pub const RING_SIZE: usize = 5;

/// Number of pentagon rings around the hub.
pub const RING_COUNT: usize = 4;

/// Degree of the hub, the largest of any node.
pub const MAX_DEGREE: usize = 10;

/// Size of the move-index space: four movable pawns times `MAX_DEGREE`
/// destinations, plus one pass slot.
pub const MOVE_SPACE_SIZE: usize = 4 * MAX_DEGREE + 1;

/// Slot index of the pass move.
pub const PASS_SLOT: usize = MOVE_SPACE_SIZE - 1;

/// Every node of the board.
pub const ALL_NODES: NodeSet = (1 << NODE_COUNT) - 1;

/// The outermost ring; a player pawn landing here wins.
pub const GOAL_RING: NodeSet = 0b11111 << 16;

/// Adjacency list per node, in slot order.
pub const NEIGHBORS: [&[Node]; NODE_COUNT] = [
    &[1, 6, 2, 7, 3, 8, 4, 9, 5, 10],
    &[0, 5, 10, 11, 6, 2],
    &[0, 1, 6, 12, 7, 3],
    &[0, 2, 7, 13, 8, 4],
    &[0, 3, 8, 14, 9, 5],
    &[0, 4, 9, 15, 10, 1],
    &[0, 1, 10, 11, 16, 12, 7, 2],
    &[0, 2, 6, 12, 17, 13, 8, 3],
    &[0, 3, 7, 13, 18, 14, 9, 4],
    &[0, 4, 8, 14, 19, 15, 10, 5],
    &[0, 5, 9, 15, 20, 11, 6, 1],
    &[1, 10, 15, 20, 16, 12, 6],
    &[2, 6, 11, 16, 17, 13, 7],
    &[3, 7, 12, 17, 18, 14, 8],
    &[4, 8, 13, 18, 19, 15, 9],
    &[5, 9, 14, 19, 20, 11, 10],
    &[6, 11, 12],
    &[7, 12, 13],
    &[8, 13, 14],
    &[9, 14, 15],
    &[10, 15, 11],
];

/// Bitboard form of `NEIGHBORS`.
pub const BIT_NEIGHBORS: [NodeSet; NODE_COUNT] = build_bit_neighbors();

/// Number of neighbors of each node.
pub const DEGREE: [usize; NODE_COUNT] = build_degrees();

const fn build_bit_neighbors() -> [NodeSet; NODE_COUNT] {
    let mut table = [0; NODE_COUNT];
    let mut n = 0;
    while n < NODE_COUNT {
        let list = NEIGHBORS[n];
        let mut i = 0;
        while i < list.len() {
            table[n] |= 1 << list[i];
            i += 1;
        }
        n += 1;
    }
    table
}

const fn build_degrees() -> [usize; NODE_COUNT] {
    let mut table = [0; NODE_COUNT];
    let mut n = 0;
    while n < NODE_COUNT {
        table[n] = NEIGHBORS[n].len();
        n += 1;
    }
    table
}

/// Returns the singleton set containing `node`.
#[inline]
pub const fn bit(node: Node) -> NodeSet {
    1 << node
}

/// Returns the neighbors of `node` in slot order.
#[inline]
pub fn neighbors(node: Node) -> &'static [Node] {
    NEIGHBORS[node as usize]
}

/// Returns the neighbors of `node` as a bitboard.
#[inline]
pub fn bit_neighbors(node: Node) -> NodeSet {
    BIT_NEIGHBORS[node as usize]
}

/// Returns true if `a` and `b` share an edge.
#[inline]
pub fn is_adjacent(a: Node, b: Node) -> bool {
    BIT_NEIGHBORS[a as usize] & bit(b) != 0
}

/// Returns the slot of `to` within the neighbor list of `from`.
pub fn neighbor_index(from: Node, to: Node) -> Option<usize> {
    neighbors(from).iter().position(|&n| n == to)
}

/// Returns the ring (0..4) of a non-hub node, or `None` for the hub.
pub fn ring(node: Node) -> Option<usize> {
    match node {
        0 => None,
        n if (n as usize) < NODE_COUNT => Some((n as usize - 1) / RING_SIZE),
        _ => None,
    }
}

/// Returns true if `node` lies on the goal ring.
#[inline]
pub fn is_goal(node: Node) -> bool {
    GOAL_RING & bit(node) != 0
}

/// Returns true if `node` is a valid board index.
#[inline]
pub fn is_node(node: Node) -> bool {
    (node as usize) < NODE_COUNT
}
