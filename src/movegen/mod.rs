//! Legal move generation.
//!
//! Enumerates the legal moves of a state in policy-slot order: the mover's
//! own pawn first, then Black, White and Orange, each over its current
//! node's neighbor list. When no step is legal the only move is the pass.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{
    neighbors, GameState, Move, MovedPawn, ALL_MOVED_PAWNS, MOVE_SPACE_SIZE, PASS_SLOT,
};
use crate::rules::{can_move_neutral, is_legal_step, play};

/// Returns every legal move of `state` with its policy slot, in slot order.
///
/// The result is never empty: a state without legal steps yields the pass.
pub fn legal_moves(state: &GameState) -> Vec<(usize, Move)> {
    let mut moves = Vec::with_capacity(16);
    for pawn in ALL_MOVED_PAWNS {
        if let Some(neutral) = pawn.neutral() {
            if !can_move_neutral(state, neutral) {
                continue;
            }
        }
        let from = state.position(pawn.pawn(state.turn));
        for (k, &target) in neighbors(from).iter().enumerate() {
            if is_legal_step(state, pawn, target) {
                moves.push((pawn.slot_base() + k, Move::step(pawn, target)));
            }
        }
    }
    if moves.is_empty() {
        moves.push((PASS_SLOT, Move::Pass));
    }
    moves
}

/// Returns a mask over the policy slots marking the legal moves.
pub fn legal_mask(state: &GameState) -> [bool; MOVE_SPACE_SIZE] {
    let mut mask = [false; MOVE_SPACE_SIZE];
    for (slot, _) in legal_moves(state) {
        mask[slot] = true;
    }
    mask
}

/// Picks a uniformly random legal move.
pub fn random_move(state: &GameState, rng: &mut impl Rng) -> Move {
    legal_moves(state)
        .choose(rng)
        .map(|&(_, mv)| mv)
        .unwrap_or(Move::Pass)
}

/// Recovers the legal move that turns `parent` into `child`, if any.
pub fn move_between(parent: &GameState, child: &GameState) -> Option<Move> {
    legal_moves(parent)
        .into_iter()
        .map(|(_, mv)| mv)
        .find(|&mv| play(parent, mv).0 == *child)
}

/// Number of legal steps for one movable pawn.
pub fn count_pawn_moves(state: &GameState, pawn: MovedPawn) -> usize {
    let from = state.position(pawn.pawn(state.turn));
    neighbors(from)
        .iter()
        .filter(|&&target| is_legal_step(state, pawn, target))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{bit, Pawn, Side, TileColor, NEUTRAL_COUNT};
    use crate::rules::{exists_legal_move, is_legal};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn fresh_state_moves() {
        let state = GameState::empty();
        let moves = legal_moves(&state);
        // Player pawn to any of the 10 hub neighbors, Black/White/Orange likewise.
        assert_eq!(moves.len(), 40);
        assert!(moves.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(moves[0], (0, Move::step(MovedPawn::Player, 1)));
        assert_eq!(moves[39], (39, Move::step(MovedPawn::Orange, 10)));
    }

    #[test]
    fn moves_agree_with_is_legal() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = GameState::new_random(&mut rng);
        for _ in 0..60 {
            let mask = legal_mask(&state);
            for slot in 0..MOVE_SPACE_SIZE {
                if let Some(mv) = Move::from_slot(&state, slot) {
                    assert_eq!(mask[slot], is_legal(&state, mv), "slot {} in {:?}", slot, state);
                } else {
                    assert!(!mask[slot]);
                }
            }
            assert_eq!(mask[PASS_SLOT], !exists_legal_move(&state));
            let mv = random_move(&state, &mut rng);
            if play(&state, mv).1 {
                break;
            }
            state = play(&state, mv).0;
        }
    }

    #[test]
    fn blocked_state_yields_pass() {
        let mut state = GameState::empty();
        state.positions = [16, 19, 6, 11, 20];
        state.tiles[TileColor::B.index()] = bit(12);
        state.last_user = [Side::B; NEUTRAL_COUNT];
        state.streak = [1; NEUTRAL_COUNT];
        assert_eq!(legal_moves(&state), vec![(PASS_SLOT, Move::Pass)]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(random_move(&state, &mut rng), Move::Pass);
    }

    #[test]
    fn move_between_recovers_move() {
        let state = GameState::empty();
        let mv = Move::step(MovedPawn::White, 8);
        let (child, _) = play(&state, mv);
        assert_eq!(move_between(&state, &child), Some(mv));
        assert_eq!(move_between(&state, &state), None);
    }

    #[test]
    fn locked_neutral_has_no_moves() {
        let mut state = GameState::empty();
        state.positions[Pawn::Black.index()] = 1;
        state.last_user[0] = Side::A;
        state.streak[0] = 2;
        assert_eq!(count_pawn_moves(&state, MovedPawn::Black), 0);
        // Node 1 is taken by Black.
        assert_eq!(count_pawn_moves(&state, MovedPawn::White), 9);
    }
}
