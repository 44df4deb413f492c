//! Move application.
//!
//! `apply_move` trusts its caller: it performs no legality check and an
//! illegal move leaves the state in an unspecified (but memory-safe)
//! condition. `apply_checked` validates first and leaves the state
//! untouched on error.

use crate::board::{is_goal, GameState, Move, MovedPawn, Neutral, Node, HUB};

use super::legality::{exists_legal_move, is_legal_step};
use super::RuleError;

/// Applies `mv` to `state` without validation. Returns true if the move
/// wins the game for the side that played it.
pub fn apply_move(state: &mut GameState, mv: Move) -> bool {
    match mv {
        Move::Step { pawn, target } => apply_step(state, pawn, target),
        Move::Pass => {
            pass_turn(state);
            false
        }
    }
}

/// Returns the successor of `state` under `mv` and the win flag.
pub fn play(state: &GameState, mv: Move) -> (GameState, bool) {
    let mut child = *state;
    let won = apply_move(&mut child, mv);
    (child, won)
}

/// Validates and applies `mv`.
pub fn apply_checked(state: &mut GameState, mv: Move) -> Result<bool, RuleError> {
    match mv {
        Move::Pass if exists_legal_move(state) => Err(RuleError::SpuriousPass {
            side: state.turn,
            state: *state,
        }),
        Move::Step { pawn, target } if !is_legal_step(state, pawn, target) => {
            Err(RuleError::IllegalMove {
                side: state.turn,
                mv,
                state: *state,
            })
        }
        _ => Ok(apply_move(state, mv)),
    }
}

fn apply_step(state: &mut GameState, pawn: MovedPawn, target: Node) -> bool {
    let side = state.turn;
    let won = match pawn.neutral() {
        None => {
            state.positions[side.pawn().index()] = target;
            state.clear_tiles(target);
            state.reset_streaks_of(side, None);
            is_goal(target)
        }
        Some(neutral) => {
            state.positions[neutral.pawn().index()] = target;
            if neutral == Neutral::Orange {
                state.clear_tiles(target);
            }
            state.reset_streaks_of(side, Some(neutral));
            let i = neutral.index();
            state.streak[i] = state.streak[i].saturating_add(1);
            state.last_user[i] = side;
            false
        }
    };
    state.turn = side.opponent();
    won
}

/// Handles a turn with no legal step: every streak held by the side to move
/// is dropped, its pawn returns to the hub, and the turn passes.
pub fn pass_turn(state: &mut GameState) {
    let side = state.turn;
    state.reset_streaks_of(side, None);
    state.positions[side.pawn().index()] = HUB;
    state.turn = side.opponent();
}
